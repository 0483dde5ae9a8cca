pub mod commands;

use crate::api::AppState;
use crate::cli::commands::{Commands, ConversationAction, UserAction};
use crate::config::AppConfig;
use crate::db::get_connection;

/// Runs an admin subcommand against the configured store. Returns the process
/// exit code.
pub async fn run_cli(command: Commands, config: AppConfig) -> i32 {
    let pool = match get_connection(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to open database: {}", e);
            return 1;
        }
    };
    let state = match AppState::new(config, pool) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to initialize services: {}", e);
            return 1;
        }
    };

    match command {
        Commands::Serve => {
            eprintln!("Serve is handled by the server entrypoint");
            1
        }
        Commands::Conversation { action } => match action {
            ConversationAction::List { limit, offset } => match state.conversations.list(limit, offset).await {
                Ok(summaries) if summaries.is_empty() => {
                    println!("No conversations found.");
                    0
                }
                Ok(summaries) => {
                    println!("{:<40} | {:<32} | {}", "Session", "Updated At", "Created At");
                    println!("{:-<40}-+-{:-<32}-+-{:-<32}", "", "", "");
                    for s in summaries {
                        println!("{:<40} | {:<32} | {}", s.session_id, s.updated_at.to_rfc3339(), s.created_at.to_rfc3339());
                    }
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            },
            ConversationAction::Show { session_id } => match state.conversations.fetch(&session_id).await {
                Ok(Some(conversation)) => print_json(&conversation),
                Ok(None) => {
                    eprintln!("Conversation {} not found.", session_id);
                    1
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            },
            ConversationAction::Delete { session_id } => match state.conversations.remove(&session_id).await {
                Ok(0) => {
                    println!("No conversation stored for {}", session_id);
                    0
                }
                Ok(_) => {
                    println!("Deleted conversation {}", session_id);
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            },
        },
        Commands::User { action } => match action {
            UserAction::Show { key } => match state.users.find(&key).await {
                Ok(Some(user)) => print_json(&user),
                Ok(None) => {
                    eprintln!("User {} not found.", key);
                    1
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            },
        },
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Failed to render JSON: {}", e);
            1
        }
    }
}
