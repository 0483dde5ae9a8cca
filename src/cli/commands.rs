use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "convokeep", version, about = "Convokeep conversation and profile API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    Serve,

    /// Inspect or delete stored conversations
    Conversation {
        #[command(subcommand)]
        action: ConversationAction,
    },

    /// Inspect stored user profiles
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
pub enum ConversationAction {
    /// List conversations, most recently updated first
    List {
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },

    /// Print a conversation as JSON
    Show {
        session_id: String,
    },

    /// Delete a conversation
    Delete {
        session_id: String,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Print a user profile as JSON
    Show {
        /// The identity key (`sub`, or email when no `sub` was given)
        key: String,
    },
}
