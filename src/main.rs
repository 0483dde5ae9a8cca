use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use convokeep::api::{self, middleware::unhandled_errors, routes, AppState};
use convokeep::cli::{commands::{Cli, Commands}, run_cli};
use convokeep::config::AppConfig;
use convokeep::db;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        command => std::process::exit(run_cli(command, config).await),
    }
}

async fn serve(config: AppConfig) -> std::io::Result<()> {
    info!("Starting Convokeep API...");

    let db_pool = match db::get_connection(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let host = config.server.host.clone();
    let port = config.server.port;
    let cors_config = config.cors.clone();

    let state = match AppState::new(config, db_pool) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize completion client: {}", e);
            std::process::exit(1);
        }
    };
    if !state.completions.is_configured() {
        warn!("GROQ API key not configured; /api/groq/chat will answer 503");
    }

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .configure(|cfg| state.register(cfg))
            .wrap(unhandled_errors())
            .wrap(api::cors(&cors_config))
            .wrap(Logger::default())
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind((host, port))?
    .run()
    .await
}
