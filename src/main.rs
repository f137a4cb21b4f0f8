use clap::Parser;
use tokio::net::TcpListener;

use transaction_ledger::cli::{Cli, Commands, DbCommands};
use transaction_ledger::config::Config;
use transaction_ledger::{cli, create_app, db, middleware, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.log)?;

    let args = Cli::parse();
    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate { action }) => cli::handle_db_migrate(&config, action).await,
        Commands::Db(DbCommands::Setup) => cli::handle_db_setup(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config).await?;
    db::migrate_up(&pool).await?;

    let mut state = AppState::new(pool.clone());
    state.log_request_body = config.log_request_body;

    let app = create_app(state).layer(middleware::cors::layer(
        config.cors_allowed_origins.as_deref(),
    ));

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
