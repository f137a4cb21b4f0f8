use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::db;

#[derive(Parser)]
#[command(name = "transaction-ledger")]
#[command(about = "Transaction ledger - CRUD API and dashboard summary over Postgres", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Print the resolved configuration
    Config,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Apply, revert or inspect migrations
    Migrate {
        #[arg(short, long, value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },

    /// Create the database if missing, then migrate it
    Setup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrateAction {
    Up,
    Down,
    Reset,
    Status,
}

pub async fn handle_db_migrate(config: &Config, action: MigrateAction) -> anyhow::Result<()> {
    let pool = db::create_pool(config).await?;

    match action {
        MigrateAction::Up => {
            tracing::info!("Running database migrations...");
            db::migrate_up(&pool).await?;
            println!("✓ Database migrations completed");
        }
        MigrateAction::Down => {
            tracing::info!("Reverting database migrations...");
            db::migrate_down(&pool).await?;
            println!("✓ Database migrations reverted");
        }
        MigrateAction::Reset => {
            tracing::info!("Resetting database...");
            db::migrate_reset(&pool).await?;
            println!("✓ Database reset completed");
        }
        MigrateAction::Status => print_status(&db::migration_status(&pool).await?),
    }

    pool.close().await;
    Ok(())
}

fn print_status(status: &db::SchemaStatus) {
    println!("Migrations:");
    for migration in &status.migrations {
        println!(
            "  {:<16} {:<30} {}",
            migration.version,
            migration.description,
            if migration.applied { "applied" } else { "pending" }
        );
    }

    if status.table_exists {
        println!("✓ transactions table exists ({} indexes)", status.index_count);
    } else {
        println!("✗ transactions table does not exist");
    }
}

pub async fn handle_db_setup(config: &Config) -> anyhow::Result<()> {
    if db::ensure_database(&config.database_url).await? {
        println!("✓ Database created");
    } else {
        println!("✓ Database already exists");
    }

    let pool = db::create_pool(config).await?;
    db::migrate_up(&pool).await?;
    pool.close().await;

    println!("✓ Database setup completed");
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Address: {}", config.server_addr());
    println!("  Database URL: {}", config.masked_database_url());
    println!(
        "  Pool: max {} / min {} connections",
        config.db_max_connections, config.db_min_connections
    );
    println!("  Log: {} ({:?})", config.log.level, config.log.format);
    println!("  Log Request Body: {}", config.log_request_body);
    match &config.cors_allowed_origins {
        Some(origins) => println!("  CORS Origins: {}", origins.join(", ")),
        None => println!("  CORS Origins: *"),
    }

    println!("✓ Configuration is valid");
    Ok(())
}
