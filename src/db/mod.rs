use sqlx::migrate::{MigrateDatabase, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;
use std::collections::HashSet;

use crate::config::Config;

pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect(&config.database_url)
        .await
}

pub async fn migrate_up(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Reverts every applied migration.
pub async fn migrate_down(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.undo(pool, 0).await?;
    tracing::info!("Database migrations reverted");
    Ok(())
}

pub async fn migrate_reset(pool: &PgPool) -> anyhow::Result<()> {
    migrate_down(pool).await?;
    migrate_up(pool).await
}

#[derive(Debug, Clone)]
pub struct MigrationState {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

#[derive(Debug, Clone)]
pub struct SchemaStatus {
    pub migrations: Vec<MigrationState>,
    pub table_exists: bool,
    pub index_count: i64,
}

pub async fn migration_status(pool: &PgPool) -> anyhow::Result<SchemaStatus> {
    let tracked: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await?;

    let applied: HashSet<i64> = if tracked {
        sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect()
    } else {
        HashSet::new()
    };

    let migrations = MIGRATOR
        .iter()
        .filter(|migration| !migration.migration_type.is_down_migration())
        .map(|migration| MigrationState {
            version: migration.version,
            description: migration.description.to_string(),
            applied: applied.contains(&migration.version),
        })
        .collect();

    let table_exists: bool = sqlx::query_scalar("SELECT to_regclass('transactions') IS NOT NULL")
        .fetch_one(pool)
        .await?;

    let index_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pg_indexes WHERE schemaname = current_schema() AND tablename = 'transactions'",
    )
    .fetch_one(pool)
    .await?;

    Ok(SchemaStatus {
        migrations,
        table_exists,
        index_count,
    })
}

/// Creates the database named in the URL when it does not exist yet.
/// Returns whether it had to be created.
pub async fn ensure_database(database_url: &str) -> anyhow::Result<bool> {
    if Postgres::database_exists(database_url).await? {
        tracing::info!("Database already exists");
        return Ok(false);
    }

    Postgres::create_database(database_url).await?;
    tracing::info!("Database created");
    Ok(true)
}
