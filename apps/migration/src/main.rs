//! Applies the blog schema. Reads `DATABASE_URL` from the environment.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sea_orm_migration=info".into()),
        )
        .init();

    tracing::info!("Running blog migrations");
    cli::run_cli(migration::Migrator).await;
}
