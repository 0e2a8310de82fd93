use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lockbox_db::{PgStore, Store};
use lockbox_stress::harness::{run_concurrency_check, CheckConfig};
use lockbox_stress::seed::seed_demo;

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockbox_stress=debug,lockbox_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&database_url)
        .await
        .context("connecting to the database")?;

    let pg = PgStore::new(pool);
    pg.migrate().await.context("running migrations")?;
    let store: Arc<dyn Store> = Arc::new(pg);

    let mode = std::env::args().nth(1).unwrap_or_else(|| "check".to_string());
    match mode.as_str() {
        "seed" => seed_demo(store).await?,
        "check" => {
            let config = CheckConfig {
                lockers: env_usize("LOCKBOX_LOCKERS", 10),
                shipments: env_usize("LOCKBOX_SHIPMENTS", 50),
                workers: env_usize("LOCKBOX_WORKERS", 8),
            };
            let report = run_concurrency_check(store, config).await?;
            tracing::info!(
                confirmed = report.confirmed,
                exhausted = report.exhausted,
                errors = report.errors,
                violations = report.violations,
                "Concurrency check finished",
            );
            if report.violations > 0 {
                tracing::warn!(
                    violations = report.violations,
                    "Safety violations detected: duplicate confirmed occupants",
                );
            }
        }
        other => anyhow::bail!("unknown mode {other:?} (expected \"seed\" or \"check\")"),
    }
    Ok(())
}
