use anyhow::Context;
use listboard::configuration::{get_configuration, Settings, StoreBackend};
use listboard::db::{MemoryStore, PgStore, Store};
use listboard::startup::run;
use listboard::telemetry::{get_subscriber, init_subscriber};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

async fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn Store>> {
    match settings.store {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            tracing::info!(
                db_host = %settings.database.host,
                db_port = settings.database.port,
                db_name = %settings.database.database_name,
                "Connecting to PostgreSQL"
            );

            let connect_options = PgConnectOptions::new()
                .host(&settings.database.host)
                .port(settings.database.port)
                .username(&settings.database.username)
                .password(&settings.database.password)
                .database(&settings.database.database_name)
                .ssl_mode(PgSslMode::Disable);

            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(30))
                .connect_with(connect_options)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pg_pool)
                .await
                .context("Failed to migrate database")?;

            Ok(Arc::new(PgStore::new(pg_pool)))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("listboard".into(), "info".into());
    init_subscriber(subscriber)?;

    let settings = get_configuration().context("Failed to read configuration")?;
    let store = build_store(&settings).await?;

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("failed to bind to {}", address))?;

    run(listener, store, settings).await?.await?;
    Ok(())
}
