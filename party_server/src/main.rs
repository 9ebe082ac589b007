//! Party registry server.
//!
//! Run from repo root: `cargo run -p party-server`
//! Configure through environment variables or a `.env` file (see `Settings`).

use axum::extract::Request;
use axum::ServiceExt;
use party_registry::{
    app, apply_migrations, ensure_database_exists, AppState, BcryptHasher, MemoryStore, PgStore, Settings,
    Store, StoreBackend,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("party_registry=info,party_server=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let store: Arc<dyn Store> = match settings.backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            apply_migrations(&pool, &settings.schema).await?;
            Arc::new(PgStore::new(pool, settings.schema.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };
    let state = AppState::new(store, Arc::new(BcryptHasher::new(settings.bcrypt_cost)));

    let app = app(state, &settings.http);
    let listener = TcpListener::bind(settings.http.bind_addr).await?;
    tracing::info!("party registry listening on http://{}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
