use std::{net::SocketAddr, sync::Arc};

use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::TokenIssuer;
use service::marketplace::repo::seaorm::SeaOrmMarketplaceRepository;

use crate::routes;
use crate::state::ServerState;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "draining connections");
}

/// Connect the database, wire services and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "schema up to date");
    }

    let geocoder = service::geocoding::from_config(&cfg.geocoder)?;
    let state = ServerState::new(
        Arc::new(SeaOrmAuthRepository::new(db.clone())),
        Arc::new(SeaOrmMarketplaceRepository::new(db)),
        geocoder,
        TokenIssuer::from_config(&cfg.auth),
        &cfg.proximity,
    );

    let app = routes::build_router(state, build_cors());
    let addr = bind_addr(&cfg)?;
    info!(%addr, default_max_km = cfg.proximity.default_max_distance_km, "starting marketplace server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
