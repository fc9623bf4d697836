use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trip_planner::cache::{CacheConfig, CachedRouteStore};
use trip_planner::catalog::{InMemoryRouteStore, ResolverConfig};
use trip_planner::config::ServerConfig;
use trip_planner::fare::FareEstimator;
use trip_planner::geo::GeoIndex;
use trip_planner::notify::{ChannelNotifier, spawn_dispatcher};
use trip_planner::reservation::{InMemoryReservationStore, PaymentConfig};
use trip_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    // Seed the catalog if a file was given; otherwise every search synthesizes
    let catalog = match &config.routes_file {
        Some(path) => {
            let store = InMemoryRouteStore::from_json_file(path)?;
            info!(path = %path.display(), routes = store.route_count().await, "Loaded route catalog");
            store
        }
        None => {
            info!("No route catalog configured, starting empty");
            InMemoryRouteStore::empty()
        }
    };
    let cache_config = CacheConfig {
        ttl: config.cache_ttl,
        ..CacheConfig::default()
    };

    let geo = GeoIndex::tunisia();
    info!(locations = geo.len(), "Loaded location index");

    let (notifier, notifications) = ChannelNotifier::new();
    spawn_dispatcher(notifications);

    let state = AppState::new(
        geo,
        FareEstimator::default(),
        ResolverConfig::default(),
        CachedRouteStore::new(catalog, &cache_config),
        InMemoryReservationStore::new(),
        notifier,
        PaymentConfig {
            delay: config.payment_delay,
        },
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "Trip planner listening");
    info!("  GET   /health");
    info!("  GET   /api/locations?mode=&role=");
    info!("  GET   /api/routes/search?origin=&destination=&mode=&date=&time=&passengers=");
    info!("  GET   /api/reservations          POST /api/reservations");
    info!("  GET   /api/reservations/:id      PATCH /api/reservations/:id");
    info!("  POST  /api/reservations/:id/cancel | /status | /pay");

    axum::serve(listener, app).await?;
    Ok(())
}
