use std::sync::Arc;

use anyhow::Context;
use aoi_store::ports::AoiRepository;
use aoi_store::MemoryAoiStore;
use axum::http::{header, HeaderName, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aoi_api::principal::{ROLE_HEADER, STATION_HEADER, SUBJECT_HEADER};
use aoi_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aoi_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let engine_config =
        config.load_engine_config().context("Failed to load engine configuration")?;

    tracing::info!(
        port = config.port,
        nearest_default_limit = engine_config.nearest_default_limit,
        nearest_max_limit = engine_config.nearest_max_limit,
        intersects_margin_deg = engine_config.intersects_margin_deg,
        "Starting AOI API server"
    );

    let store = match &config.seed_path {
        Some(path) => MemoryAoiStore::from_seed_file(path)
            .await
            .with_context(|| format!("Failed to load AOI seed file {}", path.display()))?,
        None => {
            tracing::info!("No AOI_SEED_PATH set, starting with an empty in-memory store");
            MemoryAoiStore::new()
        }
    };
    let repository: Arc<dyn AoiRepository> = Arc::new(store);

    let state = Arc::new(AppState::new(repository, engine_config));

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid AOI_CORS_ORIGIN '{}'", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ROLE_HEADER),
            HeaderName::from_static(STATION_HEADER),
            HeaderName::from_static(SUBJECT_HEADER),
        ]);

    let app = create_router(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
