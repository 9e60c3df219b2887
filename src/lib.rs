//! Page Builder Backend - library for app logic and testing

pub mod blocks;
pub mod client;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod logging;
pub mod media;
pub mod render;
pub mod routes;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::{ConfigError, ServerConfig};
use crate::db::repository::{MemoryPageRepository, PageRepository, PgPageRepository};
use crate::logging::LogConfig;
use crate::routes::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configure CORS from the configured origins.
/// Falls back to the local builder front-end in development.
pub fn configure_cors(config: &ServerConfig) -> CorsLayer {
    let mut allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        allowed_origins = vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ];
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create and configure the application router.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let cors = configure_cors(config);
    tracing::info!(
        max_body_bytes = config.max_body_bytes,
        backend = state.pages.backend(),
        "Router configured"
    );

    Router::new()
        .route("/", get(|| async { Redirect::to("/forum") }))
        .route("/api/page", post(routes::pages::create_page))
        .route("/api/page/{id}", get(routes::pages::get_page))
        .route("/api/pages", get(routes::pages::list_pages))
        .route("/api/blocks", get(routes::blocks::list_blocks))
        .route("/forum", get(routes::views::gallery))
        .route("/view/{id}", get(routes::views::view_page))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/database", get(routes::health::health_database))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Pages embed images as data URIs, so the cap is configurable.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(cors)
}

/// PostgreSQL when `DATABASE_URL` is set and reachable, otherwise memory.
pub async fn init_repository() -> Arc<dyn PageRepository> {
    if std::env::var("DATABASE_URL").is_err() {
        tracing::warn!("DATABASE_URL not set. Pages are kept in memory and lost on restart.");
        return Arc::new(MemoryPageRepository::new());
    }

    match db::init_pool(None).await {
        Ok(pool) => match db::run_migrations(&pool).await {
            Ok(()) => return Arc::new(PgPageRepository::new(pool)),
            Err(e) => tracing::error!(error = %e, "Failed to run database migrations"),
        },
        Err(e) => tracing::error!(error = %e, "Failed to initialize database pool"),
    }

    tracing::warn!("Falling back to the in-memory page store");
    Arc::new(MemoryPageRepository::new())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Run the server (used by main).
pub async fn run() -> Result<(), ServerError> {
    dotenvy::dotenv().ok();

    // Held until the server stops so buffered log lines are flushed.
    let _log_guards = logging::init(&LogConfig::from_env());

    routes::health::init_start_time();

    let config = ServerConfig::from_env();
    let addr = config.socket_addr()?;

    let state = AppState::new(init_repository().await);
    let app = create_app(state, &config);

    tracing::info!(environment = %config.environment, "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Block, BlockKind};
    use crate::media::image_data_uri;
    use crate::routes::pages::{CreatePageRequest, CreatePageResponse, PageResponse};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(
            AppState::new(Arc::new(MemoryPageRepository::new())),
            &ServerConfig::default(),
        )
    }

    async fn body_bytes(res: axum::response::Response) -> axum::body::Bytes {
        axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let res = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_root_redirects_to_gallery() {
        let res = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/forum");
    }

    #[tokio::test]
    async fn test_large_inline_image_round_trips() {
        // ~3 MB of image payload, above axum's default extractor limit.
        let mut png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        png.resize(3 * 1024 * 1024, 0x42);
        let data_uri = image_data_uri(&png).unwrap();

        let request = CreatePageRequest {
            sections: Some(vec![Block::new(BlockKind::Hero)]),
            bg_image: Some(data_uri.clone()),
            ..CreatePageRequest::default()
        };
        let app = app();

        let res = app
            .clone()
            .oneshot(
                Request::post("/api/page")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let created: CreatePageResponse = serde_json::from_slice(&body_bytes(res).await).unwrap();

        let res = app
            .oneshot(
                Request::get(format!("/api/page/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let page: PageResponse = serde_json::from_slice(&body_bytes(res).await).unwrap();
        assert_eq!(page.bg_image.as_deref(), Some(data_uri.as_str()));
        assert_eq!(page.name, "Mon Portfolio");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let config = ServerConfig {
            max_body_bytes: 1024,
            ..ServerConfig::default()
        };
        let app = create_app(AppState::new(Arc::new(MemoryPageRepository::new())), &config);
        let body = format!(r#"{{"sections":[],"bgImage":"{}"}}"#, "a".repeat(4096));
        let res = app
            .oneshot(
                Request::post("/api/page")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
