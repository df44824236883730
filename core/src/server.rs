//! Static server for the built frontend.
//!
//! # Endpoints
//!
//! | Method | Path       | Description                         |
//! |--------|------------|-------------------------------------|
//! | GET    | `/health`  | Health check                        |
//! | GET    | `/*`       | Files from the frontend build dir   |
//!
//! Every response carries cross-origin isolation headers
//! (`Cross-Origin-Opener-Policy: same-origin`,
//! `Cross-Origin-Embedder-Policy: require-corp`).

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::GalleryConfig;
use crate::error::{ServerError, ServerResult};

const COOP: &str = "cross-origin-opener-policy";
const COEP: &str = "cross-origin-embedder-policy";

/// Router serving `dist` with an SPA fallback to `index.html`.
pub fn router(dist: &Path, config: &GalleryConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let files = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));
    let health_config = config.clone();

    Router::new()
        .route("/health", get(move || health(health_config.clone())))
        .fallback_service(files)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(COOP),
            HeaderValue::from_static("same-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(COEP),
            HeaderValue::from_static("require-corp"),
        ))
        .layer(cors)
}

/// Serve `dist` on `port` until the process stops.
pub async fn start_server(port: u16, dist: PathBuf, config: GalleryConfig) -> ServerResult<()> {
    check_dist(&dist)?;

    let app = router(&dist, &config);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

    println!("🚀 Gallery running on http://localhost:{}", port);
    println!("   Serving:  {}", dist.display());
    println!("   Gateway:  {}", config.gateway);
    println!("   App-Name: {}", config.app_name);
    println!();

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))
}

fn check_dist(dist: &Path) -> ServerResult<()> {
    if dist.join("index.html").is_file() {
        Ok(())
    } else {
        Err(ServerError::MissingDist(dist.display().to_string()))
    }
}

async fn health(config: GalleryConfig) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "arweave-gallery",
        "version": env!("CARGO_PKG_VERSION"),
        "gateway": config.gateway,
        "appName": config.app_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_check_dist_requires_index() {
        let dir = tempdir().unwrap();
        assert!(matches!(check_dist(dir.path()), Err(ServerError::MissingDist(_))));

        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert!(check_dist(dir.path()).is_ok());
    }

    #[tokio::test]
    async fn test_health_reports_config() {
        let config = GalleryConfig::default().with_app_name("Test App");
        let Json(body) = health(config).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["appName"], "Test App");
        assert_eq!(body["gateway"], "https://arweave.net");
    }
}
