use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::CorsConfig;

/// Allow the configured frontend origin, with credentials
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = config.allowed_origin.parse()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true))
}
