// Middleware stack for browser access, observability, and static assets

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    BoxError,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::api::responses::ApiError;
use crate::config::Config;

/// Tracing middleware
///
/// Logs method, path, status and latency for every request.
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// CORS for the single configured frontend origin
///
/// Allows the `Authorization` and `Content-Type` headers the frontend sends.
/// `Access-Control-Allow-Origin` is only sent back to a matching `Origin`.
/// An origin that is not a valid header value disables cross-origin access.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match HeaderValue::from_str(config.cors_allowed_origin.trim_end_matches('/')) {
        Ok(origin) => AllowOrigin::list([origin]),
        Err(e) => {
            warn!(
                origin = %config.cors_allowed_origin,
                error = %e,
                "CORS origin is not a valid header value; cross-origin requests disabled"
            );
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Static file service for unmatched paths
pub fn static_files(config: &Config) -> ServeDir {
    ServeDir::new(&config.static_dir)
}

/// Turn errors raised by tower layers into the standard error envelope
///
/// Used with `HandleErrorLayer` in front of the request timeout.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string());
    }

    error!(error = %err, "Unhandled middleware error");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
}
