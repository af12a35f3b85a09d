// Axum web server layer

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

pub mod handlers;
pub mod middleware;
pub mod requests;
pub mod responses;

use crate::auth::auth_middleware::{auth_middleware, AuthState};
use crate::core::accounts::AccountService;
use crate::core::repository::CalendarRepository;
use crate::state::UserStore;

pub use crate::config::Config;

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore + Send + Sync>,
    pub accounts: Arc<AccountService>,
    pub calendars: Arc<CalendarRepository>,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Timeout (tower::timeout) with `HandleErrorLayer`, 408 on expiry
/// - Tracing (tower-http::trace)
/// - CORS (tower-http::cors) for the configured frontend origin
/// - Body size limit (tower-http::limit)
/// - Auth middleware, on the calendar routes only
///
/// `/api/signup`, `/api/login` and `/health` are public. Unmatched paths fall
/// through to the static file directory.
pub fn create_router(app_state: &AppState, auth_state: Arc<AuthState>) -> Router<AppState> {
    let public = Router::new()
        .route("/api/signup", post(handlers::signup_handler))
        .route("/api/login", post(handlers::login_handler))
        .route("/health", get(handlers::health_handler));

    let protected = Router::new()
        .route("/api/createCalendar", post(handlers::create_calendar_handler))
        .route("/api/deleteCalendar", post(handlers::delete_calendar_handler))
        .route("/api/editCalendar", post(handlers::edit_calendar_handler))
        .route("/api/getCalendars", get(handlers::get_calendars_handler))
        .route("/api/createEvent", post(handlers::create_event_handler))
        .route("/api/deleteEvent", post(handlers::delete_event_handler))
        .route("/api/editEvent", post(handlers::edit_event_handler))
        .route_layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware));

    let config = &app_state.config;

    // Layers wrap in reverse order: the last one added runs first
    let middleware_stack = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(middleware::handle_middleware_error))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .into_inner();

    public
        .merge(protected)
        .fallback_service(middleware::static_files(config))
        .layer(RequestBodyLimitLayer::new(config.body_size_limit_bytes))
        .layer(middleware::cors_layer(config))
        .layer(middleware::tracing_layer())
        .layer(middleware_stack)
}
