// Request handlers for API endpoints
//
// Handlers only translate between JSON and the core; every failure is a
// `ServiceError` turned into the `{error, details?}` envelope by `ApiError`.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    Extension,
};
use tracing::{debug, warn};

use crate::api::requests::*;
use crate::api::responses::*;
use crate::api::AppState;
use crate::auth::audit_logger::AuditContext;
use crate::auth::auth_middleware::{extract_ip_address, extract_user_agent, AuthenticatedUser};

/// POST /api/signup
pub async fn signup_handler(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    app_state
        .accounts
        .signup(request.username, request.email, request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// POST /api/login
pub async fn login_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let context = AuditContext {
        ip_address: extract_ip_address(&headers),
        user_agent: extract_user_agent(&headers),
        ..Default::default()
    };

    let token = app_state
        .accounts
        .login(request.username, request.password, context)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// POST /api/createCalendar
pub async fn create_calendar_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateCalendarRequest>,
) -> Result<(StatusCode, Json<CalendarCreatedResponse>), ApiError> {
    let calendars = app_state
        .calendars
        .create_calendar(user.user_id, request.calendar_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CalendarCreatedResponse {
            message: "Calendar created successfully".to_string(),
            calendar: calendars,
        }),
    ))
}

/// POST /api/deleteCalendar
pub async fn delete_calendar_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<DeleteCalendarRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .calendars
        .delete_calendar(user.user_id, request.delete_calendar_name)
        .await?;

    Ok(Json(MessageResponse::new("Calendar deleted successfully")))
}

/// POST /api/editCalendar
pub async fn edit_calendar_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<EditCalendarRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .calendars
        .rename_calendar(user.user_id, request.calendar_name, request.new_calendar_name)
        .await?;

    Ok(Json(MessageResponse::new("Calendar updated successfully")))
}

/// GET /api/getCalendars
pub async fn get_calendars_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<CalendarsResponse>, ApiError> {
    let calendars = app_state.calendars.list_calendars(user.user_id).await?;
    debug!(user_id = %user.user_id, count = calendars.len(), "Calendars listed");

    Ok(Json(CalendarsResponse { calendars }))
}

/// POST /api/createEvent
pub async fn create_event_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> Result<Json<EventCreatedResponse>, ApiError> {
    let event = app_state
        .calendars
        .create_event(
            user.user_id,
            request.calendar_name,
            request.event.map(Into::into),
        )
        .await?;

    Ok(Json(EventCreatedResponse {
        message: "Event inserted successfully".to_string(),
        event,
    }))
}

/// POST /api/deleteEvent
pub async fn delete_event_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<DeleteEventRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .calendars
        .delete_event(user.user_id, request.calendar_name, request.event_id)
        .await?;

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// POST /api/editEvent
pub async fn edit_event_handler(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<EditEventRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .calendars
        .edit_event(
            user.user_id,
            request.calendar_name,
            request.event_id,
            request.event_title,
            request.event_description,
        )
        .await?;

    Ok(Json(MessageResponse::new("Event updated successfully")))
}

/// GET /health
pub async fn health_handler(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match app_state.user_store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                store: "connected".to_string(),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    store: "unavailable".to_string(),
                }),
            )
        }
    }
}
