// Request bodies for API endpoints
//
// Every field is optional at the JSON level; presence is checked by the core
// so that a missing field is a 400 with a specific message rather than a
// deserialization failure.

use axum::extract::FromRequest;
use serde::Deserialize;

use crate::api::responses::ApiError;
use crate::auth::credentials::Password;
use crate::core::repository::EventDraft;

/// `Json` extractor whose rejections use the standard error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<Password>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<Password>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarRequest {
    pub calendar_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCalendarRequest {
    pub delete_calendar_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCalendarRequest {
    pub calendar_name: Option<String>,
    pub new_calendar_name: Option<String>,
}

/// Event payload nested inside `createEvent`
#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl From<EventBody> for EventDraft {
    fn from(body: EventBody) -> Self {
        EventDraft {
            title: body.title,
            date: body.date,
            description: body.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub calendar_name: Option<String>,
    pub event: Option<EventBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    pub calendar_name: Option<String>,
    pub event_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEventRequest {
    pub calendar_name: Option<String>,
    pub event_id: Option<String>,
    pub event_title: Option<String>,
    pub event_description: Option<String>,
}
