//! Domain models for the calendar backend.
//!
//! A [`User`] is the unit of persistence: it owns its calendars, which own
//! their events. Everything in this module is pure in-memory manipulation of
//! that aggregate; loading and saving happens in the repository layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::ServiceError;

/// User aggregate: credentials plus every calendar and event the user owns
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub calendars: Vec<Calendar>,
    pub created_at: DateTime<Utc>,
}

/// A named calendar embedded in its owner's aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A dated entry inside a calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated input for a new event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Partial update for an existing event. At least one field is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPatch {
    title: Option<String>,
    description: Option<String>,
}

impl User {
    /// Create a fresh user with no calendars
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            calendars: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Position of the first calendar whose name matches exactly
    pub fn calendar_index(&self, name: &str) -> Option<usize> {
        self.calendars.iter().position(|c| c.name == name)
    }

    /// Borrow a calendar by name for mutation
    pub fn calendar_mut(&mut self, name: &str) -> Result<&mut Calendar, ServiceError> {
        self.calendars
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(calendar_not_found)
    }

    /// Append an empty calendar. Names are unique within a user.
    pub fn add_calendar(&mut self, name: &str) -> Result<&Calendar, ServiceError> {
        if self.calendar_index(name).is_some() {
            return Err(ServiceError::Conflict(format!(
                "Calendar '{}' already exists",
                name
            )));
        }

        self.calendars.push(Calendar::new(name));
        Ok(&self.calendars[self.calendars.len() - 1])
    }

    /// Remove the first calendar with the given name
    pub fn remove_calendar(&mut self, name: &str) -> Result<Calendar, ServiceError> {
        let index = self.calendar_index(name).ok_or_else(calendar_not_found)?;
        Ok(self.calendars.remove(index))
    }

    /// Rename a calendar in place
    pub fn rename_calendar(&mut self, name: &str, new_name: &str) -> Result<(), ServiceError> {
        let index = self.calendar_index(name).ok_or_else(calendar_not_found)?;

        if let Some(existing) = self.calendar_index(new_name) {
            if existing != index {
                return Err(ServiceError::Conflict(format!(
                    "Calendar '{}' already exists",
                    new_name
                )));
            }
        }

        self.calendars[index].name = new_name.to_string();
        Ok(())
    }
}

impl Calendar {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            events: Vec::new(),
        }
    }

    /// Position of the event with the given identifier.
    ///
    /// Identifiers that do not parse as a UUID cannot belong to any event.
    pub fn event_index(&self, event_id: &str) -> Option<usize> {
        let id = Uuid::parse_str(event_id).ok()?;
        self.events.iter().position(|e| e.id == id)
    }

    /// Append an event with a freshly assigned identifier
    pub fn add_event(&mut self, new_event: NewEvent) -> &Event {
        self.events.push(Event {
            id: Uuid::new_v4(),
            title: new_event.title,
            date: new_event.date,
            description: new_event.description,
        });
        &self.events[self.events.len() - 1]
    }

    /// Remove an event by identifier
    pub fn remove_event(&mut self, event_id: &str) -> Result<Event, ServiceError> {
        let index = self.event_index(event_id).ok_or_else(event_not_found)?;
        Ok(self.events.remove(index))
    }

    /// Borrow an event by identifier for mutation
    pub fn event_mut(&mut self, event_id: &str) -> Result<&mut Event, ServiceError> {
        let index = self.event_index(event_id).ok_or_else(event_not_found)?;
        Ok(&mut self.events[index])
    }
}

impl Event {
    /// Apply only the fields present in the patch
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

impl NewEvent {
    /// Validate raw event input: title and date are required, date must parse
    pub fn from_parts(
        title: Option<String>,
        date: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ServiceError> {
        let title = non_empty(title)
            .ok_or_else(|| ServiceError::Validation("Event title is required".to_string()))?;
        let raw_date = non_empty(date)
            .ok_or_else(|| ServiceError::Validation("Event date is required".to_string()))?;
        let date = parse_event_date(&raw_date).ok_or_else(|| {
            ServiceError::Validation(format!("Invalid event date '{}'", raw_date))
        })?;

        Ok(Self {
            title,
            date,
            description: non_empty(description),
        })
    }
}

impl EventPatch {
    /// Build a patch; empty strings count as not supplied
    pub fn new(title: Option<String>, description: Option<String>) -> Result<Self, ServiceError> {
        let patch = Self {
            title: non_empty(title),
            description: non_empty(description),
        };

        if patch.title.is_none() && patch.description.is_none() {
            return Err(ServiceError::Validation(
                "At least one field is required to make an edit".to_string(),
            ));
        }

        Ok(patch)
    }
}

/// Parse an event date given either as RFC 3339 or as a plain `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Treat empty and whitespace-only strings as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn calendar_not_found() -> ServiceError {
    ServiceError::NotFound("Calendar not found".to_string())
}

fn event_not_found() -> ServiceError {
    ServiceError::NotFound("Event not found".to_string())
}
