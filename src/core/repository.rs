// Calendar and event operations over a user's stored aggregate

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::errors::ServiceError;
use crate::core::models::{non_empty, Calendar, Event, EventPatch, NewEvent, User};
use crate::state::UserStore;

/// Raw event fields as supplied by a client, validated in `create_event`
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Nested calendar/event logic.
///
/// Every mutation loads the whole user aggregate, finds the target by linear
/// scan, edits it in memory and writes the whole aggregate back.
pub struct CalendarRepository {
    store: Arc<dyn UserStore + Send + Sync>,
}

impl CalendarRepository {
    pub fn new(store: Arc<dyn UserStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Append an empty calendar and return the user's full calendar list
    pub async fn create_calendar(
        &self,
        user_id: Uuid,
        name: Option<String>,
    ) -> Result<Vec<Calendar>, ServiceError> {
        let name = required(name, "Calendar name is required")?;

        let mut user = self.load(user_id).await?;
        user.add_calendar(&name)?;
        self.store.save_user(&user).await?;

        info!(user_id = %user_id, calendar = %name, "Calendar created");
        Ok(user.calendars)
    }

    /// Remove the calendar with the given name
    pub async fn delete_calendar(
        &self,
        user_id: Uuid,
        name: Option<String>,
    ) -> Result<(), ServiceError> {
        let name = required(name, "Calendar name is required")?;

        let mut user = self.load(user_id).await?;
        let removed = user.remove_calendar(&name)?;
        self.store.save_user(&user).await?;

        info!(
            user_id = %user_id,
            calendar = %removed.name,
            events = removed.events.len(),
            "Calendar deleted"
        );
        Ok(())
    }

    /// Rename a calendar in place
    pub async fn rename_calendar(
        &self,
        user_id: Uuid,
        name: Option<String>,
        new_name: Option<String>,
    ) -> Result<(), ServiceError> {
        let name = required(name, "Missing required field")?;
        let new_name = required(new_name, "Missing required field")?;

        let mut user = self.load(user_id).await?;
        user.rename_calendar(&name, &new_name)?;
        self.store.save_user(&user).await?;

        info!(user_id = %user_id, from = %name, to = %new_name, "Calendar renamed");
        Ok(())
    }

    /// Every calendar with its events
    pub async fn list_calendars(&self, user_id: Uuid) -> Result<Vec<Calendar>, ServiceError> {
        let user = self.load(user_id).await?;
        Ok(user.calendars)
    }

    /// Append an event to the named calendar and return it with its new id
    pub async fn create_event(
        &self,
        user_id: Uuid,
        calendar_name: Option<String>,
        draft: Option<EventDraft>,
    ) -> Result<Event, ServiceError> {
        let calendar_name = required(calendar_name, "Missing required field")?;
        let draft =
            draft.ok_or_else(|| ServiceError::Validation("Missing required field".to_string()))?;

        let mut user = self.load(user_id).await?;
        let calendar = user.calendar_mut(&calendar_name)?;
        let new_event = NewEvent::from_parts(draft.title, draft.date, draft.description)?;
        let event = calendar.add_event(new_event).clone();
        self.store.save_user(&user).await?;

        info!(user_id = %user_id, calendar = %calendar_name, event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Remove an event; the id must belong to the named calendar
    pub async fn delete_event(
        &self,
        user_id: Uuid,
        calendar_name: Option<String>,
        event_id: Option<String>,
    ) -> Result<(), ServiceError> {
        let calendar_name = required(calendar_name, "Missing required field")?;
        let event_id = required(event_id, "Missing required field")?;

        let mut user = self.load(user_id).await?;
        user.calendar_mut(&calendar_name)?.remove_event(&event_id)?;
        self.store.save_user(&user).await?;

        info!(user_id = %user_id, calendar = %calendar_name, event_id = %event_id, "Event deleted");
        Ok(())
    }

    /// Change only the supplied fields of an event
    pub async fn edit_event(
        &self,
        user_id: Uuid,
        calendar_name: Option<String>,
        event_id: Option<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<(), ServiceError> {
        let calendar_name = required(calendar_name, "Missing required field")?;
        let event_id = required(event_id, "Missing required field")?;
        let patch = EventPatch::new(title, description)?;

        let mut user = self.load(user_id).await?;
        user.calendar_mut(&calendar_name)?
            .event_mut(&event_id)?
            .apply(patch);
        self.store.save_user(&user).await?;

        info!(user_id = %user_id, calendar = %calendar_name, event_id = %event_id, "Event updated");
        Ok(())
    }

    async fn load(&self, user_id: Uuid) -> Result<User, ServiceError> {
        let user = self.store.find_by_id(user_id).await?;
        user.ok_or_else(|| {
            debug!(user_id = %user_id, "Token refers to a user that no longer exists");
            ServiceError::NotFound("User not found".to_string())
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, ServiceError> {
    non_empty(value).ok_or_else(|| ServiceError::Validation(message.to_string()))
}
