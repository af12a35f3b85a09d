// Unit tests for calendar/event operations against the in-memory store

use calendar_backend::core::models::User;
use calendar_backend::core::repository::{CalendarRepository, EventDraft};
use calendar_backend::state::{InMemoryUserStore, UserStore};
use std::sync::Arc;
use uuid::Uuid;

async fn setup() -> (CalendarRepository, Arc<InMemoryUserStore>, Uuid) {
    let store = Arc::new(InMemoryUserStore::new());
    let user = User::new(
        "alice".to_string(),
        "alice@example.com".to_string(),
        "digest".to_string(),
    );
    store.insert_user(&user).await.unwrap();

    let repository = CalendarRepository::new(store.clone());
    (repository, store, user.id)
}

fn name(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn draft(title: &str, date: &str) -> Option<EventDraft> {
    Some(EventDraft {
        title: name(title),
        date: name(date),
        description: None,
    })
}

#[tokio::test]
async fn test_create_calendar_persists_aggregate() {
    let (repository, store, user_id) = setup().await;

    let calendars = repository.create_calendar(user_id, name("Work")).await.unwrap();
    assert_eq!(calendars.len(), 1);

    let stored = store.find_by_id(user_id).await.unwrap().unwrap();
    assert_eq!(stored.calendars, calendars);
}

#[tokio::test]
async fn test_create_calendar_requires_name() {
    let (repository, _, user_id) = setup().await;

    let err = repository.create_calendar(user_id, None).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.user_message(), "Calendar name is required");

    let err = repository.create_calendar(user_id, name("")).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (repository, _, _) = setup().await;

    let err = repository.list_calendars(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.user_message(), "User not found");
}

#[tokio::test]
async fn test_delete_calendar() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();
    repository.create_calendar(user_id, name("Home")).await.unwrap();

    repository.delete_calendar(user_id, name("Work")).await.unwrap();

    let calendars = repository.list_calendars(user_id).await.unwrap();
    assert_eq!(calendars.len(), 1);
    assert_eq!(calendars[0].name, "Home");
}

#[tokio::test]
async fn test_delete_missing_calendar_is_not_found() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();

    let err = repository.delete_calendar(user_id, name("Gym")).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(repository.list_calendars(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_calendar_requires_both_names() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();

    let err = repository
        .rename_calendar(user_id, name("Work"), None)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.user_message(), "Missing required field");
}

#[tokio::test]
async fn test_create_event_returns_event_with_id() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();

    let event = repository
        .create_event(user_id, name("Work"), draft("Standup", "2024-01-01"))
        .await
        .unwrap();

    let calendars = repository.list_calendars(user_id).await.unwrap();
    assert_eq!(calendars[0].events, vec![event]);
}

#[tokio::test]
async fn test_create_event_missing_calendar_checked_before_fields() {
    let (repository, _, user_id) = setup().await;

    let err = repository
        .create_event(user_id, name("Work"), draft("", ""))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_create_event_missing_event_payload() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();

    let err = repository
        .create_event(user_id, name("Work"), None)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_failed_create_event_does_not_persist() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();

    let err = repository
        .create_event(user_id, name("Work"), draft("Standup", "someday"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let calendars = repository.list_calendars(user_id).await.unwrap();
    assert!(calendars[0].events.is_empty());
}

#[tokio::test]
async fn test_delete_event_from_other_calendar_is_not_found() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();
    repository.create_calendar(user_id, name("Home")).await.unwrap();
    let event = repository
        .create_event(user_id, name("Home"), draft("Dinner", "2024-01-01"))
        .await
        .unwrap();

    let err = repository
        .delete_event(user_id, name("Work"), Some(event.id.to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    repository
        .delete_event(user_id, name("Home"), Some(event.id.to_string()))
        .await
        .unwrap();
    let calendars = repository.list_calendars(user_id).await.unwrap();
    assert!(calendars[1].events.is_empty());
}

#[tokio::test]
async fn test_edit_event_validates_before_loading() {
    let (repository, _, _) = setup().await;

    // Unknown user, but the empty patch is reported first
    let err = repository
        .edit_event(Uuid::new_v4(), name("Work"), name("id"), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.user_message(), "At least one field is required to make an edit");
}

#[tokio::test]
async fn test_edit_event_changes_only_supplied_field() {
    let (repository, _, user_id) = setup().await;
    repository.create_calendar(user_id, name("Work")).await.unwrap();
    let event = repository
        .create_event(user_id, name("Work"), draft("Standup", "2024-01-01"))
        .await
        .unwrap();

    repository
        .edit_event(user_id, name("Work"), Some(event.id.to_string()), None, name("Daily"))
        .await
        .unwrap();

    let calendars = repository.list_calendars(user_id).await.unwrap();
    let edited = &calendars[0].events[0];
    assert_eq!(edited.id, event.id);
    assert_eq!(edited.title, "Standup");
    assert_eq!(edited.date, event.date);
    assert_eq!(edited.description.as_deref(), Some("Daily"));
}
