// Postgres-backed user store: one row per user, calendars as a JSONB document

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::errors::ServiceError;
use crate::core::models::{Calendar, User};
use crate::state::UserStore;

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    calendars JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_AUDIT_TABLE: &str = "CREATE TABLE IF NOT EXISTS auth_audit_log (
    id BIGSERIAL PRIMARY KEY,
    event_type TEXT NOT NULL,
    subject TEXT,
    token_fingerprint TEXT,
    reason TEXT,
    ip_address TEXT,
    user_agent TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Database row structure for user lookup
#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    calendars: Json<Vec<Calendar>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            calendars: row.calendars.0,
            created_at: row.created_at,
        }
    }
}

/// Database-backed user store
pub struct PgUserStore {
    db_pool: PgPool,
}

impl PgUserStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create the tables this service needs if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), ServiceError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.db_pool).await?;
        sqlx::query(CREATE_AUDIT_TABLE).execute(&self.db_pool).await?;
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(&self, user: &User) -> Result<(), ServiceError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, calendars, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.calendars))
        .bind(user.created_at)
        .execute(&self.db_pool)
        .await?;

        debug!(user_id = %user.id, "User inserted");
        Ok(())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, calendars, created_at
             FROM users
             WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, calendars, created_at
             FROM users
             WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn save_user(&self, user: &User) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE users
             SET username = $2, email = $3, password_hash = $4, calendars = $5
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.calendars))
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
