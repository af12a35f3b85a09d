// Security event logging

use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

/// Authentication event type
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// Username/password accepted, token issued
    LoginSuccess,
    /// Username/password rejected
    LoginFailure { reason: String },
    /// Auth gate let a request through
    TokenAccepted,
    /// Auth gate refused a request
    TokenRejected { reason: String },
}

impl AuthEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AuthEvent::LoginSuccess => "LOGIN_SUCCESS",
            AuthEvent::LoginFailure { .. } => "LOGIN_FAILURE",
            AuthEvent::TokenAccepted => "TOKEN_ACCEPTED",
            AuthEvent::TokenRejected { .. } => "TOKEN_REJECTED",
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            AuthEvent::LoginFailure { reason } | AuthEvent::TokenRejected { reason } => {
                Some(reason.as_str())
            }
            _ => None,
        }
    }
}

/// Context attached to an audit record
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    /// Username for logins, user id for token checks
    pub subject: Option<String>,
    /// Truncated SHA-256 of the presented token
    pub token_fingerprint: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Audit logger for security events
pub struct AuditLogger {
    db_pool: Option<Arc<PgPool>>,
}

impl AuditLogger {
    /// Create a new audit logger
    ///
    /// If `db_pool` is `None`, only structured logging will be used (no database persistence).
    pub fn new(db_pool: Option<Arc<PgPool>>) -> Self {
        Self { db_pool }
    }

    /// Log an authentication event
    ///
    /// This is fire-and-forget: it spawns an async task and doesn't block the request.
    /// Errors are logged but don't affect the request flow.
    pub fn log_auth_event(&self, event: AuthEvent, context: AuditContext) {
        let db_pool = self.db_pool.clone();

        tokio::spawn(async move {
            match event.reason() {
                None => info!(
                    event = event.event_type(),
                    subject = ?context.subject,
                    token = ?context.token_fingerprint,
                    ip_address = ?context.ip_address,
                    user_agent = ?context.user_agent,
                    "Authentication event"
                ),
                Some(reason) => warn!(
                    event = event.event_type(),
                    subject = ?context.subject,
                    token = ?context.token_fingerprint,
                    ip_address = ?context.ip_address,
                    user_agent = ?context.user_agent,
                    reason = %reason,
                    "Authentication rejected"
                ),
            }

            if let Some(pool) = db_pool {
                if let Err(e) = sqlx::query(
                    "INSERT INTO auth_audit_log
                        (event_type, subject, token_fingerprint, reason, ip_address, user_agent, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6, NOW())",
                )
                .bind(event.event_type())
                .bind(&context.subject)
                .bind(&context.token_fingerprint)
                .bind(event.reason())
                .bind(&context.ip_address)
                .bind(&context.user_agent)
                .execute(pool.as_ref())
                .await
                {
                    warn!(error = %e, "Failed to write audit log to database");
                }
            }
        });
    }
}
