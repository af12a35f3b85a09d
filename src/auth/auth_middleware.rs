// Axum authentication middleware (bearer token gate)

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::responses::ApiError;
use crate::auth::audit_logger::{AuditContext, AuditLogger, AuthEvent};
use crate::auth::token::{token_fingerprint, TokenService};
use crate::core::errors::ServiceError;

/// Authentication state containing all dependencies
#[derive(Clone)]
pub struct AuthState {
    pub token_service: Arc<TokenService>,
    pub audit_logger: Arc<AuditLogger>,
}

/// Identity attached to a request that passed the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Authentication middleware function
///
/// Requires `Authorization: Bearer <token>`. A missing header or token is a
/// 401; a token that fails verification is a 403 carrying the reason. On
/// success the [`AuthenticatedUser`] is inserted into request extensions.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract bearer token from header
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token,
        Err(err) => {
            auth_state.audit_logger.log_auth_event(
                AuthEvent::TokenRejected { reason: err.user_message() },
                request_context(&request, None),
            );
            return Err(err.into());
        }
    };

    // 2. Verify signature and expiry
    let fingerprint = token_fingerprint(&token);
    let user_id = match auth_state.token_service.verify(&token) {
        Ok(user_id) => user_id,
        Err(reason) => {
            auth_state.audit_logger.log_auth_event(
                AuthEvent::TokenRejected { reason: reason.to_string() },
                request_context(&request, Some(fingerprint)),
            );
            return Err(ServiceError::Forbidden(reason).into());
        }
    };

    // 3. Log success
    let mut context = request_context(&request, Some(fingerprint));
    context.subject = Some(user_id.to_string());
    auth_state
        .audit_logger
        .log_auth_event(AuthEvent::TokenAccepted, context);

    // 4. Set identity for handlers and continue
    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ServiceError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ServiceError::Unauthenticated("No authorization header".to_string()))?;

    let value = value
        .to_str()
        .map_err(|_| ServiceError::Unauthenticated("No token provided".to_string()))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next();

    match token {
        Some(token) if scheme.eq_ignore_ascii_case("bearer") => Ok(token.to_string()),
        _ => Err(ServiceError::Unauthenticated("No token provided".to_string())),
    }
}

fn request_context(request: &Request, token_fingerprint: Option<String>) -> AuditContext {
    AuditContext {
        subject: None,
        token_fingerprint,
        ip_address: extract_ip_address(request.headers()),
        user_agent: extract_user_agent(request.headers()),
    }
}

/// Extract IP address from request headers
///
/// Checks `X-Forwarded-For` first (for proxied requests), then `X-Real-IP`.
pub fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-Forwarded-For")
        .or_else(|| headers.get("X-Real-IP"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract user agent from request headers
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
