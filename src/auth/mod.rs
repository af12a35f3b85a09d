// Authentication: password hashing, identity tokens and the request gate

pub mod audit_logger;
pub mod auth_middleware;
pub mod credentials;
pub mod password;
pub mod token;
