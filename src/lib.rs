// Library root for the calendar backend

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infra;
pub mod state;
