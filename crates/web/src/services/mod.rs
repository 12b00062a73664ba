//! Outbound integrations.
//!
//! # Services
//!
//! - `user_api` - External user backend (register, login, verify, logout, OTP)

pub mod user_api;

pub use user_api::{ApiUser, AuthResponse, RegisterRequest, UserApiClient, UserApiError};
