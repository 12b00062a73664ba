//! HTTP middleware stack for the web app.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, HSTS, etc.)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Role guard (inert unless enabled)
//! 7. Rate limiting on auth and JSON API routes (governor)

pub mod auth;
pub mod context;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    LOGIN_PATH, OptionalAuth, clear_current_user, role_guard_middleware, set_current_user,
};
pub use context::{PageContext, load_cart, save_cart, set_flash};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
