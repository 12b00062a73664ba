//! Session-scoped models for the web app.
//!
//! Domain types (cart, orders, promotions, ...) live in `wakalni-core`;
//! this module only holds what the web layer keeps in the visitor session.

pub mod session;

pub use session::{CurrentUser, Flash, FlashKind, keys as session_keys};
