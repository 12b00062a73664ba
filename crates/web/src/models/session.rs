//! Session-related types.
//!
//! Types stored in the session: the signed-in identity, the cart, the
//! applied promo code and one-shot flash messages.

use serde::{Deserialize, Serialize};

use wakalni_core::{Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend or mock user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: String,
    /// Account type chosen at login.
    pub role: Role,
    /// Token issued by the external user backend, if one is configured.
    #[serde(default)]
    pub token: Option<String>,
}

impl CurrentUser {
    /// Key of this user's client wallet.
    #[must_use]
    pub fn wallet_key(&self) -> String {
        self.id.to_string()
    }

    /// Initials for the avatar fallback.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Tone of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A toast shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the cart.
    pub const CART: &str = "cart";

    /// Key for the promo code applied at checkout.
    pub const APPLIED_PROMO: &str = "applied_promo";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let user = CurrentUser {
            id: UserId::new("u1"),
            name: "yasmine ben ali".to_owned(),
            email: "yasmine@example.com".to_owned(),
            role: Role::User,
            token: None,
        };
        assert_eq!(user.initials(), "YB");
        assert_eq!(user.wallet_key(), "u1");
    }

    #[test]
    fn test_flash_constructors() {
        assert_eq!(Flash::success("ok").kind.as_str(), "success");
        assert_eq!(Flash::error("nope").kind, FlashKind::Error);
    }
}
