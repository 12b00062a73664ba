//! Accounts: consumers, restaurant staff, drivers, and the login forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::contains_ignore_case;
use crate::types::{
    AdminId, AdminStatus, CustomerId, CustomerStatus, DriverId, DriverStatus, Email, OrderId,
    PaymentMethod, Price, Role, StaffRole,
};

/// A consumer account as seen by the superadmin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub join_date: NaiveDate,
    pub status: CustomerStatus,
    pub total_orders: u32,
    pub total_spent: Price,
    pub last_order: Option<NaiveDate>,
}

/// A restaurant staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantAdmin {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Restaurant name, as displayed.
    pub restaurant: String,
    pub role: StaffRole,
    pub join_date: NaiveDate,
    pub status: AdminStatus,
    pub last_login: Option<NaiveDate>,
}

/// Search box plus status dropdown shared by the management tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountQuery {
    #[serde(default)]
    pub q: Option<String>,
    /// Status wire value; `all` or absent matches everything.
    #[serde(default)]
    pub status: Option<String>,
}

impl AccountQuery {
    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn status_matches(&self, status: &str) -> bool {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty() && *s != "all")
            .is_none_or(|s| s == status)
    }

    /// Match on name or e-mail.
    #[must_use]
    pub fn matches_customer(&self, customer: &Customer) -> bool {
        let text_ok = self.search().is_none_or(|q| {
            contains_ignore_case(&customer.name, q) || contains_ignore_case(&customer.email, q)
        });
        text_ok && self.status_matches(customer.status.as_str())
    }

    /// Match on name, e-mail or restaurant.
    #[must_use]
    pub fn matches_admin(&self, admin: &RestaurantAdmin) -> bool {
        let text_ok = self.search().is_none_or(|q| {
            contains_ignore_case(&admin.name, q)
                || contains_ignore_case(&admin.email, q)
                || contains_ignore_case(&admin.restaurant, q)
        });
        text_ok && self.status_matches(admin.status.as_str())
    }

    /// Match on restaurant or owner name.
    #[must_use]
    pub fn matches_restaurant(&self, restaurant: &crate::catalog::Restaurant) -> bool {
        let text_ok = self.search().is_none_or(|q| {
            contains_ignore_case(&restaurant.name, q) || contains_ignore_case(&restaurant.owner, q)
        });
        text_ok && self.status_matches(restaurant.status.as_str())
    }
}

// =============================================================================
// Live tracking
// =============================================================================

/// A delivery driver on the tracking board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub image: String,
    pub status: DriverStatus,
    /// Stars, 1 to 5.
    pub rating: u8,
}

/// Drivers whose name contains `query`, best rated first.
#[must_use]
pub fn search_drivers<'a>(drivers: &'a [Driver], query: &str) -> Vec<&'a Driver> {
    let query = query.trim();
    let mut found: Vec<&Driver> = drivers
        .iter()
        .filter(|driver| query.is_empty() || contains_ignore_case(&driver.name, query))
        .collect();
    found.sort_by(|a, b| b.rating.cmp(&a.rating));
    found
}

/// Status of a delivery on the tracking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// French label shown to drivers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::Preparing => "En préparation",
            Self::Ready => "Prête",
            Self::Delivered => "Livrée",
            Self::Cancelled => "Annulée",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A delivery on the tracking list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<String>,
    pub total: Price,
    pub status: DeliveryStatus,
    /// Wall-clock label such as "14:30".
    pub order_time: String,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Login and signup forms
// =============================================================================

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Raw login or signup form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialsInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Account type radio; empty when nothing was picked.
    #[serde(default, rename = "type")]
    pub account_type: String,
    /// Display name, signup only.
    #[serde(default)]
    pub name: String,
}

/// Per-field validation messages, rendered next to each input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub account_type: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.account_type.is_none()
    }
}

/// Validated credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
    pub role: Role,
    pub name: Option<String>,
}

impl CredentialsInput {
    /// Validate a login submission.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate_login(&self) -> Result<Credentials, FieldErrors> {
        self.validate(false)
    }

    /// Validate a signup submission; additionally enforces the password length.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate_signup(&self) -> Result<Credentials, FieldErrors> {
        self.validate(true)
    }

    fn validate(&self, signup: bool) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = if self.email.trim().is_empty() {
            errors.email = Some("Email requis".to_owned());
            None
        } else {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.email = Some("Email invalide".to_owned());
                    None
                }
            }
        };

        if self.password.is_empty() {
            errors.password = Some("Mot de passe requis".to_owned());
        } else if signup && self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.password = Some(format!("{MIN_PASSWORD_LENGTH} caractères min."));
        }

        let role = if self.account_type.is_empty() {
            errors.account_type = Some("Type requis".to_owned());
            None
        } else if let Ok(role) = self.account_type.parse::<Role>() {
            Some(role)
        } else {
            errors.account_type = Some("Type invalide".to_owned());
            None
        };

        match (email, role) {
            (Some(email), Some(role)) if errors.is_empty() => Ok(Credentials {
                email,
                password: self.password.clone(),
                role,
                name: Some(self.name.trim().to_owned()).filter(|n| !n.is_empty()),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn driver(id: &str, name: &str, rating: u8) -> Driver {
        Driver {
            id: DriverId::new(id),
            name: name.to_owned(),
            image: String::new(),
            status: DriverStatus::Available,
            rating,
        }
    }

    fn customer(name: &str, status: CustomerStatus) -> Customer {
        Customer {
            id: CustomerId::new("1"),
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: String::new(),
            address: String::new(),
            join_date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            status,
            total_orders: 0,
            total_spent: Price::ZERO,
            last_order: None,
        }
    }

    #[test]
    fn test_search_drivers_sorts_by_rating() {
        let drivers = [
            driver("1", "John Doe", 3),
            driver("2", "Ahmed Hasni", 5),
            driver("3", "Alice Hamoudi", 4),
        ];
        let names: Vec<&str> = search_drivers(&drivers, "")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, ["Ahmed Hasni", "Alice Hamoudi", "John Doe"]);

        assert_eq!(search_drivers(&drivers, "HAM").len(), 1);
    }

    #[test]
    fn test_account_query() {
        let alice = customer("Alice", CustomerStatus::Active);
        let carol = customer("Carol", CustomerStatus::Banned);

        let banned = AccountQuery {
            q: None,
            status: Some("banned".to_owned()),
        };
        assert!(!banned.matches_customer(&alice));
        assert!(banned.matches_customer(&carol));

        let by_email = AccountQuery {
            q: Some("alice@".to_owned()),
            status: Some("all".to_owned()),
        };
        assert!(by_email.matches_customer(&alice));
        assert!(!by_email.matches_customer(&carol));
    }

    fn input(email: &str, password: &str, account_type: &str) -> CredentialsInput {
        CredentialsInput {
            email: email.to_owned(),
            password: password.to_owned(),
            account_type: account_type.to_owned(),
            name: String::new(),
        }
    }

    #[test]
    fn test_login_validation_reports_every_field() {
        let errors = input("", "", "").validate_login().unwrap_err();
        assert_eq!(errors.email.as_deref(), Some("Email requis"));
        assert_eq!(errors.password.as_deref(), Some("Mot de passe requis"));
        assert_eq!(
            errors.account_type.as_deref(),
            Some("Type requis")
        );
    }

    #[test]
    fn test_login_rejects_malformed_email() {
        let errors = input("not-an-email", "secret", "user")
            .validate_login()
            .unwrap_err();
        assert_eq!(errors.email.as_deref(), Some("Email invalide"));
        assert!(errors.password.is_none());
    }

    #[test]
    fn test_short_password_only_fails_signup() {
        let form = input("chef@pizzapalace.dz", "abc", "admin");
        let credentials = form.validate_login().unwrap();
        assert_eq!(credentials.role, Role::Admin);

        let errors = form.validate_signup().unwrap_err();
        assert_eq!(
            errors.password.as_deref(),
            Some("6 caractères min.")
        );
    }
}
