//! Status enums and their lifecycles.
//!
//! Most statuses are plain display fixtures. Orders, restaurants and accounts
//! have a small workflow, expressed here as `apply`/`transition_to` methods
//! that reject moves the dashboards do not offer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status change that the workflow does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} {entity} in status '{from}'")]
pub struct StatusTransitionError {
    /// Entity kind, e.g. "order" or "restaurant".
    pub entity: &'static str,
    /// Status the entity was in.
    pub from: &'static str,
    /// What was attempted.
    pub action: String,
}

impl StatusTransitionError {
    fn new(entity: &'static str, from: &'static str, action: impl Into<String>) -> Self {
        Self {
            entity,
            from,
            action: action.into(),
        }
    }
}

// =============================================================================
// Roles
// =============================================================================

/// Account type chosen at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A consumer ordering food.
    #[default]
    User,
    /// A restaurant administrator.
    Admin,
    /// A platform operator.
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    /// All roles, in the order the login form lists them.
    pub const ALL: [Self; 3] = [Self::User, Self::Admin, Self::SuperAdmin];

    /// Landing route for this role.
    #[must_use]
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::User => "/recipes",
            Self::Admin => "/admin/dashboard",
            Self::SuperAdmin => "/superadmin/dashboard",
        }
    }

    /// Wire value (`user`, `admin`, `superadmin`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Kitchen status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The next step of the happy path, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Completed and cancelled orders never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Orders the kitchen still has to deal with.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Preparing | Self::Ready)
    }

    /// Move to `target`: either the next step or a cancellation.
    ///
    /// # Errors
    ///
    /// Returns an error for terminal orders and for skipped or backward steps.
    pub fn transition_to(self, target: Self) -> Result<Self, StatusTransitionError> {
        let allowed = !self.is_terminal()
            && (target == Self::Cancelled || self.next() == Some(target));
        if allowed {
            Ok(target)
        } else {
            Err(StatusTransitionError::new(
                "order",
                self.as_str(),
                format!("set status '{}' on", target.as_str()),
            ))
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeout,
    Delivery,
}

impl OrderType {
    pub const ALL: [Self; 3] = [Self::DineIn, Self::Takeout, Self::Delivery];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeout => "takeout",
            Self::Delivery => "delivery",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DineIn => "Dine-in",
            Self::Takeout => "Takeout",
            Self::Delivery => "Delivery",
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid order type: {s}"))
    }
}

/// Reception mode picked at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Pickup,
    #[default]
    Delivery,
}

impl DeliveryMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }
}

impl From<DeliveryMode> for OrderType {
    fn from(mode: DeliveryMode) -> Self {
        match mode {
            DeliveryMode::Pickup => Self::Takeout,
            DeliveryMode::Delivery => Self::Delivery,
        }
    }
}

/// Payment method recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    #[default]
    Card,
    Wallet,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Wallet => "wallet",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card (Guidini)",
            Self::Wallet => "Wallet",
        }
    }
}

// =============================================================================
// Restaurants and accounts
// =============================================================================

/// Onboarding status of a restaurant on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantStatus {
    #[default]
    Pending,
    Active,
    Suspended,
    Rejected,
}

/// Superadmin action on a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantAction {
    Approve,
    Reject,
    Suspend,
    Reactivate,
}

impl RestaurantStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Active, Self::Suspended, Self::Rejected];

    /// Apply a superadmin action.
    ///
    /// # Errors
    ///
    /// Returns an error when the action is not offered for the current status.
    pub fn apply(self, action: RestaurantAction) -> Result<Self, StatusTransitionError> {
        match (self, action) {
            (Self::Pending, RestaurantAction::Approve)
            | (Self::Suspended, RestaurantAction::Reactivate) => Ok(Self::Active),
            (Self::Pending, RestaurantAction::Reject) => Ok(Self::Rejected),
            (Self::Active, RestaurantAction::Suspend) => Ok(Self::Suspended),
            _ => Err(StatusTransitionError::new(
                "restaurant",
                self.as_str(),
                format!("{action:?}").to_lowercase(),
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Rejected => "rejected",
        }
    }

    /// Whether consumers can order from the restaurant.
    #[must_use]
    pub const fn accepts_orders(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Status of a consumer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Active,
    Banned,
}

/// Superadmin action on a consumer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerAction {
    Ban,
    Unban,
}

impl CustomerStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Banned];

    /// Apply a superadmin action.
    ///
    /// # Errors
    ///
    /// Returns an error when banning a banned account or unbanning an active one.
    pub fn apply(self, action: CustomerAction) -> Result<Self, StatusTransitionError> {
        match (self, action) {
            (Self::Active, CustomerAction::Ban) => Ok(Self::Banned),
            (Self::Banned, CustomerAction::Unban) => Ok(Self::Active),
            _ => Err(StatusTransitionError::new(
                "customer",
                self.as_str(),
                format!("{action:?}").to_lowercase(),
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
        }
    }
}

/// Status of a restaurant staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminStatus {
    #[default]
    Active,
    Suspended,
}

/// Superadmin action on a restaurant staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Suspend,
    Reactivate,
}

impl AdminStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Suspended];

    /// Apply a superadmin action.
    ///
    /// # Errors
    ///
    /// Returns an error when the account is already in the target status.
    pub fn apply(self, action: AdminAction) -> Result<Self, StatusTransitionError> {
        match (self, action) {
            (Self::Active, AdminAction::Suspend) => Ok(Self::Suspended),
            (Self::Suspended, AdminAction::Reactivate) => Ok(Self::Active),
            _ => Err(StatusTransitionError::new(
                "admin",
                self.as_str(),
                format!("{action:?}").to_lowercase(),
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

/// Role of a staff member inside their restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Owner,
    Manager,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "Owner"),
            Self::Manager => write!(f, "Manager"),
        }
    }
}

/// Availability of a delivery driver on the live tracking board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnRoute,
    Offline,
}

impl DriverStatus {
    pub const ALL: [Self; 3] = [Self::Available, Self::OnRoute, Self::Offline];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::OnRoute => "on_route",
            Self::Offline => "offline",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OnRoute => "On Route",
            Self::Offline => "Offline",
        }
    }
}
