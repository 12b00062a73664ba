//! Promotion codes.
//!
//! Promotions are created by superadmins and redeemed at checkout. A code is
//! looked up case-insensitively, then checked against its activity window,
//! usage limit and minimum order before a discount is computed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, PromotionId, RestaurantId};

/// How a promotion reduces the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// `value` percent off, capped by `max_discount`.
    #[default]
    Percentage,
    /// `value` dinars off.
    Fixed,
    /// Buy one get one: `value` percent off half the order.
    Bogo,
    /// Delivery fee waived.
    FreeDelivery,
}

impl PromotionKind {
    pub const ALL: [Self; 4] = [Self::Percentage, Self::Fixed, Self::Bogo, Self::FreeDelivery];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
            Self::Bogo => "bogo",
            Self::FreeDelivery => "free_delivery",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Percentage => "Percentage",
            Self::Fixed => "Fixed amount",
            Self::Bogo => "Buy one get one",
            Self::FreeDelivery => "Free delivery",
        }
    }
}

/// Which customers a promotion is advertised to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    #[default]
    All,
    New,
    Returning,
    Vip,
}

impl TargetAudience {
    pub const ALL: [Self; 4] = [Self::All, Self::New, Self::Returning, Self::Vip];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::New => "new",
            Self::Returning => "returning",
            Self::Vip => "vip",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All customers",
            Self::New => "New customers",
            Self::Returning => "Returning customers",
            Self::Vip => "VIP customers",
        }
    }
}

/// A promotion code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub kind: PromotionKind,
    pub value: Decimal,
    /// Always upper-case.
    pub code: String,
    #[serde(default)]
    pub min_order: Option<Price>,
    #[serde(default)]
    pub max_discount: Option<Price>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    pub is_active: bool,
    #[serde(default)]
    pub target_audience: TargetAudience,
    /// Restaurants the promotion applies to; empty means all.
    #[serde(default)]
    pub restaurants: Vec<RestaurantId>,
}

/// Why a code was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoRejection {
    #[error("Invalid promo code")]
    Unknown,
    #[error("This promo code is no longer active")]
    Inactive,
    #[error("This promo code is not valid yet")]
    NotStarted,
    #[error("This promo code has expired")]
    Expired,
    #[error("This promo code has reached its usage limit")]
    UsageLimitReached,
    #[error("Minimum order of {min} required")]
    BelowMinimum { min: Price },
    #[error("Order amount must be positive and at most {max}", max = Price::MAX)]
    InvalidAmount,
}

/// A successfully validated code and what it is worth for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromo {
    pub promotion_id: PromotionId,
    pub code: String,
    pub kind: PromotionKind,
    pub discount: Price,
}

impl AppliedPromo {
    /// Whether the delivery fee should be dropped.
    #[must_use]
    pub fn waives_delivery(&self) -> bool {
        self.kind == PromotionKind::FreeDelivery
    }
}

impl Promotion {
    /// Discount for an order of `amount`, ignoring eligibility.
    ///
    /// Never exceeds the order amount; rounded to centimes.
    #[must_use]
    pub fn discount_for(&self, amount: Price) -> Price {
        let raw = match self.kind {
            PromotionKind::Percentage => self.capped(amount.percent(self.value)),
            PromotionKind::Fixed => Price::new(self.value),
            PromotionKind::Bogo => {
                let half = Price::new(amount.amount() / Decimal::TWO);
                self.capped(half.percent(self.value))
            }
            PromotionKind::FreeDelivery => Price::ZERO,
        };
        raw.min(amount).max(Price::ZERO).round()
    }

    fn capped(&self, discount: Price) -> Price {
        match self.max_discount {
            Some(max) => discount.min(max),
            None => discount,
        }
    }

    /// Check eligibility for an order of `amount` placed on `today`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PromoRejection`] that applies, in this order:
    /// inactive, not started, expired, usage limit, below minimum,
    /// non-positive or out-of-range amount.
    pub fn check(&self, amount: Price, today: NaiveDate) -> Result<AppliedPromo, PromoRejection> {
        if !self.is_active {
            return Err(PromoRejection::Inactive);
        }
        if today < self.start_date {
            return Err(PromoRejection::NotStarted);
        }
        if today > self.end_date {
            return Err(PromoRejection::Expired);
        }
        if self.usage_limit.is_some_and(|limit| self.used_count >= limit) {
            return Err(PromoRejection::UsageLimitReached);
        }
        if let Some(min) = self.min_order.filter(|min| amount < *min) {
            return Err(PromoRejection::BelowMinimum { min });
        }
        if !amount.is_positive() || !amount.is_within_limit() {
            return Err(PromoRejection::InvalidAmount);
        }

        Ok(AppliedPromo {
            promotion_id: self.id.clone(),
            code: self.code.clone(),
            kind: self.kind,
            discount: self.discount_for(amount),
        })
    }

    /// Short human description of the benefit ("20% off", "Free delivery").
    #[must_use]
    pub fn value_label(&self) -> String {
        match self.kind {
            PromotionKind::Percentage => format!("{}% off", self.value.normalize()),
            PromotionKind::Fixed => format!("{} off", Price::new(self.value)),
            PromotionKind::Bogo => format!("BOGO {}% off", self.value.normalize()),
            PromotionKind::FreeDelivery => "Free delivery".to_owned(),
        }
    }

    /// Remaining uses, if limited.
    #[must_use]
    pub fn remaining_uses(&self) -> Option<u32> {
        self.usage_limit
            .map(|limit| limit.saturating_sub(self.used_count))
    }

    /// Flip the active flag, returning the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }

    /// Re-check the code for an order of `amount` and count one use.
    ///
    /// # Errors
    ///
    /// Returns the [`PromoRejection`] from [`Promotion::check`]; the use is
    /// not counted then.
    pub fn redeem(
        &mut self,
        amount: Price,
        today: NaiveDate,
    ) -> Result<AppliedPromo, PromoRejection> {
        let applied = self.check(amount, today)?;
        self.used_count = self.used_count.saturating_add(1);
        Ok(applied)
    }

    /// Give back a use counted by [`Promotion::redeem`].
    pub fn release(&mut self) {
        self.used_count = self.used_count.saturating_sub(1);
    }
}

/// Normalize a user-typed code for lookup.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Look up `code` among `promotions` and validate it for an order.
///
/// # Errors
///
/// Returns [`PromoRejection::Unknown`] when no promotion has this code, or
/// whatever [`Promotion::check`] rejects.
pub fn validate_code(
    promotions: &[Promotion],
    code: &str,
    amount: Price,
    today: NaiveDate,
) -> Result<AppliedPromo, PromoRejection> {
    let code = normalize_code(code);
    promotions
        .iter()
        .find(|promo| promo.code == code)
        .ok_or(PromoRejection::Unknown)?
        .check(amount, today)
}

/// Errors from creating a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionDraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("end date must not be before start date")]
    EndBeforeStart,
    #[error("value cannot be negative")]
    NegativeValue,
    #[error("percentage cannot exceed 100")]
    PercentageTooLarge,
    #[error("promo code {0} already exists")]
    DuplicateCode(String),
}

/// Form input for a new promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromotionDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: PromotionKind,
    #[serde(default)]
    pub value: Decimal,
    pub code: String,
    #[serde(default)]
    pub min_order: Option<Price>,
    #[serde(default)]
    pub max_discount: Option<Price>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    /// Defaults to active.
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub target_audience: TargetAudience,
}

impl PromotionDraft {
    /// Validate the draft and build a promotion with a fresh usage count.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionDraftError`] for missing fields, inverted dates,
    /// out-of-range values or a code that is already taken.
    pub fn into_promotion(
        self,
        id: PromotionId,
        existing: &[Promotion],
    ) -> Result<Promotion, PromotionDraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(PromotionDraftError::MissingField("title"));
        }
        let code = normalize_code(&self.code);
        if code.is_empty() {
            return Err(PromotionDraftError::MissingField("code"));
        }
        let start_date = self
            .start_date
            .ok_or(PromotionDraftError::MissingField("start date"))?;
        let end_date = self
            .end_date
            .ok_or(PromotionDraftError::MissingField("end date"))?;
        if end_date < start_date {
            return Err(PromotionDraftError::EndBeforeStart);
        }
        if self.value < Decimal::ZERO {
            return Err(PromotionDraftError::NegativeValue);
        }
        if matches!(self.kind, PromotionKind::Percentage | PromotionKind::Bogo)
            && self.value > Decimal::ONE_HUNDRED
        {
            return Err(PromotionDraftError::PercentageTooLarge);
        }
        if existing.iter().any(|promo| promo.code == code) {
            return Err(PromotionDraftError::DuplicateCode(code));
        }

        Ok(Promotion {
            id,
            title: title.to_owned(),
            description: self.description.trim().to_owned(),
            kind: self.kind,
            value: self.value,
            code,
            min_order: self.min_order,
            max_discount: self.max_discount,
            start_date,
            end_date,
            usage_limit: self.usage_limit,
            used_count: 0,
            is_active: self.is_active.unwrap_or(true),
            target_audience: self.target_audience,
            restaurants: Vec::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn welcome() -> Promotion {
        Promotion {
            id: PromotionId::new("1"),
            title: "Welcome Bonus".to_owned(),
            description: "20% off your first order".to_owned(),
            kind: PromotionKind::Percentage,
            value: Decimal::from(20),
            code: "WELCOME20".to_owned(),
            min_order: Some(Price::from_dinars(1500)),
            max_discount: Some(Price::from_dinars(1000)),
            start_date: date(2026, 1, 1),
            end_date: date(2026, 12, 31),
            usage_limit: Some(1000),
            used_count: 245,
            is_active: true,
            target_audience: TargetAudience::New,
            restaurants: Vec::new(),
        }
    }

    fn today() -> NaiveDate {
        date(2026, 6, 15)
    }

    #[test]
    fn test_percentage_discount() {
        let applied = validate_code(&[welcome()], "welcome20", Price::from_dinars(2800), today())
            .unwrap();
        assert_eq!(applied.discount, Price::from_dinars(560));
        assert_eq!(applied.code, "WELCOME20");
    }

    #[test]
    fn test_percentage_discount_is_capped() {
        let applied = welcome().check(Price::from_dinars(9000), today()).unwrap();
        assert_eq!(applied.discount, Price::from_dinars(1000));
    }

    #[test]
    fn test_code_lookup_trims_and_ignores_case() {
        assert!(validate_code(&[welcome()], "  Welcome20 ", Price::from_dinars(2000), today()).is_ok());
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            validate_code(&[welcome()], "NOPE", Price::from_dinars(2000), today()),
            Err(PromoRejection::Unknown)
        );
    }

    #[test]
    fn test_rejection_order() {
        let mut promo = welcome();
        promo.is_active = false;
        promo.used_count = 1000;
        assert_eq!(
            promo.check(Price::from_dinars(10), today()),
            Err(PromoRejection::Inactive)
        );

        promo.is_active = true;
        assert_eq!(
            promo.check(Price::from_dinars(10), date(2025, 12, 31)),
            Err(PromoRejection::NotStarted)
        );
        assert_eq!(
            promo.check(Price::from_dinars(10), date(2027, 1, 1)),
            Err(PromoRejection::Expired)
        );
        assert_eq!(
            promo.check(Price::from_dinars(10), today()),
            Err(PromoRejection::UsageLimitReached)
        );

        promo.used_count = 0;
        assert_eq!(
            promo.check(Price::from_dinars(10), today()),
            Err(PromoRejection::BelowMinimum {
                min: Price::from_dinars(1500)
            })
        );

        promo.min_order = None;
        assert_eq!(
            promo.check(Price::ZERO, today()),
            Err(PromoRejection::InvalidAmount)
        );
    }

    #[test]
    fn test_huge_order_amount_is_rejected() {
        let promo = welcome();
        let huge = Price::new(Decimal::from_str("70000000000000000000000000000").unwrap());
        assert_eq!(promo.check(huge, today()), Err(PromoRejection::InvalidAmount));
        assert!(promo.check(Price::MAX, today()).is_ok());

        // Discounts stay finite even past the input limit.
        assert!(promo.discount_for(huge) <= huge);
    }

    #[test]
    fn test_window_is_inclusive() {
        let promo = welcome();
        assert!(promo.check(Price::from_dinars(2000), date(2026, 1, 1)).is_ok());
        assert!(promo.check(Price::from_dinars(2000), date(2026, 12, 31)).is_ok());
    }

    #[test]
    fn test_fixed_discount_never_exceeds_amount() {
        let mut promo = welcome();
        promo.kind = PromotionKind::Fixed;
        promo.value = Decimal::from(500);
        promo.min_order = None;
        assert_eq!(
            promo.discount_for(Price::from_dinars(2000)),
            Price::from_dinars(500)
        );
        assert_eq!(
            promo.discount_for(Price::from_dinars(300)),
            Price::from_dinars(300)
        );
    }

    #[test]
    fn test_bogo_discount_is_percent_of_half() {
        let mut promo = welcome();
        promo.kind = PromotionKind::Bogo;
        promo.value = Decimal::from(50);
        promo.max_discount = None;
        assert_eq!(
            promo.discount_for(Price::from_dinars(2400)),
            Price::from_dinars(600)
        );
    }

    #[test]
    fn test_free_delivery_is_valid_with_zero_discount() {
        let mut promo = welcome();
        promo.kind = PromotionKind::FreeDelivery;
        promo.value = Decimal::ZERO;
        let applied = promo.check(Price::from_dinars(3000), today()).unwrap();
        assert_eq!(applied.discount, Price::ZERO);
        assert!(applied.waives_delivery());
    }

    #[test]
    fn test_toggle_and_redeem() {
        let mut promo = welcome();
        assert!(!promo.toggle());
        assert!(promo.toggle());
        promo.redeem(Price::from_dinars(2000), today()).unwrap();
        assert_eq!(promo.used_count, 246);
        assert_eq!(promo.remaining_uses(), Some(754));
        promo.release();
        assert_eq!(promo.used_count, 245);
    }

    #[test]
    fn test_redeem_stops_at_usage_limit() {
        let mut promo = welcome();
        promo.usage_limit = Some(1);
        promo.used_count = 0;
        let amount = Price::from_dinars(2000);

        assert!(promo.redeem(amount, today()).is_ok());
        assert_eq!(
            promo.redeem(amount, today()),
            Err(PromoRejection::UsageLimitReached)
        );
        assert_eq!(promo.used_count, 1);
    }

    #[test]
    fn test_value_label() {
        assert_eq!(welcome().value_label(), "20% off");
    }

    fn draft() -> PromotionDraft {
        PromotionDraft {
            title: "Ramadan Special".to_owned(),
            code: "ramadan10".to_owned(),
            value: Decimal::from(10),
            start_date: Some(date(2026, 3, 1)),
            end_date: Some(date(2026, 3, 30)),
            ..PromotionDraft::default()
        }
    }

    #[test]
    fn test_draft_upper_cases_code_and_starts_unused() {
        let promo = draft()
            .into_promotion(PromotionId::new("9"), &[welcome()])
            .unwrap();
        assert_eq!(promo.code, "RAMADAN10");
        assert_eq!(promo.used_count, 0);
        assert!(promo.is_active);
    }

    #[test]
    fn test_draft_requires_fields() {
        let mut missing_title = draft();
        missing_title.title = "  ".to_owned();
        assert_eq!(
            missing_title.into_promotion(PromotionId::new("9"), &[]),
            Err(PromotionDraftError::MissingField("title"))
        );

        let mut missing_end = draft();
        missing_end.end_date = None;
        assert_eq!(
            missing_end.into_promotion(PromotionId::new("9"), &[]),
            Err(PromotionDraftError::MissingField("end date"))
        );
    }

    #[test]
    fn test_draft_rejects_inverted_dates_and_duplicates() {
        let mut inverted = draft();
        inverted.end_date = Some(date(2026, 2, 1));
        assert_eq!(
            inverted.into_promotion(PromotionId::new("9"), &[]),
            Err(PromotionDraftError::EndBeforeStart)
        );

        let mut duplicate = draft();
        duplicate.code = "welcome20".to_owned();
        assert_eq!(
            duplicate.into_promotion(PromotionId::new("9"), &[welcome()]),
            Err(PromotionDraftError::DuplicateCode("WELCOME20".to_owned()))
        );
    }
}
