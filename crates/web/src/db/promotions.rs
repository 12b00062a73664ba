//! Promotion code repository.

use chrono::NaiveDate;
use wakalni_core::promo::{self, AppliedPromo, PromoRejection, Promotion, PromotionDraft};
use wakalni_core::{Price, PromotionId};

use super::{RepositoryError, Store};

/// Repository for platform promotions.
pub struct PromotionRepository<'a> {
    store: &'a Store,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// All promotions, in creation order.
    pub async fn all(&self) -> Vec<Promotion> {
        self.store.promotions.read().await.clone()
    }

    /// Validate a customer-typed code for an order of `amount`.
    ///
    /// # Errors
    ///
    /// Returns the [`PromoRejection`] explaining why the code does not apply.
    pub async fn validate(
        &self,
        code: &str,
        amount: Price,
        today: NaiveDate,
    ) -> Result<AppliedPromo, PromoRejection> {
        let promotions = self.store.promotions.read().await;
        promo::validate_code(&promotions, code, amount, today)
    }

    /// Create a promotion from the superadmin form.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Promotion` when the draft is invalid or its
    /// code is taken.
    pub async fn create(&self, draft: PromotionDraft) -> Result<Promotion, RepositoryError> {
        let mut promotions = self.store.promotions.write().await;
        let id = PromotionId::new(self.store.next_id("PROMO-"));
        let promotion = draft.into_promotion(id, &promotions)?;
        promotions.push(promotion.clone());
        tracing::info!(code = %promotion.code, "Promotion created");
        Ok(promotion)
    }

    /// Flip a promotion's active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown promotion.
    pub async fn toggle(&self, id: &PromotionId) -> Result<Promotion, RepositoryError> {
        let mut promotions = self.store.promotions.write().await;
        let promotion = promotions
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| RepositoryError::not_found("promotion", id))?;
        promotion.toggle();
        Ok(promotion.clone())
    }

    /// Count one use of the promotion behind an applied code.
    ///
    /// Eligibility is checked again under the write lock, so concurrent
    /// checkouts cannot push a code past its usage limit.
    ///
    /// # Errors
    ///
    /// Returns [`PromoRejection::Unknown`] when the promotion is gone, or
    /// whatever [`Promotion::check`] rejects now.
    pub async fn redeem(
        &self,
        applied: &AppliedPromo,
        amount: Price,
        today: NaiveDate,
    ) -> Result<AppliedPromo, PromoRejection> {
        let mut promotions = self.store.promotions.write().await;
        let promotion = promotions
            .iter_mut()
            .find(|p| p.id == applied.promotion_id)
            .ok_or(PromoRejection::Unknown)?;
        let redeemed = promotion.redeem(amount, today)?;
        tracing::debug!(code = %promotion.code, used = promotion.used_count, "Promotion redeemed");
        Ok(redeemed)
    }

    /// Give back a use counted by [`PromotionRepository::redeem`].
    pub async fn release(&self, applied: &AppliedPromo) {
        let mut promotions = self.store.promotions.write().await;
        if let Some(promotion) = promotions.iter_mut().find(|p| p.id == applied.promotion_id) {
            promotion.release();
        }
    }
}
