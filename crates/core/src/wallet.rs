//! Wallet ledgers.
//!
//! A ledger is an opening balance plus a list of transactions, newest first.
//! Only completed transactions move the balance; pending ones are reported
//! separately.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OrderId, Price, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Withdrawal,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Withdrawal => "withdrawal",
        }
    }

    /// Whether the transaction takes money out of the wallet.
    #[must_use]
    pub const fn is_outflow(self) -> bool {
        !matches!(self, Self::Income)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

/// One ledger entry. `amount` is always positive; `kind` gives the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Price,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

impl Transaction {
    /// Amount with its sign: positive for income, negative otherwise.
    #[must_use]
    pub fn signed_amount(&self) -> Price {
        if self.kind.is_outflow() {
            Price::ZERO - self.amount
        } else {
            self.amount
        }
    }
}

/// Errors from wallet operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount cannot exceed {max}", max = Price::MAX)]
    AmountTooLarge,
    #[error("a payment method is required")]
    MissingMethod,
    #[error("insufficient balance: {available} available")]
    InsufficientFunds { available: Price },
}

/// A withdrawal or top-up request from a form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransferRequest {
    pub amount: Price,
    pub method: String,
}

impl TransferRequest {
    fn validate(&self) -> Result<&str, WalletError> {
        if !self.amount.is_positive() {
            return Err(WalletError::NonPositiveAmount);
        }
        if !self.amount.is_within_limit() {
            return Err(WalletError::AmountTooLarge);
        }
        let method = self.method.trim();
        if method.is_empty() {
            return Err(WalletError::MissingMethod);
        }
        Ok(method)
    }
}

/// Ledger filter on kind and status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LedgerFilter {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl LedgerFilter {
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let pick = |v: &Option<String>| v.clone().filter(|v| !v.is_empty() && v != "all");
        pick(&self.kind).is_none_or(|k| k == transaction.kind.as_str())
            && pick(&self.status).is_none_or(|s| s == transaction.status.as_str())
    }
}

/// A wallet: opening balance plus transactions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub opening_balance: Price,
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    #[must_use]
    pub fn new(opening_balance: Price) -> Self {
        Self {
            opening_balance,
            transactions: Vec::new(),
        }
    }

    fn completed(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed)
    }

    /// Opening balance plus completed income minus completed outflows.
    #[must_use]
    pub fn balance(&self) -> Price {
        self.opening_balance + self.completed().map(Transaction::signed_amount).sum::<Price>()
    }

    /// Completed income dated `day`.
    #[must_use]
    pub fn income_on(&self, day: NaiveDate) -> Price {
        self.completed()
            .filter(|t| t.kind == TransactionKind::Income && t.date.date_naive() == day)
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of completed transactions of `kind`.
    #[must_use]
    pub fn completed_total(&self, kind: TransactionKind) -> Price {
        self.completed()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    /// Net of pending transactions: income positive, outflows negative.
    #[must_use]
    pub fn pending_amount(&self) -> Price {
        self.transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Pending)
            .map(Transaction::signed_amount)
            .sum()
    }

    #[must_use]
    pub fn filtered(&self, filter: &LedgerFilter) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    fn record(&mut self, transaction: Transaction) -> Transaction {
        self.transactions.insert(0, transaction.clone());
        transaction
    }

    /// Record a pending withdrawal at the top of the ledger.
    ///
    /// # Errors
    ///
    /// Returns a [`WalletError`] for a non-positive amount, a blank method or
    /// an amount above the current balance.
    pub fn request_withdrawal(
        &mut self,
        id: TransactionId,
        request: &TransferRequest,
        now: DateTime<Utc>,
    ) -> Result<Transaction, WalletError> {
        let method = request.validate()?;
        let available = self.balance();
        if request.amount > available {
            return Err(WalletError::InsufficientFunds { available });
        }

        Ok(self.record(Transaction {
            id,
            kind: TransactionKind::Withdrawal,
            amount: request.amount,
            description: format!("Withdrawal to {method}"),
            category: "Transfer".to_owned(),
            date: now,
            status: TransactionStatus::Pending,
            payment_method: Some(method.to_owned()),
            order_id: None,
        }))
    }

    /// Credit the wallet from an external payment method.
    ///
    /// # Errors
    ///
    /// Returns a [`WalletError`] for a non-positive or oversized amount or a
    /// blank method.
    pub fn top_up(
        &mut self,
        id: TransactionId,
        request: &TransferRequest,
        now: DateTime<Utc>,
    ) -> Result<Transaction, WalletError> {
        let method = request.validate()?;
        Ok(self.record(Transaction {
            id,
            kind: TransactionKind::Income,
            amount: request.amount,
            description: "Wallet top-up".to_owned(),
            category: "Top-up".to_owned(),
            date: now,
            status: TransactionStatus::Completed,
            payment_method: Some(method.to_owned()),
            order_id: None,
        }))
    }

    /// Record a completed payment made from this wallet.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InsufficientFunds`] when the balance does not
    /// cover `amount`.
    pub fn pay(
        &mut self,
        id: TransactionId,
        amount: Price,
        description: impl Into<String>,
        order_id: Option<OrderId>,
        now: DateTime<Utc>,
    ) -> Result<Transaction, WalletError> {
        if !amount.is_positive() {
            return Err(WalletError::NonPositiveAmount);
        }
        if !amount.is_within_limit() {
            return Err(WalletError::AmountTooLarge);
        }
        let available = self.balance();
        if amount > available {
            return Err(WalletError::InsufficientFunds { available });
        }
        Ok(self.record(Transaction {
            id,
            kind: TransactionKind::Expense,
            amount,
            description: description.into(),
            category: "Orders".to_owned(),
            date: now,
            status: TransactionStatus::Completed,
            payment_method: Some("Wallet".to_owned()),
            order_id,
        }))
    }
}
