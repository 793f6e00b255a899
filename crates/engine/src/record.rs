//! Transaction records.
//!
//! A [`TransactionRecord`] is one immutable ledger entry, already normalized
//! to canonical field names by the ledger adapter (see [`crate::ledger`]).
//! The record never carries a sign: whether `amount` credits or debits the
//! account is decided by its [`Category`] alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Category, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub account_id: String,
    /// Non-negative amount; `None` when the store value was missing or invalid.
    pub amount: Option<MoneyCents>,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
    pub description: Option<String>,
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        amount: Option<MoneyCents>,
        category: Category,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            amount,
            category,
            timestamp,
            description: None,
        }
    }

    /// Attach a free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
