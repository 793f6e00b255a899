use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod summary {
    use super::*;

    /// Categorical totals of one account, in minor units (cents).
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AccountSummary {
        pub account_id: String,
        pub deposits_minor: i64,
        pub withdrawals_minor: i64,
        pub service_charges_minor: i64,
        pub interests_minor: i64,
        /// `deposits + interests - withdrawals - service_charges`.
        pub balance_minor: i64,
        /// Records left out of every bucket (missing amount, unknown category).
        pub excluded: usize,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub accounts: Vec<AccountSummary>,
        /// Store documents that could not be read at all.
        pub rejected: usize,
    }
}

pub mod history {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HistoryEntry {
        pub id: String,
        pub timestamp: DateTime<Utc>,
        pub category: String,
        /// Unsigned amount as recorded; `None` when the store value was unusable.
        pub amount_minor: Option<i64>,
        /// Signed change applied to the balance.
        pub delta_minor: i64,
        pub balance_minor: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        /// Why the record did not count, if it did not.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub excluded: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HistoryResponse {
        pub account_id: String,
        pub entries: Vec<HistoryEntry>,
    }
}
