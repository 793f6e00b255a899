//! Transaction categories.
//!
//! The ledger only knows four kinds of entries. Store documents spell them in
//! many ways (`Deposit`, `service_charge`, `bankFee`, ...), so every raw value
//! goes through [`Category::parse`] which normalizes it to a stable key first.
//! Anything outside the closed set is kept as [`Category::Unknown`] with the
//! original text so callers can report it.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Closed set of ledger categories.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Deposit,
    Withdrawal,
    ServiceCharge,
    Interest,
    /// Missing or unrecognized category, holding the trimmed raw value.
    Unknown(String),
}

impl Category {
    /// Parse a raw category value coming from the ledger store.
    ///
    /// Matching is case-insensitive and ignores accents and separators, so
    /// `"Service Charge"`, `"service_charge"` and `"SERVICE-CHARGE"` are the
    /// same key. Bank fee spellings share the service charge bucket.
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "deposit" => Self::Deposit,
            "withdrawal" | "withdraw" => Self::Withdrawal,
            "servicecharge" | "bankfee" | "fee" => Self::ServiceCharge,
            "interest" => Self::Interest,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    /// Canonical name, or the raw text for [`Category::Unknown`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::ServiceCharge => "service_charge",
            Self::Interest => "interest",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// `true` for the four known categories.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Lowercase, accent-free key with every non alphanumeric character dropped.
fn normalize_key(input: &str) -> String {
    input
        .trim()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch) && ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
