//! Ledger summary engine for family bank accounts.
//!
//! Records come from an external ledger store, are normalized at the
//! boundary by [`ledger`] and folded into a [`TransactionSummary`] per
//! account. Nothing here persists or caches: every call recomputes from the
//! records it is given.
//!
//! ```rust
//! use chrono::Utc;
//! use engine::{Category, MoneyCents, TransactionRecord, summarize};
//!
//! let now = Utc::now();
//! let records = vec![
//!     TransactionRecord::new("1", "kid", Some(MoneyCents::new(100_00)), Category::Deposit, now),
//!     TransactionRecord::new("2", "kid", Some(MoneyCents::new(2_50)), Category::Interest, now),
//! ];
//! let summary = summarize(&records);
//! assert_eq!(summary.balance(), MoneyCents::new(102_50));
//! ```

pub use category::Category;
pub use error::EngineError;
pub use history::{HistoryLine, chronological, running_balances};
pub use money::MoneyCents;
pub use record::TransactionRecord;
pub use summary::{
    Diagnostic, DiagnosticKind, TransactionSummary, log_diagnostics, summarize, summarize_by_account,
    summarize_with_diagnostics,
};

mod category;
mod error;
mod history;
pub mod ledger;
mod money;
mod record;
mod summary;
pub mod timestamp;

type ResultEngine<T> = Result<T, EngineError>;
