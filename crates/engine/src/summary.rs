//! Transaction summary engine.
//!
//! Folds the records of one account into per-category totals. The fold is
//! pure: same records in, same summary out, whatever their order. A record
//! that cannot be bucketed (no amount, unknown category, ...) contributes
//! nothing and is reported as a [`Diagnostic`] instead of failing the call.
//!
//! Totals are accumulated exactly in `i128` and only narrowed to
//! [`MoneyCents`] once the fold is over, so no record is ever excluded because
//! of what was folded before it. A total beyond the `i64` range saturates.

use std::collections::BTreeMap;

use crate::{Category, MoneyCents, TransactionRecord};

/// Categorical totals for one account.
///
/// The balance is never stored: [`TransactionSummary::balance`] derives it
/// from the four totals every time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TransactionSummary {
    pub deposits: MoneyCents,
    pub withdrawals: MoneyCents,
    pub service_charges: MoneyCents,
    pub interests: MoneyCents,
}

impl TransactionSummary {
    /// `deposits + interests - withdrawals - service_charges`, saturating at
    /// the `i64` cent range. Never panics, whatever the field values.
    #[must_use]
    pub fn balance(&self) -> MoneyCents {
        saturate(self.wide_balance())
    }

    /// Like [`balance`](Self::balance), but `None` when the exact result does
    /// not fit in [`MoneyCents`].
    #[must_use]
    pub fn checked_balance(&self) -> Option<MoneyCents> {
        i64::try_from(self.wide_balance()).ok().map(MoneyCents::new)
    }

    fn wide_balance(&self) -> i128 {
        i128::from(self.deposits.cents()) + i128::from(self.interests.cents())
            - i128::from(self.withdrawals.cents())
            - i128::from(self.service_charges.cents())
    }
}

/// Exact running totals, narrowed to a [`TransactionSummary`] at the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    deposits: i128,
    withdrawals: i128,
    service_charges: i128,
    interests: i128,
}

impl Totals {
    /// Add one record to its bucket, or explain why it was skipped.
    pub(crate) fn apply(&mut self, record: &TransactionRecord) -> Result<(), DiagnosticKind> {
        let bucket = match &record.category {
            Category::Deposit => &mut self.deposits,
            Category::Withdrawal => &mut self.withdrawals,
            Category::ServiceCharge => &mut self.service_charges,
            Category::Interest => &mut self.interests,
            Category::Unknown(raw) => return Err(DiagnosticKind::UnknownCategory(raw.clone())),
        };

        let amount = record.amount.ok_or(DiagnosticKind::MissingAmount)?;
        if amount.is_negative() {
            return Err(DiagnosticKind::NegativeAmount(amount));
        }
        *bucket += i128::from(amount.cents());
        Ok(())
    }

    pub(crate) fn summary(&self) -> TransactionSummary {
        TransactionSummary {
            deposits: saturate(self.deposits),
            withdrawals: saturate(self.withdrawals),
            service_charges: saturate(self.service_charges),
            interests: saturate(self.interests),
        }
    }
}

/// Narrow an exact cent amount, clamping to the `i64` range.
pub(crate) fn saturate(cents: i128) -> MoneyCents {
    let clamped = cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
    MoneyCents::new(i64::try_from(clamped).unwrap_or_default())
}

/// Why a record was left out of every bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    MissingAmount,
    NegativeAmount(MoneyCents),
    UnknownCategory(String),
}

/// A record excluded from the summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub record_id: String,
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAmount => f.write_str("missing or invalid amount"),
            Self::NegativeAmount(amount) => write!(f, "negative amount {amount}"),
            Self::UnknownCategory(raw) => write!(f, "unknown category {raw:?}"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record {}: {}", self.record_id, self.kind)
    }
}

/// Emit each diagnostic as a `warn` event.
pub fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        tracing::warn!(
            record_id = %diagnostic.record_id,
            kind = ?diagnostic.kind,
            "transaction excluded from summary: {}",
            diagnostic.kind
        );
    }
}

/// Fold the records of a single account into a [`TransactionSummary`],
/// returning the skipped records alongside.
///
/// Performs no I/O. The caller must have filtered the records by account.
pub fn summarize_with_diagnostics<'a, I>(records: I) -> (TransactionSummary, Vec<Diagnostic>)
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut totals = Totals::default();
    let mut diagnostics = Vec::new();
    for record in records {
        if let Err(kind) = totals.apply(record) {
            diagnostics.push(Diagnostic {
                record_id: record.id.clone(),
                kind,
            });
        }
    }
    (totals.summary(), diagnostics)
}

/// Fold the records of a single account into a [`TransactionSummary`].
///
/// Skipped records are reported as `warn` events and otherwise ignored.
pub fn summarize<'a, I>(records: I) -> TransactionSummary
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let (summary, diagnostics) = summarize_with_diagnostics(records);
    log_diagnostics(&diagnostics);
    if summary.checked_balance().is_none() {
        tracing::warn!(?summary, "balance exceeds the representable range, saturated");
    }
    summary
}

/// Group a mixed export by account and summarize each account.
pub fn summarize_by_account<'a, I>(records: I) -> BTreeMap<String, TransactionSummary>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut by_account: BTreeMap<&str, Vec<&TransactionRecord>> = BTreeMap::new();
    for record in records {
        by_account
            .entry(record.account_id.as_str())
            .or_default()
            .push(record);
    }

    by_account
        .into_iter()
        .map(|(account_id, records)| (account_id.to_string(), summarize(records)))
        .collect()
}
