//! Running balance per record.
//!
//! Unlike the totals, a running balance depends on order. Records are replayed
//! by `timestamp` ascending; records sharing a timestamp are ordered by `id`
//! so the history is the same no matter how the store returned them.

use std::cmp::Ordering;

use crate::{
    Diagnostic, MoneyCents, TransactionRecord,
    summary::{Totals, saturate},
};

/// One replayed record with its effect on the balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryLine<'a> {
    pub record: &'a TransactionRecord,
    /// Signed change applied by this record; zero when it was skipped.
    pub delta: MoneyCents,
    /// Balance right after this record.
    pub balance: MoneyCents,
    /// Set when the record was excluded from the totals.
    pub diagnostic: Option<Diagnostic>,
}

/// Chronological replay order: `timestamp`, then `id`.
pub fn chronological(a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.id.cmp(&b.id))
}

/// Replay the records of a single account and report the balance after each.
///
/// The last line's balance always equals `summarize(records).balance()`.
pub fn running_balances<'a, I>(records: I) -> Vec<HistoryLine<'a>>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut ordered: Vec<&TransactionRecord> = records.into_iter().collect();
    ordered.sort_by(|a, b| chronological(a, b));

    let mut totals = Totals::default();
    ordered
        .into_iter()
        .map(|record| {
            let before = totals.summary().balance();
            let diagnostic = totals.apply(record).err().map(|kind| Diagnostic {
                record_id: record.id.clone(),
                kind,
            });
            let after = totals.summary().balance();
            HistoryLine {
                record,
                delta: saturate(i128::from(after.cents()) - i128::from(before.cents())),
                balance: after,
                diagnostic,
            }
        })
        .collect()
}
