//! Ledger-store boundary.
//!
//! Store documents come with historical field spellings (`transactionType`,
//! `transaction_type`, `type`, ...) and loosely typed values. Everything is
//! mapped to a canonical [`TransactionRecord`] here, so the summary engine
//! never sees legacy names.
//!
//! When a document carries more than one spelling of a field, the first
//! present one in the order listed below wins. Null and blank values count
//! as absent.
//!
//! | field         | spellings, by priority                                   |
//! |---------------|----------------------------------------------------------|
//! | `id`          | `id`, `_id`                                              |
//! | `account_id`  | `accountId`, `account_id`, `userId`, `user_id`           |
//! | `amount`      | `amount`                                                 |
//! | `category`    | `category`, `transactionType`, `transaction_type`, `type`|
//! | `timestamp`   | `timestamp`, `date`, `createdAt`, `created_at`           |
//! | `description` | `description`, `note`, `memo`                            |
//!
//! Two failure levels exist:
//! - a document without `id`, account or a usable timestamp is *rejected*
//!   and reported in [`LoadReport::rejected`];
//! - a bad amount or category is *kept* (`amount: None`,
//!   [`Category::Unknown`]) so the summary can report it.

use std::io::Read;

use serde_json::{Map, Value};

use crate::{
    Category, EngineError, MoneyCents, ResultEngine, TransactionRecord, timestamp::TimestampInput,
};

const ID_KEYS: &[&str] = &["id", "_id"];
const ACCOUNT_KEYS: &[&str] = &["accountId", "account_id", "userId", "user_id"];
const AMOUNT_KEYS: &[&str] = &["amount"];
const CATEGORY_KEYS: &[&str] = &["category", "transactionType", "transaction_type", "type"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "date", "createdAt", "created_at"];
const DESCRIPTION_KEYS: &[&str] = &["description", "note", "memo"];

/// A transaction document as stored, with its spellings resolved but its
/// values not yet validated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTransaction {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub amount: Option<Value>,
    pub category: Option<Value>,
    pub timestamp: Option<Value>,
    pub description: Option<String>,
}

impl From<&Map<String, Value>> for RawTransaction {
    fn from(document: &Map<String, Value>) -> Self {
        Self {
            id: pick_text(document, ID_KEYS),
            account_id: pick_text(document, ACCOUNT_KEYS),
            amount: pick(document, AMOUNT_KEYS).cloned(),
            category: pick(document, CATEGORY_KEYS).cloned(),
            timestamp: pick(document, TIMESTAMP_KEYS).cloned(),
            description: pick_text(document, DESCRIPTION_KEYS),
        }
    }
}

/// First present spelling of a field.
fn pick<'a>(document: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| document.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(text) => !text.trim().is_empty(),
            _ => true,
        })
}

/// Text field; numeric ids are accepted as their decimal text.
fn pick_text(document: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match pick(document, keys)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// A document that could not become a [`TransactionRecord`].
#[derive(Debug, PartialEq)]
pub struct Rejected {
    /// Position in the export (0-based, header excluded for CSV).
    pub index: usize,
    pub id: Option<String>,
    pub error: EngineError,
}

/// Outcome of loading a ledger export.
#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
    pub records: Vec<TransactionRecord>,
    pub rejected: Vec<Rejected>,
}

impl LoadReport {
    fn push(&mut self, index: usize, id: Option<String>, result: ResultEngine<TransactionRecord>) {
        match result {
            Ok(record) => self.records.push(record),
            Err(error) => {
                tracing::warn!(index, id = ?id, "rejected ledger document: {error}");
                self.rejected.push(Rejected { index, id, error });
            }
        }
    }

    fn finish(self, source: &str) -> Self {
        tracing::info!(
            source,
            loaded = self.records.len(),
            rejected = self.rejected.len(),
            "ledger export loaded"
        );
        self
    }
}

/// Map a raw store document to a canonical record.
pub fn normalize(raw: RawTransaction) -> ResultEngine<TransactionRecord> {
    let id = required_text(raw.id)
        .ok_or_else(|| EngineError::InvalidRecord("missing id".to_string()))?;
    let account_id = required_text(raw.account_id)
        .ok_or_else(|| EngineError::InvalidRecord(format!("{id}: missing account id")))?;

    let timestamp = raw
        .timestamp
        .ok_or_else(|| EngineError::InvalidRecord(format!("{id}: missing timestamp")))?;
    let timestamp = serde_json::from_value::<TimestampInput>(timestamp)
        .map_err(|err| EngineError::InvalidTimestamp(format!("{id}: {err}")))?
        .to_utc()?;

    let category = match raw.category {
        Some(Value::String(text)) => Category::parse(&text),
        Some(other) => Category::Unknown(other.to_string()),
        None => Category::default(),
    };

    let amount = raw.amount.as_ref().and_then(parse_amount);
    let record = TransactionRecord::new(id, account_id, amount, category, timestamp);
    Ok(match required_text(raw.description) {
        Some(description) => record.with_description(description),
        None => record,
    })
}

/// Interpret a loosely typed amount; `None` when it is not a number.
pub fn parse_amount(value: &Value) -> Option<MoneyCents> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(units) => units.checked_mul(100).map(MoneyCents::new),
            None => number.as_f64().and_then(MoneyCents::from_major_f64),
        },
        Value::String(text) => text.parse::<MoneyCents>().ok(),
        _ => None,
    }
}

fn required_text(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Load a JSON export: an array of transaction documents.
///
/// Any other top-level shape is a contract violation and fails the whole
/// call with [`EngineError::NotASequence`].
pub fn load_json<R: Read>(reader: R) -> ResultEngine<LoadReport> {
    let value: Value = serde_json::from_reader(reader)?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(EngineError::NotASequence(json_kind(&other).to_string())),
    };

    let mut report = LoadReport::default();
    for (index, item) in items.into_iter().enumerate() {
        let document = match item {
            Value::Object(document) => document,
            other => {
                let error = EngineError::InvalidRecord(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                ));
                report.push(index, None, Err(error));
                continue;
            }
        };
        let raw = RawTransaction::from(&document);
        report.push(index, raw.id.clone(), normalize(raw));
    }
    Ok(report.finish("json"))
}

/// Load a CSV export with a header row, using the same column spellings and
/// priorities as the JSON documents. Empty cells count as absent.
pub fn load_csv<R: Read>(reader: R) -> ResultEngine<LoadReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut report = LoadReport::default();
    for (index, row) in csv_reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                report.push(index, None, Err(err.into()));
                continue;
            }
        };
        let document: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        let raw = RawTransaction::from(&document);
        report.push(index, raw.id.clone(), normalize(raw));
    }
    Ok(report.finish("csv"))
}

/// Caller-side pre-filter: the records of one account.
pub fn for_account<'a>(
    records: &'a [TransactionRecord],
    account_id: &'a str,
) -> impl Iterator<Item = &'a TransactionRecord> + 'a {
    records
        .iter()
        .filter(move |record| record.account_id == account_id)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
