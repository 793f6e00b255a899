//! Turns a loaded ledger export into summary/history documents and renders
//! them.

use std::{collections::BTreeSet, io::Write};

use api_types::{
    history::{HistoryEntry, HistoryResponse},
    summary::{AccountSummary, SummaryResponse},
};
use engine::{
    Diagnostic, MoneyCents, TransactionRecord, ledger::{self, LoadReport}, log_diagnostics,
    running_balances, summarize_with_diagnostics,
};

use crate::error::Result;

/// Summaries for the selected account, or for every account in the export.
pub fn summaries(report: &LoadReport, account: Option<&str>) -> SummaryResponse {
    let account_ids: BTreeSet<&str> = match account {
        Some(account_id) => BTreeSet::from([account_id]),
        None => report
            .records
            .iter()
            .map(|record| record.account_id.as_str())
            .collect(),
    };

    let accounts = account_ids
        .into_iter()
        .map(|account_id| {
            let records: Vec<&TransactionRecord> =
                ledger::for_account(&report.records, account_id).collect();
            if records.is_empty() {
                tracing::warn!(account_id, "no records for account");
            }
            let (summary, diagnostics) = summarize_with_diagnostics(records);
            log_diagnostics(&diagnostics);

            AccountSummary {
                account_id: account_id.to_string(),
                deposits_minor: summary.deposits.cents(),
                withdrawals_minor: summary.withdrawals.cents(),
                service_charges_minor: summary.service_charges.cents(),
                interests_minor: summary.interests.cents(),
                balance_minor: summary.balance().cents(),
                excluded: diagnostics.len(),
            }
        })
        .collect();

    SummaryResponse {
        accounts,
        rejected: report.rejected.len(),
    }
}

/// Chronological history of one account with the balance after each record.
pub fn history(report: &LoadReport, account_id: &str) -> HistoryResponse {
    let lines = running_balances(ledger::for_account(&report.records, account_id));

    let diagnostics: Vec<Diagnostic> = lines
        .iter()
        .filter_map(|line| line.diagnostic.clone())
        .collect();
    log_diagnostics(&diagnostics);

    let entries = lines
        .into_iter()
        .map(|line| HistoryEntry {
            id: line.record.id.clone(),
            timestamp: line.record.timestamp,
            category: line.record.category.to_string(),
            amount_minor: line.record.amount.map(MoneyCents::cents),
            delta_minor: line.delta.cents(),
            balance_minor: line.balance.cents(),
            description: line.record.description.clone(),
            excluded: line.diagnostic.map(|diagnostic| diagnostic.kind.to_string()),
        })
        .collect();

    HistoryResponse {
        account_id: account_id.to_string(),
        entries,
    }
}

fn money(minor: i64) -> String {
    MoneyCents::new(minor).to_string()
}

pub fn write_summary_text<W: Write>(out: &mut W, response: &SummaryResponse) -> Result<()> {
    for account in &response.accounts {
        writeln!(out, "account {}", account.account_id)?;
        writeln!(out, "  deposits        {:>14}", money(account.deposits_minor))?;
        writeln!(out, "  withdrawals     {:>14}", money(account.withdrawals_minor))?;
        writeln!(
            out,
            "  service charges {:>14}",
            money(account.service_charges_minor)
        )?;
        writeln!(out, "  interests       {:>14}", money(account.interests_minor))?;
        writeln!(out, "  balance         {:>14}", money(account.balance_minor))?;
        if account.excluded > 0 {
            writeln!(out, "  ({} record(s) excluded)", account.excluded)?;
        }
    }
    if response.rejected > 0 {
        writeln!(out, "{} document(s) rejected", response.rejected)?;
    }
    Ok(())
}

pub fn write_history_text<W: Write>(out: &mut W, response: &HistoryResponse) -> Result<()> {
    writeln!(out, "account {}", response.account_id)?;
    for entry in &response.entries {
        let sign = if entry.delta_minor > 0 { "+" } else { "" };
        write!(
            out,
            "{}  {:<16} {:>14} {:>14}",
            entry.timestamp.to_rfc3339(),
            entry.category,
            format!("{sign}{}", money(entry.delta_minor)),
            money(entry.balance_minor)
        )?;
        if let Some(description) = &entry.description {
            write!(out, "  {description}")?;
        }
        if let Some(reason) = &entry.excluded {
            write!(out, "  [excluded: {reason}]")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
