use chrono::{DateTime, Duration, TimeZone, Utc};

use engine::{
    Category, DiagnosticKind, MoneyCents, TransactionRecord, TransactionSummary, ledger,
    running_balances, summarize, summarize_with_diagnostics,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn tx(id: &str, amount: &str, category: &str) -> TransactionRecord {
    TransactionRecord::new(
        id,
        "alice",
        Some(amount.parse().unwrap()),
        Category::parse(category),
        base_time(),
    )
}

fn money(value: &str) -> MoneyCents {
    value.parse().unwrap()
}

/// Every ordering of `items`, by Heap's algorithm.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    fn heap<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
        if k <= 1 {
            out.push(items.clone());
            return;
        }
        heap(k - 1, items, out);
        for i in 0..k - 1 {
            let swap_with = if k % 2 == 0 { i } else { 0 };
            items.swap(swap_with, k - 1);
            heap(k - 1, items, out);
        }
    }
    let mut items = items.to_vec();
    let mut out = Vec::new();
    heap(items.len(), &mut items, &mut out);
    out
}

fn assert_balance_identity(summary: &TransactionSummary) {
    assert_eq!(
        summary.balance(),
        summary.deposits + summary.interests - summary.withdrawals - summary.service_charges
    );
}

#[test]
fn empty_input_is_all_zero() {
    let summary = summarize(&Vec::<TransactionRecord>::new());
    assert_eq!(summary, TransactionSummary::default());
    assert_eq!(summary.balance(), MoneyCents::ZERO);
}

#[test]
fn single_deposit() {
    let summary = summarize(&[tx("1", "100", "Deposit")]);
    assert_eq!(summary.deposits, money("100"));
    assert_eq!(summary.withdrawals, MoneyCents::ZERO);
    assert_eq!(summary.service_charges, MoneyCents::ZERO);
    assert_eq!(summary.interests, MoneyCents::ZERO);
    assert_eq!(summary.balance(), money("100"));
}

#[test]
fn mixed_categories_are_order_invariant() {
    let records = vec![
        tx("1", "100", "Deposit"),
        tx("2", "50", "Deposit"),
        tx("3", "20", "Withdrawal"),
        tx("4", "5", "ServiceCharge"),
    ];
    let expected = TransactionSummary {
        deposits: money("150"),
        withdrawals: money("20"),
        service_charges: money("5"),
        interests: MoneyCents::ZERO,
    };

    let orderings = permutations(&records);
    assert_eq!(orderings.len(), 24);
    for ordering in orderings {
        let summary = summarize(&ordering);
        assert_eq!(summary, expected);
        assert_eq!(summary.balance(), money("125"));
    }
}

#[test]
fn amounts_near_the_limit_are_order_invariant() {
    let cents = |id: &str, value: i64, category: Category| {
        TransactionRecord::new(id, "alice", Some(MoneyCents::new(value)), category, base_time())
    };
    let records = vec![
        cents("1", i64::MAX - 10, Category::Deposit),
        cents("2", 50, Category::Deposit),
        cents("3", 100, Category::Withdrawal),
        cents("4", 5, Category::Interest),
    ];

    let (expected, diagnostics) = summarize_with_diagnostics(&records);
    assert!(diagnostics.is_empty());
    assert_eq!(expected.deposits, MoneyCents::new(i64::MAX));
    assert_eq!(expected.balance(), MoneyCents::new(i64::MAX - 95));

    for ordering in permutations(&records) {
        let (summary, diagnostics) = summarize_with_diagnostics(&ordering);
        assert_eq!(summary, expected);
        assert!(diagnostics.is_empty());
        let lines = running_balances(&ordering);
        assert_eq!(lines.last().unwrap().balance, expected.balance());
    }
}

#[test]
fn interest_accrual() {
    let summary = summarize(&[tx("1", "100", "Deposit"), tx("2", "2.50", "Interest")]);
    assert_eq!(summary.interests, money("2.50"));
    assert_eq!(summary.balance(), money("102.50"));
}

#[test]
fn bank_fee_alias_matches_service_charge() {
    let fee = summarize(&[tx("1", "100", "deposit"), tx("2", "3", "bankfee")]);
    let charge = summarize(&[tx("1", "100", "deposit"), tx("2", "3", "service_charge")]);
    assert_eq!(fee, charge);
    assert_eq!(fee.service_charges, money("3"));
    assert_eq!(fee.balance(), money("97"));
}

#[test]
fn malformed_record_contributes_nothing() {
    let mut missing = tx("2", "0", "Deposit");
    missing.amount = None;
    let records = vec![tx("1", "100", "Deposit"), missing];

    let summary = summarize(&records);
    assert_eq!(summary.deposits, money("100"));
    assert_eq!(summary.balance(), money("100"));

    let (_, diagnostics) = summarize_with_diagnostics(&records);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].record_id, "2");
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingAmount);
}

#[test]
fn unknown_category_is_reported_not_counted() {
    let records = vec![tx("1", "40", "Deposit"), tx("2", "15", "transfer")];
    let (summary, diagnostics) = summarize_with_diagnostics(&records);
    assert_eq!(summary.balance(), money("40"));
    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::UnknownCategory("transfer".to_string())
    );
}

#[test]
fn summarize_is_idempotent() {
    let records = vec![
        tx("1", "10", "Deposit"),
        tx("2", "0.35", "Interest"),
        tx("3", "4", "Withdrawal"),
    ];
    let snapshot = records.clone();
    let first = summarize(&records);
    let second = summarize(&records);
    assert_eq!(first, second);
    assert_eq!(records, snapshot);
    assert_balance_identity(&first);
}

#[test]
fn history_ends_at_summary_balance() {
    let mut records = Vec::new();
    for (i, (amount, category)) in [
        ("25", "Deposit"),
        ("3.10", "Withdrawal"),
        ("0.12", "Interest"),
        ("1", "bank fee"),
        ("8", "Deposit"),
    ]
    .into_iter()
    .enumerate()
    {
        let mut record = tx(&format!("t{i}"), amount, category);
        record.timestamp = base_time() + Duration::days(5 - i as i64);
        records.push(record);
    }

    let lines = running_balances(&records);
    let summary = summarize(&records);
    assert_eq!(lines.len(), records.len());
    assert_eq!(lines.last().unwrap().balance, summary.balance());
    assert!(
        lines
            .windows(2)
            .all(|pair| pair[0].record.timestamp <= pair[1].record.timestamp)
    );
    assert_eq!(lines[0].record.id, "t4");
}

#[test]
fn json_export_end_to_end() {
    let export = r#"[
        {"id": "a", "accountId": "alice", "amount": 100, "category": "Deposit", "timestamp": "2025-06-01T08:00:00Z"},
        {"id": "b", "account_id": "alice", "amount": "2.50", "transaction_type": "interest", "date": {"_seconds": 1748764800, "_nanoseconds": 0}},
        {"id": "c", "userId": "alice", "amount": 20, "transactionType": "withdrawal", "createdAt": 1748851200000},
        {"id": "d", "accountId": "alice", "amount": 5, "type": "bankFee", "timestamp": "2025-06-03"},
        {"id": "e", "accountId": "alice", "category": "Deposit", "timestamp": "2025-06-04"},
        {"id": "f", "accountId": "bob", "amount": 9, "category": "Deposit", "timestamp": "2025-06-04"},
        {"id": "g", "amount": 1, "category": "Deposit", "timestamp": "2025-06-04"}
    ]"#;

    let report = ledger::load_json(export.as_bytes()).unwrap();
    assert_eq!(report.records.len(), 6);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].id.as_deref(), Some("g"));

    let alice: Vec<&TransactionRecord> = ledger::for_account(&report.records, "alice").collect();
    let (summary, diagnostics) = summarize_with_diagnostics(alice);
    assert_eq!(summary.deposits, money("100"));
    assert_eq!(summary.interests, money("2.50"));
    assert_eq!(summary.withdrawals, money("20"));
    assert_eq!(summary.service_charges, money("5"));
    assert_eq!(summary.balance(), money("77.50"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].record_id, "e");
}

#[test]
fn json_export_must_be_a_list() {
    let err = ledger::load_json(r#"{"id": "a"}"#.as_bytes()).unwrap_err();
    assert_eq!(
        err,
        engine::EngineError::NotASequence("an object".to_string())
    );
}

#[test]
fn csv_export_end_to_end() {
    let export = "\
id,account_id,amount,transaction_type,date,note
1,alice,100,Deposit,2025-06-01,allowance
2,alice,12.5,Withdrawal,2025-06-02,
3,alice,,Deposit,2025-06-03,broken
4,alice,1,Service Charge,2025-06-04,
5,,3,Deposit,2025-06-05,
";
    let report = ledger::load_csv(export.as_bytes()).unwrap();
    assert_eq!(report.records.len(), 4);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].index, 4);
    assert_eq!(report.records[0].description.as_deref(), Some("allowance"));

    let summary = summarize(&report.records);
    assert_eq!(summary.balance(), money("86.50"));
}
