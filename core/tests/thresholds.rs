//! Threshold table loading and rule evaluation.

use chrono::NaiveDate;
use masak_core::{
    error::{ComplianceError, ConfigError, ValidationError},
    rule_evaluator::evaluate,
    threshold_table::ThresholdTable,
    types::{AssetType, Deadline, ObligationKind, TransactionType},
    ComplianceContext, TransactionRecord,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn record(tx_type: TransactionType, amount: Decimal, currency: &str) -> TransactionRecord {
    TransactionRecord::new(tx_type, amount, currency, "TR", "TR", AssetType::Fiat).unwrap()
}

fn rule_ids(rules: &[masak_core::threshold_table::ThresholdRule]) -> Vec<&str> {
    rules.iter().map(|r| r.rule_id.as_str()).collect()
}

const SMALL_TABLE: &str = r#"{
  "version": "test-1",
  "rules": [
    {"rule_id": "B-100", "transaction_type": "wire_transfer", "currency": "TRY",
     "amount": "100", "deadline": "same_day", "applicable_from": "2025-01-01",
     "obligation": "large_transaction_report"},
    {"rule_id": "A-100", "transaction_type": "wire_transfer", "currency": "TRY",
     "amount": "100", "deadline": "immediate", "applicable_from": "2025-01-01",
     "obligation": "enhanced_due_diligence"},
    {"rule_id": "C-50", "transaction_type": "wire_transfer", "currency": "TRY",
     "amount": "50", "deadline": "same_day", "applicable_from": "2025-06-01",
     "obligation": "large_transaction_report"}
  ]
}"#;

/// A wire transfer of exactly 75 000 TRY reaches the large transaction threshold.
#[test]
fn wire_transfer_at_threshold_triggers_report() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::WireTransfer, dec!(75000), "TRY");

    let triggered = evaluate(&tx, ctx.thresholds(), None).unwrap();

    assert_eq!(rule_ids(&triggered), vec!["LTR-WIRE-75K"]);
    assert_eq!(triggered[0].deadline, Deadline::SameDay);
}

/// One lira below the threshold triggers nothing.
#[test]
fn wire_transfer_below_threshold_is_clear() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::WireTransfer, dec!(74999), "TRY");

    let triggered = evaluate(&tx, ctx.thresholds(), None).unwrap();

    assert!(triggered.is_empty(), "74 999 TRY must not trigger: {triggered:?}");
}

/// Every transaction type has exactly one EDD rule, at 500 000 TRY.
#[test]
fn every_type_has_an_edd_threshold() {
    let ctx = ComplianceContext::default_test();
    let lira = "TRY".parse().unwrap();

    for tx_type in TransactionType::ALL {
        let edd: Vec<_> = ctx
            .thresholds()
            .lookup(*tx_type, &lira)
            .into_iter()
            .filter(|r| r.obligation == ObligationKind::EnhancedDueDiligence)
            .collect();
        assert_eq!(edd.len(), 1, "{tx_type}: {edd:?}");
        assert_eq!(edd[0].amount, dec!(500000), "{tx_type}");
        assert_eq!(edd[0].deadline, Deadline::Immediate, "{tx_type}");
    }
}

/// A 500 000 TRY travel-rule transfer needs EDD as well as an STR review.
#[test]
fn large_travel_rule_transfer_triggers_edd_and_str() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::TravelRule, dec!(500000), "TRY");

    let triggered = evaluate(&tx, ctx.thresholds(), None).unwrap();

    assert_eq!(
        rule_ids(&triggered),
        vec!["TR-TRAVEL-15K", "EDD-TRAVEL-500K", "STR-TRAVEL-500K"]
    );
}

/// A large wire triggers every rule it reaches, smallest threshold first.
#[test]
fn all_reached_rules_returned_in_threshold_order() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::WireTransfer, dec!(600000), "TRY");

    let triggered = evaluate(&tx, ctx.thresholds(), None).unwrap();

    assert_eq!(rule_ids(&triggered), vec!["LTR-WIRE-75K", "EDD-WIRE-500K"]);
    assert_eq!(triggered[1].obligation, ObligationKind::EnhancedDueDiligence);
}

/// Cash is reported from 100 000 TRY.
#[test]
fn cash_threshold_is_inclusive() {
    let ctx = ComplianceContext::default_test();

    let below = record(TransactionType::Cash, dec!(99999.99), "TRY");
    let at = record(TransactionType::Cash, dec!(100000), "TRY");

    let below = evaluate(&below, ctx.thresholds(), None).unwrap();
    let at = evaluate(&at, ctx.thresholds(), None).unwrap();

    assert!(below.is_empty());
    assert_eq!(rule_ids(&at), vec!["CTR-CASH-100K"]);
    assert_eq!(at[0].obligation, ObligationKind::CashTransactionReport);
}

/// Travel-rule transfers trigger data collection from 15 000 TRY.
#[test]
fn travel_rule_triggers_at_fifteen_thousand() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::TravelRule, dec!(15000), "TRY");

    let triggered = evaluate(&tx, ctx.thresholds(), None).unwrap();

    assert_eq!(rule_ids(&triggered), vec!["TR-TRAVEL-15K"]);
    assert_eq!(triggered[0].deadline, Deadline::Immediate);
}

/// Equal thresholds are ordered by rule id.
#[test]
fn equal_thresholds_tie_break_on_rule_id() {
    let table = ThresholdTable::from_json(SMALL_TABLE).unwrap();
    let tx = record(TransactionType::WireTransfer, dec!(100), "TRY");

    let triggered = evaluate(&tx, &table, None).unwrap();

    assert_eq!(rule_ids(&triggered), vec!["C-50", "A-100", "B-100"]);
}

/// A value date before a rule's effective date leaves that rule out.
#[test]
fn rules_not_yet_in_force_are_skipped() {
    let table = ThresholdTable::from_json(SMALL_TABLE).unwrap();
    let tx = record(TransactionType::WireTransfer, dec!(100), "TRY")
        .with_value_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

    let triggered = evaluate(&tx, &table, None).unwrap();

    assert_eq!(rule_ids(&triggered), vec!["A-100", "B-100"]);
}

/// A transaction type with no rules at all is simply clear.
#[test]
fn type_without_rules_is_clear() {
    let table = ThresholdTable::from_json(SMALL_TABLE).unwrap();
    let tx = record(TransactionType::Cash, dec!(1000000), "TRY");

    assert!(evaluate(&tx, &table, None).unwrap().is_empty());
}

/// No conversion happens: a USD wire against a TRY-only table is rejected.
#[test]
fn currency_mismatch_is_a_validation_error() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::WireTransfer, dec!(100000), "USD");

    let err = evaluate(&tx, ctx.thresholds(), None).unwrap_err();

    match err {
        ComplianceError::Validation(ValidationError::CurrencyMismatch { expected, actual, .. }) => {
            assert_eq!(expected, "TRY");
            assert_eq!(actual, "USD");
        }
        other => panic!("expected CurrencyMismatch, got {other:?}"),
    }
}

/// Cumulative crypto withdrawals need the reporting-window total.
#[test]
fn cumulative_rule_without_running_total_is_insufficient_context() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::CryptoWithdrawal, dec!(30000), "TRY");

    let err = evaluate(&tx, ctx.thresholds(), None).unwrap_err();

    assert!(
        matches!(
            err,
            ComplianceError::InsufficientContext { ref rule_id, .. }
                if rule_id == "LTR-CRYPTO-WDR-75K"
        ),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.exit_code(), 2);
}

/// Small withdrawals that add up to the threshold trigger the cumulative rule.
#[test]
fn cumulative_rule_uses_running_total() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::CryptoWithdrawal, dec!(30000), "TRY");

    let below = evaluate(&tx, ctx.thresholds(), Some(dec!(74999))).unwrap();
    let reached = evaluate(&tx, ctx.thresholds(), Some(dec!(75000))).unwrap();

    assert!(below.is_empty());
    assert_eq!(rule_ids(&reached), vec!["LTR-CRYPTO-WDR-75K"]);
}

/// The running total includes the transaction itself.
#[test]
fn running_total_below_amount_is_rejected() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::CryptoWithdrawal, dec!(30000), "TRY");

    let err = evaluate(&tx, ctx.thresholds(), Some(dec!(20000))).unwrap_err();
    assert!(matches!(
        err,
        ComplianceError::Validation(ValidationError::RunningTotalBelowAmount { .. })
    ));

    let err = evaluate(&tx, ctx.thresholds(), Some(dec!(-1))).unwrap_err();
    assert!(matches!(
        err,
        ComplianceError::Validation(ValidationError::NegativeRunningTotal { .. })
    ));
}

/// A negative amount fails the call.
#[test]
fn negative_amount_is_rejected() {
    let err = TransactionRecord::new(
        TransactionType::WireTransfer,
        dec!(-1),
        "TRY",
        "TR",
        "TR",
        AssetType::Fiat,
    )
    .unwrap_err();

    assert_eq!(err, ValidationError::NegativeAmount { amount: dec!(-1) });
}

/// Zero is a valid amount and triggers nothing.
#[test]
fn zero_amount_is_clear() {
    let ctx = ComplianceContext::default_test();
    let tx = record(TransactionType::WireTransfer, Decimal::ZERO, "TRY");

    assert!(evaluate(&tx, ctx.thresholds(), None).unwrap().is_empty());
}

/// Table validation rejects duplicate ids, non-positive amounts and unknown types.
#[test]
fn invalid_tables_fail_to_load() {
    let duplicate = SMALL_TABLE.replace("\"B-100\"", "\"A-100\"");
    assert!(matches!(
        ThresholdTable::from_json(&duplicate),
        Err(ConfigError::DuplicateRuleId { rule_id }) if rule_id == "A-100"
    ));

    let zero = SMALL_TABLE.replace("\"amount\": \"50\"", "\"amount\": \"0\"");
    assert!(matches!(
        ThresholdTable::from_json(&zero),
        Err(ConfigError::NonPositiveAmount { rule_id, .. }) if rule_id == "C-50"
    ));

    let unknown = SMALL_TABLE.replacen("\"wire_transfer\"", "\"carrier_pigeon\"", 1);
    assert!(matches!(
        ThresholdTable::from_json(&unknown),
        Err(ConfigError::UnknownTransactionType { value, .. }) if value == "carrier_pigeon"
    ));

    let deadline = SMALL_TABLE.replacen("\"immediate\"", "\"next_week\"", 1);
    assert!(matches!(
        ThresholdTable::from_json(&deadline),
        Err(ConfigError::UnknownValue { field: "deadline", .. })
    ));

    assert!(matches!(
        ThresholdTable::from_json("{ not json"),
        Err(ConfigError::Parse { .. })
    ));
}

/// Lookups only return rules in the requested currency.
#[test]
fn lookup_filters_by_type_and_currency() {
    let ctx = ComplianceContext::default_test();
    let table = ctx.thresholds();
    let lira = "TRY".parse().unwrap();
    let dollar = "USD".parse().unwrap();

    assert_eq!(table.lookup(TransactionType::WireTransfer, &lira).len(), 2);
    assert!(table.lookup(TransactionType::WireTransfer, &dollar).is_empty());
    assert_eq!(table.len(), 17);
    assert_eq!(table.version(), "2025");
}
