//! End-to-end compliance checks: obligations, risk and missing fields in one report.

use masak_core::{
    check,
    compliance_checker::missing_fields,
    transaction::PartyDetails,
    types::{AssetType, CustomerFlag, ObligationKind, RiskTier, TransactionType},
    ComplianceContext, ComplianceError, TransactionRecord, ValidationError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn full_parties() -> PartyDetails {
    PartyDetails {
        originator_name: Some("Ayse Yilmaz".into()),
        originator_address: Some("Istiklal Cd. 10, Istanbul".into()),
        originator_id: None,
        beneficiary_name: Some("Mehmet Kaya".into()),
        beneficiary_address: Some("Kizilay Mh. 5, Ankara".into()),
        beneficiary_account: Some("TR330006100519786457841326".into()),
    }
}

fn travel(amount: Decimal) -> TransactionRecord {
    TransactionRecord::new(
        TransactionType::TravelRule,
        amount,
        "TRY",
        "TR",
        "TR",
        AssetType::OtherCrypto,
    )
    .unwrap()
}

/// A 15 000 TRY travel-rule transfer without a beneficiary address reports
/// both the obligation and the missing field.
#[test]
fn travel_rule_with_missing_beneficiary_address() {
    let ctx = ComplianceContext::default_test();
    let parties = PartyDetails {
        beneficiary_address: None,
        ..full_parties()
    };
    let tx = travel(dec!(15000)).with_parties(parties);

    let report = check(&tx, &ctx, None).unwrap();

    assert_eq!(report.triggered_obligations().len(), 1);
    assert_eq!(
        report.triggered_obligations()[0].obligation,
        ObligationKind::TravelRule
    );
    assert_eq!(
        report.missing_fields().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["beneficiary_address"]
    );
    assert!(
        report
            .recommendations()
            .iter()
            .any(|r| r.contains("beneficiary_address")),
        "recommendations should name the missing field: {:?}",
        report.recommendations()
    );
    assert!(!report.is_clear());
}

/// Address or national ID both satisfy the originator requirement.
#[test]
fn originator_id_satisfies_address_requirement() {
    let ctx = ComplianceContext::default_test();
    let parties = PartyDetails {
        originator_address: None,
        originator_id: Some("12345678901".into()),
        ..full_parties()
    };
    let tx = travel(dec!(20000)).with_parties(parties);

    let report = check(&tx, &ctx, None).unwrap();

    assert!(report.missing_fields().is_empty(), "{:?}", report.missing_fields());
}

/// Blank strings count as missing.
#[test]
fn blank_fields_are_missing() {
    let ctx = ComplianceContext::default_test();
    let parties = PartyDetails {
        originator_name: Some("   ".into()),
        ..full_parties()
    };
    let tx = travel(dec!(100)).with_parties(parties);

    let missing = missing_fields(
        &tx,
        ctx.required_fields()
            .required_fields_for(TransactionType::TravelRule),
    );

    assert!(missing.contains("originator_name"));
}

/// Small domestic transfers with complete data are clear.
#[test]
fn complete_small_transfer_is_clear() {
    let ctx = ComplianceContext::default_test();
    let tx = travel(dec!(1000)).with_parties(full_parties());

    let report = check(&tx, &ctx, None).unwrap();

    assert!(report.is_clear());
    assert_eq!(report.risk_tier(), RiskTier::Low);
    assert!(!report.edd_required());
    assert_eq!(report.table_version(), "2025");
}

/// An EDD threshold rule makes EDD required even when the risk tier is low.
#[test]
fn edd_threshold_forces_edd() {
    let ctx = ComplianceContext::default_test();
    let tx = TransactionRecord::new(
        TransactionType::Cash,
        dec!(500000),
        "TRY",
        "TR",
        "TR",
        AssetType::Fiat,
    )
    .unwrap()
    .with_parties(full_parties());

    let report = check(&tx, &ctx, None).unwrap();

    assert!(report.edd_required());
    let ids: Vec<&str> = report
        .triggered_obligations()
        .iter()
        .map(|r| r.rule_id.as_str())
        .collect();
    assert_eq!(ids, vec!["CTR-CASH-100K", "EDD-CASH-500K"]);
}

/// Every crypto and fiat flow carries a 500 000 TRY EDD threshold.
#[test]
fn large_crypto_and_fiat_flows_require_edd() {
    let ctx = ComplianceContext::default_test();
    let types = [
        (TransactionType::CryptoDeposit, "EDD-CRYPTO-DEP-500K"),
        (TransactionType::CryptoTransfer, "EDD-CRYPTO-TRF-500K"),
        (TransactionType::FiatDeposit, "EDD-FIAT-DEP-500K"),
        (TransactionType::FiatWithdrawal, "EDD-FIAT-WDR-500K"),
    ];

    for (tx_type, rule_id) in types {
        let tx = TransactionRecord::new(
            tx_type,
            dec!(1000000),
            "TRY",
            "TR",
            "TR",
            AssetType::OtherCrypto,
        )
        .unwrap()
        .with_parties(full_parties());

        let report = check(&tx, &ctx, None).unwrap();

        assert!(report.edd_required(), "{tx_type} at 1 000 000 TRY");
        assert!(
            report
                .triggered_obligations()
                .iter()
                .any(|r| r.rule_id == rule_id
                    && r.obligation == ObligationKind::EnhancedDueDiligence),
            "{tx_type}: {:?}",
            report.triggered_obligations()
        );
    }
}

/// Crypto withdrawals reach EDD on the window total, like their report rule.
#[test]
fn crypto_withdrawal_edd_uses_running_total() {
    let ctx = ComplianceContext::default_test();
    let tx = TransactionRecord::new(
        TransactionType::CryptoWithdrawal,
        dec!(50000),
        "TRY",
        "TR",
        "TR",
        AssetType::OtherCrypto,
    )
    .unwrap()
    .with_parties(full_parties());

    let below = check(&tx, &ctx, Some(dec!(499999))).unwrap();
    let at = check(&tx, &ctx, Some(dec!(500000))).unwrap();

    assert!(!below.edd_required());
    assert!(at.edd_required());
    let ids: Vec<&str> = at
        .triggered_obligations()
        .iter()
        .map(|r| r.rule_id.as_str())
        .collect();
    assert_eq!(ids, vec!["LTR-CRYPTO-WDR-75K", "EDD-CRYPTO-WDR-500K"]);
}

/// Flags on the record feed the risk score.
#[test]
fn record_flags_are_scored() {
    let ctx = ComplianceContext::default_test();
    let tx = TransactionRecord::new(
        TransactionType::CryptoTransfer,
        dec!(1000),
        "TRY",
        "TR",
        "RU",
        AssetType::Stablecoin,
    )
    .unwrap()
    .with_flags([CustomerFlag::Pep])
    .with_parties(full_parties());

    let report = check(&tx, &ctx, None).unwrap();

    // 60 corridor + 35 corridor alert + 15 stablecoin + 30 PEP, clipped
    assert_eq!(report.risk_score(), 100);
    assert_eq!(report.risk_tier(), RiskTier::High);
    assert!(report.edd_required());
    assert!(report.risk_factors().iter().any(|f| f.factor_id == "flag:pep"));
}

/// A record parsed from JSON goes through the same checks.
#[test]
fn record_from_json_is_checked() {
    let ctx = ComplianceContext::default_test();
    let json = r#"{
        "amount": "80000",
        "currency": "TRY",
        "transaction_type": "wire_transfer",
        "origin_country": "tr",
        "destination_country": "DE",
        "asset_type": "fiat",
        "customer_risk_flags": ["new_account"],
        "parties": {"originator_name": "Ayse Yilmaz", "beneficiary_name": "Hans Muller"}
    }"#;

    let tx = TransactionRecord::from_json(json).unwrap();
    let report = check(&tx, &ctx, None).unwrap();

    assert_eq!(tx.origin_country.as_str(), "TR");
    assert_eq!(report.triggered_obligations()[0].rule_id, "LTR-WIRE-75K");
    assert_eq!(
        report.missing_fields().iter().collect::<Vec<_>>(),
        vec!["beneficiary_account"]
    );
    // -5 corridor + 15 new account
    assert_eq!(report.risk_score(), 10);
}

/// Unknown fields and unknown countries make the record malformed.
#[test]
fn malformed_records_are_rejected() {
    let unknown_field = r#"{"amount": "1", "currency": "TRY", "transaction_type": "cash",
        "origin_country": "TR", "destination_country": "TR", "asset_type": "fiat", "memo": "x"}"#;
    let bad_country = r#"{"amount": "1", "currency": "TRY", "transaction_type": "cash",
        "origin_country": "XX", "destination_country": "TR", "asset_type": "fiat"}"#;

    assert!(matches!(
        TransactionRecord::from_json(unknown_field),
        Err(ValidationError::Malformed { .. })
    ));
    assert!(matches!(
        TransactionRecord::from_json(bad_country),
        Err(ValidationError::Malformed { .. })
    ));
}

/// A negative amount fails the whole check with a validation error.
#[test]
fn negative_amount_fails_check() {
    let ctx = ComplianceContext::default_test();
    let mut tx = travel(dec!(100));
    tx.amount = dec!(-50);

    let err = check(&tx, &ctx, None).unwrap_err();

    assert!(matches!(
        err,
        ComplianceError::Validation(ValidationError::NegativeAmount { .. })
    ));
    assert_eq!(err.exit_code(), 2);
}

/// Cumulative rules still need a running total inside a full check.
#[test]
fn check_propagates_insufficient_context() {
    let ctx = ComplianceContext::default_test();
    let tx = TransactionRecord::new(
        TransactionType::CryptoWithdrawal,
        dec!(10000),
        "TRY",
        "TR",
        "TR",
        AssetType::OtherCrypto,
    )
    .unwrap();

    assert!(matches!(
        check(&tx, &ctx, None),
        Err(ComplianceError::InsufficientContext { .. })
    ));
    let report = check(&tx, &ctx, Some(dec!(90000))).unwrap();
    assert_eq!(report.triggered_obligations()[0].rule_id, "LTR-CRYPTO-WDR-75K");
}
