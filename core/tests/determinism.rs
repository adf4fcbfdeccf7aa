//! Same record, same tables, same report.
//!
//! Evaluation is a pure function of its inputs. Repeated calls and calls
//! from many threads sharing one context must agree on everything except
//! the generation timestamp.

use masak_core::{
    check,
    transaction::PartyDetails,
    types::{AssetType, CustomerFlag, TransactionType},
    ComplianceContext, ComplianceReport, TransactionRecord,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

fn sample_records() -> Vec<TransactionRecord> {
    let parties = PartyDetails {
        originator_name: Some("Ayse Yilmaz".into()),
        beneficiary_name: Some("Dmitri Ivanov".into()),
        ..PartyDetails::default()
    };
    let specs: [(TransactionType, Decimal, &str, AssetType); 6] = [
        (TransactionType::WireTransfer, dec!(75000), "DE", AssetType::Fiat),
        (TransactionType::TravelRule, dec!(15000), "RU", AssetType::Stablecoin),
        (TransactionType::Cash, dec!(650000), "TR", AssetType::Fiat),
        (TransactionType::CryptoTransfer, dec!(1200), "AE", AssetType::PrivacyCoin),
        (TransactionType::CryptoDeposit, dec!(80000), "JP", AssetType::OtherCrypto),
        (TransactionType::FiatWithdrawal, dec!(10), "IR", AssetType::Fiat),
    ];
    specs
        .into_iter()
        .map(|(tx_type, amount, dest, asset)| {
            TransactionRecord::new(tx_type, amount, "TRY", "TR", dest, asset)
                .unwrap()
                .with_flags([CustomerFlag::NewAccount])
                .with_parties(parties.clone())
        })
        .collect()
}

fn run_all(ctx: &ComplianceContext) -> Vec<ComplianceReport> {
    sample_records()
        .iter()
        .map(|tx| check(tx, ctx, None).expect("check"))
        .collect()
}

#[test]
fn repeated_checks_produce_identical_reports() {
    let ctx = ComplianceContext::default_test();

    let first = run_all(&ctx);
    let second = run_all(&ctx);

    assert_eq!(first.len(), second.len());
    for (i, (a, b)) in first.iter().zip(&second).enumerate() {
        assert!(a.same_content(b), "report {i} differs:\n{a:#?}\nvs\n{b:#?}");
    }
}

/// Serialized reports only differ in `generated_at`.
#[test]
fn serialized_reports_match_apart_from_timestamp() {
    let ctx = ComplianceContext::default_test();
    let strip = |report: &ComplianceReport| {
        let mut value = serde_json::to_value(report).expect("serialize");
        value
            .as_object_mut()
            .expect("report is an object")
            .remove("generated_at");
        value
    };

    let a: Vec<_> = run_all(&ctx).iter().map(strip).collect();
    let b: Vec<_> = run_all(&ctx).iter().map(strip).collect();

    assert_eq!(a, b);
}

/// Many threads sharing one context see exactly what a single thread sees.
#[test]
fn concurrent_checks_share_one_context() {
    const THREADS: usize = 8;

    let ctx = Arc::new(ComplianceContext::default_test());
    let expected = run_all(&ctx);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || run_all(&ctx))
        })
        .collect();

    for handle in handles {
        let reports = handle.join().expect("worker thread panicked");
        for (a, b) in expected.iter().zip(&reports) {
            assert!(a.same_content(b), "concurrent report diverged:\n{a:#?}\nvs\n{b:#?}");
        }
    }
}

/// Scoped threads can borrow the context directly.
#[test]
fn scoped_threads_borrow_context() {
    let ctx = ComplianceContext::default_test();
    let expected = run_all(&ctx);

    thread::scope(|s| {
        let workers: Vec<_> = (0..4).map(|_| s.spawn(|| run_all(&ctx))).collect();
        for worker in workers {
            let reports = worker.join().expect("worker thread panicked");
            assert!(expected.iter().zip(&reports).all(|(a, b)| a.same_content(b)));
        }
    });
}
