//! threshold-calculator: which MASAK reporting thresholds a transaction
//! triggers.
//!
//! Usage:
//!   threshold-calculator --transaction-type wire_transfer --amount 75000 --currency TRY
//!   threshold-calculator --transaction-type crypto_withdrawal --amount 30000 \
//!       --window-amount 25000 --window-amount 24000 --json
//!   threshold-calculator --transaction-type wire_transfer --amount 2500 \
//!       --currency USD --usd-try-rate 34

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use masak_core::{
    reporting_window::{ReportingWindow, StructuringAdvisory},
    rule_evaluator,
    threshold_table::ThresholdRule,
    types::{AssetType, Currency, ObligationKind, TransactionType},
    TransactionRecord, ValidationError,
};
use masak_tools::{finish, print_json, yes_no, TableArgs};
use rust_decimal::Decimal;
use serde::Serialize;
use std::process::ExitCode;

const WITHDRAWAL_DELAY_NOTE: &str =
    "Per Circular No. 29: withdrawal delays may apply for first-time or high-risk withdrawals";

/// Calculate MASAK AML reporting thresholds for a transaction
#[derive(Parser, Debug)]
#[command(name = "threshold-calculator", version, about)]
struct Cli {
    /// Transaction type (wire_transfer, cash, crypto_withdrawal, travel_rule, ...)
    #[arg(long, short = 't')]
    transaction_type: TransactionType,

    /// Transaction amount
    #[arg(long, short = 'a')]
    amount: Decimal,

    /// Currency code
    #[arg(long, short = 'c', default_value = "TRY")]
    currency: Currency,

    /// Running total of the customer's reporting window, this transaction included
    #[arg(long, conflicts_with = "window_amount")]
    running_total: Option<Decimal>,

    /// Earlier same-customer amounts in the reporting window (repeatable)
    #[arg(long)]
    window_amount: Vec<Decimal>,

    /// Convert a USD amount to TRY at this rate before evaluation
    #[arg(long, short = 'r')]
    usd_try_rate: Option<Decimal>,

    /// Evaluate rules in force on this date (YYYY-MM-DD)
    #[arg(long)]
    value_date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,

    #[command(flatten)]
    tables: TableArgs,
}

#[derive(Serialize)]
struct Conversion {
    original_amount: Decimal,
    original_currency: Currency,
    usd_try_rate: Decimal,
}

#[derive(Serialize)]
struct ThresholdOutput {
    transaction_type: TransactionType,
    amount: Decimal,
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted_from: Option<Conversion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    running_total: Option<Decimal>,
    requires_reporting: bool,
    travel_rule_applies: bool,
    edd_required: bool,
    obligations: Vec<ThresholdRule>,
    structuring_advisories: Vec<StructuringAdvisory>,
    notes: Vec<String>,
    table_version: String,
}

fn main() -> ExitCode {
    env_logger::init();
    finish(run(Cli::parse()))
}

fn run(cli: Cli) -> Result<()> {
    let context = cli.tables.load()?;
    let table = context.thresholds();

    let (rate, currency) = match cli.usd_try_rate {
        Some(rate) if rate <= Decimal::ZERO => {
            return Err(ValidationError::Malformed {
                field: "usd_try_rate".into(),
                reason: format!("rate must be positive, got {rate}"),
            }
            .into());
        }
        Some(rate) if cli.currency.as_str() == "USD" => (Some(rate), Currency::new("TRY")?),
        Some(_) => {
            log::warn!("--usd-try-rate ignored for {} amounts", cli.currency);
            (None, cli.currency.clone())
        }
        None => (None, cli.currency.clone()),
    };
    let convert = |amount: Decimal| rate.map_or(amount, |r| amount * r);
    let amount = convert(cli.amount);

    let mut record = TransactionRecord::new(
        cli.transaction_type,
        amount,
        currency.as_str(),
        "TR",
        "TR",
        AssetType::Fiat,
    )?;
    if let Some(date) = cli.value_date {
        record = record.with_value_date(date);
    }

    let window = if cli.window_amount.is_empty() {
        None
    } else {
        let amounts = cli
            .window_amount
            .iter()
            .map(|a| convert(*a))
            .chain(std::iter::once(amount));
        Some(ReportingWindow::from_amounts(currency.clone(), amounts)?)
    };
    let running_total = cli
        .running_total
        .map(convert)
        .or_else(|| window.as_ref().map(ReportingWindow::running_total));

    let obligations = rule_evaluator::evaluate(&record, table, running_total)?;
    let structuring_advisories = window
        .as_ref()
        .map(|w| w.structuring_advisories(table))
        .unwrap_or_default();

    let mut notes: Vec<String> = obligations
        .iter()
        .map(|r| {
            format!(
                "{} reached ({} {} threshold, deadline {}): {}",
                r.rule_id, r.amount, r.currency, r.deadline, r.description
            )
        })
        .collect();
    if cli.transaction_type == TransactionType::CryptoWithdrawal {
        notes.push(WITHDRAWAL_DELAY_NOTE.to_string());
    }

    let has = |kind: ObligationKind| obligations.iter().any(|r| r.obligation == kind);
    let output = ThresholdOutput {
        transaction_type: cli.transaction_type,
        amount,
        currency,
        converted_from: rate.map(|usd_try_rate| Conversion {
            original_amount: cli.amount,
            original_currency: cli.currency.clone(),
            usd_try_rate,
        }),
        running_total,
        requires_reporting: !obligations.is_empty(),
        travel_rule_applies: has(ObligationKind::TravelRule),
        edd_required: has(ObligationKind::EnhancedDueDiligence),
        obligations,
        structuring_advisories,
        notes,
        table_version: table.version().to_string(),
    };

    if cli.json {
        print_json(&output)
    } else {
        print_text(&output);
        Ok(())
    }
}

fn print_text(out: &ThresholdOutput) {
    println!("=== MASAK THRESHOLD ANALYSIS (tables {}) ===", out.table_version);
    println!("  transaction type:   {}", out.transaction_type);
    println!("  amount:             {} {}", out.amount, out.currency);
    if let Some(conv) = &out.converted_from {
        println!(
            "  converted from:     {} {} at {}",
            conv.original_amount, conv.original_currency, conv.usd_try_rate
        );
    }
    if let Some(total) = out.running_total {
        println!("  window total:       {total} {}", out.currency);
    }
    println!("  reporting required: {}", yes_no(out.requires_reporting));
    println!("  travel rule:        {}", yes_no(out.travel_rule_applies));
    println!("  EDD required:       {}", yes_no(out.edd_required));

    if !out.obligations.is_empty() {
        println!();
        println!("=== OBLIGATIONS ===");
        for rule in &out.obligations {
            println!(
                "  {:<20} {:<30} {:>12} {}  {}",
                rule.rule_id, rule.obligation, rule.amount, rule.currency, rule.deadline
            );
        }
    }
    if !out.structuring_advisories.is_empty() {
        println!();
        println!("=== STRUCTURING ===");
        for advisory in &out.structuring_advisories {
            println!("  {}", advisory.message);
        }
    }
    if !out.notes.is_empty() {
        println!();
        println!("=== NOTES ===");
        for note in &out.notes {
            println!("  - {note}");
        }
    }
}
