//! risk-scorer: jurisdiction-pair risk score for a single transfer.
//!
//! Usage:
//!   risk-scorer --from-country TR --to-country RU --amount 50000
//!   risk-scorer --from-country TR --to-country AE --amount 5000 \
//!       --asset privacy_coin --flag pep --flag new_account --json

use anyhow::Result;
use clap::Parser;
use masak_core::{
    risk_scorer::{self, RiskAssessment},
    types::{AssetType, Currency, CustomerFlag, TransactionType},
    TransactionRecord,
};
use masak_tools::{finish, print_json, yes_no, TableArgs};
use rust_decimal::Decimal;
use serde::Serialize;
use std::process::ExitCode;

/// Score a transfer's jurisdictional and customer risk
#[derive(Parser, Debug)]
#[command(name = "risk-scorer", version, about)]
struct Cli {
    /// Origin country (ISO 3166-1 alpha-2)
    #[arg(long, short = 'f')]
    from_country: String,

    /// Destination country (ISO 3166-1 alpha-2)
    #[arg(long, short = 't')]
    to_country: String,

    /// Transaction amount
    #[arg(long, short = 'a')]
    amount: Decimal,

    /// Currency code
    #[arg(long, short = 'c', default_value = "USD")]
    currency: Currency,

    /// Asset type (fiat, stablecoin, privacy_coin, other_crypto)
    #[arg(long, default_value = "other_crypto")]
    asset: AssetType,

    /// Customer risk flag (repeatable)
    #[arg(long = "flag")]
    flags: Vec<CustomerFlag>,

    /// Transaction type the transfer is booked as
    #[arg(long, default_value = "crypto_transfer")]
    transaction_type: TransactionType,

    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,

    #[command(flatten)]
    tables: TableArgs,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    origin_country: String,
    destination_country: String,
    amount: Decimal,
    currency: &'a Currency,
    #[serde(flatten)]
    assessment: &'a RiskAssessment,
    model_version: &'a str,
}

fn main() -> ExitCode {
    env_logger::init();
    finish(run(Cli::parse()))
}

fn run(cli: Cli) -> Result<()> {
    let context = cli.tables.load()?;
    let record = TransactionRecord::new(
        cli.transaction_type,
        cli.amount,
        cli.currency.as_str(),
        &cli.from_country,
        &cli.to_country,
        cli.asset,
    )?
    .with_flags(cli.flags.iter().copied());

    let assessment = risk_scorer::score(&record, &record.customer_risk_flags, context.risk_model());
    let output = ScoreOutput {
        origin_country: record.origin_country.to_string(),
        destination_country: record.destination_country.to_string(),
        amount: record.amount,
        currency: &record.currency,
        assessment: &assessment,
        model_version: context.risk_model().version(),
    };

    if cli.json {
        print_json(&output)
    } else {
        print_text(&output);
        Ok(())
    }
}

fn print_text(out: &ScoreOutput<'_>) {
    let a = out.assessment;
    println!("=== MASAK RISK ASSESSMENT (model {}) ===", out.model_version);
    println!(
        "  corridor:      {} -> {}",
        out.origin_country, out.destination_country
    );
    println!("  amount:        {} {}", out.amount, out.currency);
    println!("  risk score:    {}/100", a.score);
    println!("  risk tier:     {}", a.tier.as_str().to_uppercase());
    println!("  EDD required:  {}", yes_no(a.edd_required));
    println!("  block:         {}", yes_no(a.block_recommended));

    if !a.factors.is_empty() {
        println!();
        println!("=== FACTORS ===");
        for factor in &a.factors {
            println!("  {:>+4}  {:<36} {}", factor.weight, factor.factor_id, factor.description);
        }
    }
    if !a.recommendations.is_empty() {
        println!();
        println!("=== RECOMMENDATIONS ===");
        for rec in &a.recommendations {
            println!("  - {rec}");
        }
    }
}
