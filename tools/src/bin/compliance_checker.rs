//! compliance-checker: full obligations for a CASP profile, or a complete
//! compliance report for one transaction record.
//!
//! Usage:
//!   compliance-checker --casp-type exchange --customers 25000
//!   compliance-checker --transaction tx.json --running-total 80000 --json

use anyhow::Result;
use clap::Parser;
use masak_core::{
    casp::{self, CaspProfile, CaspSummary},
    check, ComplianceContext, ComplianceReport, TransactionRecord, ValidationError,
};
use masak_tools::{finish, print_json, yes_no, TableArgs};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Check MASAK compliance requirements for a CASP or a transaction
#[derive(Parser, Debug)]
#[command(name = "compliance-checker", version, about)]
struct Cli {
    /// CASP type (exchange, custodian, wallet_provider, broker)
    #[arg(long, required_unless_present = "transaction")]
    casp_type: Option<String>,

    /// Number of customers served
    #[arg(long, required_unless_present = "transaction")]
    customers: Option<u64>,

    /// JSON transaction record to check instead of a CASP profile
    #[arg(long, conflicts_with_all = ["casp_type", "customers"])]
    transaction: Option<PathBuf>,

    /// Running total for cumulative rules, this transaction included
    #[arg(long, requires = "transaction")]
    running_total: Option<Decimal>,

    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,

    #[command(flatten)]
    tables: TableArgs,
}

fn main() -> ExitCode {
    env_logger::init();
    finish(run(Cli::parse()))
}

fn run(cli: Cli) -> Result<()> {
    let context = cli.tables.load()?;

    if let Some(path) = &cli.transaction {
        let report = check_transaction(path, &context, cli.running_total)?;
        return if cli.json {
            print_json(&report)
        } else {
            print_report(&report);
            Ok(())
        };
    }

    let profile = CaspProfile {
        casp_type: cli.casp_type.unwrap_or_default(),
        customers: cli.customers.unwrap_or_default(),
    };
    let summary = casp::summarize(&profile, &context)?;
    if cli.json {
        print_json(&summary)
    } else {
        print_summary(&summary);
        Ok(())
    }
}

fn check_transaction(
    path: &Path,
    context: &ComplianceContext,
    running_total: Option<Decimal>,
) -> Result<ComplianceReport> {
    let json = std::fs::read_to_string(path).map_err(|e| ValidationError::Malformed {
        field: "transaction".into(),
        reason: format!("{}: {e}", path.display()),
    })?;
    let record = TransactionRecord::from_json(&json)?;
    Ok(check(&record, context, running_total)?)
}

fn print_summary(summary: &CaspSummary) {
    println!("=== MASAK COMPLIANCE REQUIREMENTS (tables {}) ===", summary.table_version);
    println!("  CASP type:  {} ({})", summary.casp_type, summary.label);
    println!(
        "  customers:  {} ({} tier)",
        summary.customers, summary.customer_tier.label
    );
    println!("  rules:      {}", summary.rule_count());

    println!();
    println!("=== PROGRAMME REQUIREMENTS ===");
    for req in &summary.customer_tier.requirements {
        println!("  - {req}");
    }

    for ob in &summary.obligations {
        println!();
        println!("=== {} ===", ob.transaction_type.as_str().to_uppercase());
        for rule in &ob.rules {
            println!(
                "  {:<20} >= {:>10} {}  {:<16} {}",
                rule.rule_id, rule.amount, rule.currency, rule.deadline, rule.description
            );
        }
        if !ob.required_fields.is_empty() {
            let names: Vec<&str> = ob.required_fields.iter().map(|f| f.name.as_str()).collect();
            println!("  required fields: {}", names.join(", "));
        }
    }
}

fn print_report(report: &ComplianceReport) {
    println!(
        "=== MASAK COMPLIANCE REPORT (tables {}) ===",
        report.table_version()
    );
    println!("  generated at:  {}", report.generated_at().to_rfc3339());
    println!(
        "  risk:          {}/100 ({})",
        report.risk_score(),
        report.risk_tier().as_str().to_uppercase()
    );
    println!("  EDD required:  {}", yes_no(report.edd_required()));
    println!("  block:         {}", yes_no(report.block_recommended()));
    println!("  clear:         {}", yes_no(report.is_clear()));

    if !report.triggered_obligations().is_empty() {
        println!();
        println!("=== OBLIGATIONS ===");
        for rule in report.triggered_obligations() {
            println!(
                "  {:<20} {:<30} {}",
                rule.rule_id, rule.obligation, rule.deadline
            );
        }
    }
    if !report.missing_fields().is_empty() {
        println!();
        println!("=== MISSING FIELDS ===");
        for field in report.missing_fields() {
            println!("  - {field}");
        }
    }
    if !report.risk_factors().is_empty() {
        println!();
        println!("=== RISK FACTORS ===");
        for factor in report.risk_factors() {
            println!("  {:>+4}  {}", factor.weight, factor.description);
        }
    }
    if !report.recommendations().is_empty() {
        println!();
        println!("=== RECOMMENDATIONS ===");
        for rec in report.recommendations() {
            println!("  - {rec}");
        }
    }
}
