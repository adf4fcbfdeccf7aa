//! Merges threshold evaluation, risk scoring and the required-field check
//! into a single [`ComplianceReport`].
//!
//! Only structurally invalid input fails the call. Missing fields and
//! rules that do not trigger are part of a normal report.

use crate::{
    config::{ComplianceContext, FieldRequirement},
    error::ComplianceResult,
    risk_scorer::{self, RiskAssessment, RiskFactor},
    rule_evaluator,
    threshold_table::ThresholdRule,
    transaction::TransactionRecord,
    types::{ObligationKind, RiskTier},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of one compliance check. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    triggered_obligations: Vec<ThresholdRule>,
    risk_score: u8,
    risk_tier: RiskTier,
    risk_factors: Vec<RiskFactor>,
    recommendations: Vec<String>,
    edd_required: bool,
    block_recommended: bool,
    missing_fields: BTreeSet<String>,
    table_version: String,
    generated_at: DateTime<Utc>,
}

impl ComplianceReport {
    pub fn triggered_obligations(&self) -> &[ThresholdRule] {
        &self.triggered_obligations
    }

    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier
    }

    pub fn risk_factors(&self) -> &[RiskFactor] {
        &self.risk_factors
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn edd_required(&self) -> bool {
        self.edd_required
    }

    pub fn block_recommended(&self) -> bool {
        self.block_recommended
    }

    pub fn missing_fields(&self) -> &BTreeSet<String> {
        &self.missing_fields
    }

    pub fn table_version(&self) -> &str {
        &self.table_version
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// True when nothing is due and nothing is missing.
    pub fn is_clear(&self) -> bool {
        self.triggered_obligations.is_empty() && self.missing_fields.is_empty()
    }

    /// Equality ignoring `generated_at`.
    pub fn same_content(&self, other: &ComplianceReport) -> bool {
        ComplianceReport {
            generated_at: other.generated_at,
            ..self.clone()
        } == *other
    }
}

/// Run the full check for `transaction` against the tables in `context`.
/// `running_total` is forwarded to cumulative threshold rules.
pub fn check(
    transaction: &TransactionRecord,
    context: &ComplianceContext,
    running_total: Option<Decimal>,
) -> ComplianceResult<ComplianceReport> {
    transaction.validate()?;

    let missing_fields = missing_fields(
        transaction,
        context
            .required_fields()
            .required_fields_for(transaction.transaction_type),
    );

    let triggered_obligations =
        rule_evaluator::evaluate(transaction, context.thresholds(), running_total)?;
    let RiskAssessment {
        score,
        tier,
        factors,
        mut recommendations,
        edd_required,
        block_recommended,
    } = risk_scorer::score(
        transaction,
        &transaction.customer_risk_flags,
        context.risk_model(),
    );

    if !missing_fields.is_empty() {
        recommendations.push(format!(
            "Collect missing information before processing: {}",
            missing_fields.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    let edd_required = edd_required
        || triggered_obligations
            .iter()
            .any(|r| r.obligation == ObligationKind::EnhancedDueDiligence);

    log::debug!(
        "check {} {} {}: {} obligations, tier {tier}, {} missing fields",
        transaction.transaction_type,
        transaction.amount,
        transaction.currency,
        triggered_obligations.len(),
        missing_fields.len()
    );

    Ok(ComplianceReport {
        triggered_obligations,
        risk_score: score,
        risk_tier: tier,
        risk_factors: factors,
        recommendations,
        edd_required,
        block_recommended,
        missing_fields,
        table_version: context.thresholds().version().to_string(),
        generated_at: Utc::now(),
    })
}

/// Names of the requirements not satisfied by `transaction`.
pub fn missing_fields(
    transaction: &TransactionRecord,
    requirements: &[FieldRequirement],
) -> BTreeSet<String> {
    requirements
        .iter()
        .filter(|req| !req.any_of.iter().any(|f| f.is_present(&transaction.parties)))
        .map(|req| req.name.clone())
        .collect()
}
