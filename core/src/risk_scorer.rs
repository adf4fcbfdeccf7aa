//! Transaction risk scoring.
//!
//! Contributions (corridor, corridor alerts, customer flags, asset type,
//! amount band) are summed, clipped to [0, 100] and mapped to a tier.
//! Every non-zero contribution is kept as a [`RiskFactor`] so a score can
//! always be explained.
//!
//! A corridor with an explicit pair entry uses it. Otherwise the riskier
//! of the two countries applies, and a corridor touching only unlisted
//! countries gets the unclassified baseline.

use crate::{
    config::RiskModel,
    transaction::TransactionRecord,
    types::{CustomerFlag, RiskTier},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 100;

const MANUAL_REVIEW: &str = "Manual compliance review recommended before processing";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor_id: String,
    /// Negative for mitigating factors.
    pub weight: i32,
    pub description: String,
}

impl RiskFactor {
    fn new(factor_id: impl Into<String>, weight: i32, description: impl Into<String>) -> Self {
        Self {
            factor_id: factor_id.into(),
            weight,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub tier: RiskTier,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
    pub edd_required: bool,
    pub block_recommended: bool,
}

/// Score `transaction` with `customer_flags` under `model`.
pub fn score(
    transaction: &TransactionRecord,
    customer_flags: &BTreeSet<CustomerFlag>,
    model: &RiskModel,
) -> RiskAssessment {
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();
    let mut edd_required = false;
    let mut block_recommended = false;

    let origin = &transaction.origin_country;
    let destination = &transaction.destination_country;
    let pair = model.jurisdiction_pair(origin, destination);
    if let Some(pair) = pair {
        if pair.weight != 0 {
            factors.push(RiskFactor::new(
                format!("jurisdiction:{origin}-{destination}"),
                pair.weight,
                format!("{origin} -> {destination}: {}", pair.label),
            ));
        }
        edd_required |= pair.edd_required;
        block_recommended |= pair.prohibited;
        recommend(&mut recommendations, &pair.recommendations);
    } else if let Some(end) = model.riskier_end(origin, destination) {
        if end.weight != 0 {
            factors.push(RiskFactor::new(
                format!("jurisdiction:{origin}-{destination}"),
                end.weight,
                format!("{origin} -> {destination}: {} is a {}", end.country, end.label),
            ));
        }
        edd_required |= end.edd_required;
        block_recommended |= end.prohibited;
        recommend(&mut recommendations, &end.recommendations);
    } else {
        log::warn!("corridor {origin}->{destination} is unclassified, applying baseline weight");
        factors.push(RiskFactor::new(
            "jurisdiction_unclassified",
            model.unclassified_pair_weight(),
            format!("{origin} -> {destination}: unclassified corridor, treated as medium risk"),
        ));
    }

    for alert in model.corridor_alerts(origin, destination) {
        factors.push(RiskFactor::new(
            format!("corridor:{}", alert.alert_id),
            alert.weight,
            format!("{origin} -> {destination}: {}", alert.label),
        ));
        edd_required |= alert.edd_required;
        recommend(&mut recommendations, &alert.recommendations);
    }

    // BTreeSet: each flag counted once, in a stable order.
    for flag in customer_flags {
        let weight = model.flag_weight(*flag);
        if weight != 0 {
            factors.push(RiskFactor::new(
                format!("flag:{flag}"),
                weight,
                format!("customer flag {flag}"),
            ));
        }
    }

    let asset = transaction.asset_type;
    let asset_weight = model.asset_weight(asset);
    if asset_weight != 0 {
        factors.push(RiskFactor::new(
            format!("asset:{asset}"),
            asset_weight,
            format!("asset type {asset}"),
        ));
    }

    if let Some(band) = model.amount_band(&transaction.currency, transaction.amount) {
        edd_required |= band.edd_required;
        factors.push(RiskFactor::new(
            format!("amount:{}", band.label.replace(' ', "_")),
            band.weight,
            format!(
                "{}: {} {} reaches {} {}",
                band.label, transaction.amount, transaction.currency, band.min_amount, band.currency
            ),
        ));
    }

    let raw: i64 = factors.iter().map(|f| i64::from(f.weight)).sum();
    let score = raw.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8;
    let tier = model.tiers().tier_for(score);

    if tier == RiskTier::High {
        edd_required = true;
        if !recommendations.iter().any(|r| r.contains("review")) {
            recommendations.push(MANUAL_REVIEW.to_string());
        }
    }

    log::debug!(
        "risk {origin}->{destination} {asset}: raw {raw}, score {score}, tier {tier}, {} factors",
        factors.len()
    );

    RiskAssessment {
        score,
        tier,
        factors,
        recommendations,
        edd_required,
        block_recommended,
    }
}

/// Append `items` not already recommended, keeping first-seen order.
fn recommend(recommendations: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !recommendations.contains(item) {
            recommendations.push(item.clone());
        }
    }
}
