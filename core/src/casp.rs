//! Aggregate obligations for a crypto-asset service provider profile.

use crate::{
    config::{ComplianceContext, CustomerTier, FieldRequirement},
    error::ValidationError,
    threshold_table::ThresholdRule,
    types::TransactionType,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaspProfile {
    pub casp_type: String,
    pub customers: u64,
}

/// Rules and field requirements for one transaction type the provider
/// handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeObligations {
    pub transaction_type: TransactionType,
    pub rules: Vec<ThresholdRule>,
    pub required_fields: Vec<FieldRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaspSummary {
    pub casp_type: String,
    pub label: String,
    pub customers: u64,
    pub customer_tier: CustomerTier,
    pub obligations: Vec<TypeObligations>,
    pub table_version: String,
}

impl CaspSummary {
    pub fn rule_count(&self) -> usize {
        self.obligations.iter().map(|o| o.rules.len()).sum()
    }
}

pub fn summarize(
    profile: &CaspProfile,
    context: &ComplianceContext,
) -> Result<CaspSummary, ValidationError> {
    let catalog = context.casp_catalog();
    let casp = catalog
        .casp_type(&profile.casp_type)
        .ok_or_else(|| ValidationError::UnknownCaspType {
            casp_type: profile.casp_type.clone(),
        })?;

    let obligations = casp
        .transaction_types
        .iter()
        .map(|&transaction_type| TypeObligations {
            transaction_type,
            rules: context
                .thresholds()
                .rules_for(transaction_type)
                .cloned()
                .collect(),
            required_fields: context
                .required_fields()
                .required_fields_for(transaction_type)
                .to_vec(),
        })
        .collect();

    let customer_tier = catalog.customer_tier(profile.customers).clone();
    log::debug!(
        "CASP {} with {} customers: tier {}",
        casp.casp_type,
        profile.customers,
        customer_tier.label
    );

    Ok(CaspSummary {
        casp_type: casp.casp_type.clone(),
        label: casp.label.clone(),
        customers: profile.customers,
        customer_tier,
        obligations,
        table_version: context.thresholds().version().to_string(),
    })
}
