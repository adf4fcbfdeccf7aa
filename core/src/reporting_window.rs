//! Same-customer reporting window: running totals for cumulative rules and
//! structuring advisories.

use crate::{
    error::ValidationError,
    threshold_table::ThresholdTable,
    types::{Currency, TransactionType},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Average amounts at or above this share of a threshold (and below the
/// threshold itself) are treated as possible structuring.
const STRUCTURING_BAND_NUM: i64 = 8;
const STRUCTURING_BAND_DEN: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuringAdvisory {
    pub rule_id: String,
    pub transaction_type: TransactionType,
    pub threshold: Decimal,
    pub average_amount: Decimal,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingWindow {
    currency: Currency,
    amounts: Vec<Decimal>,
    total: Decimal,
}

impl ReportingWindow {
    pub fn from_amounts(
        currency: Currency,
        amounts: impl IntoIterator<Item = Decimal>,
    ) -> Result<Self, ValidationError> {
        let amounts: Vec<Decimal> = amounts.into_iter().collect();
        if let Some(negative) = amounts.iter().find(|a| **a < Decimal::ZERO) {
            return Err(ValidationError::NegativeAmount { amount: *negative });
        }
        let total = amounts.iter().copied().sum();
        Ok(Self {
            currency,
            amounts,
            total,
        })
    }

    /// The running total to pass to cumulative rules.
    pub fn running_total(&self) -> Decimal {
        self.total
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn average(&self) -> Option<Decimal> {
        if self.amounts.is_empty() {
            None
        } else {
            Some(self.total / Decimal::from(self.amounts.len()))
        }
    }

    /// One advisory per rule in the window's currency whose threshold the
    /// average amount sits just below. Needs at least two transactions.
    pub fn structuring_advisories(&self, table: &ThresholdTable) -> Vec<StructuringAdvisory> {
        let Some(average) = self.average().filter(|_| self.amounts.len() > 1) else {
            return Vec::new();
        };

        table
            .iter()
            .filter(|rule| rule.currency == self.currency)
            .filter(|rule| {
                let floor = rule.amount * Decimal::new(STRUCTURING_BAND_NUM, 0)
                    / Decimal::new(STRUCTURING_BAND_DEN, 0);
                average >= floor && average < rule.amount
            })
            .map(|rule| StructuringAdvisory {
                rule_id: rule.rule_id.clone(),
                transaction_type: rule.transaction_type,
                threshold: rule.amount,
                average_amount: average.round_dp(2),
                message: format!(
                    "Structuring alert: average of {} transactions ({} {}) is just below {} threshold {} {}",
                    self.amounts.len(),
                    average.round_dp(2),
                    self.currency,
                    rule.rule_id,
                    rule.amount,
                    rule.currency
                ),
            })
            .collect()
    }
}
