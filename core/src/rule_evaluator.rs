//! Threshold rule evaluation.
//!
//! A rule triggers when the compared amount reaches its threshold (inclusive).
//! Cumulative rules compare the reporting-window running total, every other
//! rule compares the single transaction amount. All triggered rules are
//! returned, smallest threshold first.

use crate::{
    error::{ComplianceError, ComplianceResult, ValidationError},
    threshold_table::{ThresholdRule, ThresholdTable},
    transaction::TransactionRecord,
};
use rust_decimal::Decimal;

/// Evaluate `transaction` against `table`.
///
/// `running_total` is the sum of the same customer's transactions in the
/// current reporting window, this one included. It is only consulted by
/// cumulative rules, and is required as soon as one of them applies.
pub fn evaluate(
    transaction: &TransactionRecord,
    table: &ThresholdTable,
    running_total: Option<Decimal>,
) -> ComplianceResult<Vec<ThresholdRule>> {
    transaction.validate()?;
    if let Some(total) = running_total {
        check_running_total(total, transaction.amount)?;
    }

    let tx_type = transaction.transaction_type;
    let rules = table.lookup(tx_type, &transaction.currency);

    if rules.is_empty() {
        // Rules exist for the type but none in this currency: refuse rather
        // than silently reporting nothing.
        if let Some(other) = table.rules_for(tx_type).next() {
            return Err(ValidationError::CurrencyMismatch {
                transaction_type: tx_type,
                expected: other.currency.to_string(),
                actual: transaction.currency.to_string(),
            }
            .into());
        }
        log::debug!("no {tx_type} rules in table {}", table.version());
        return Ok(Vec::new());
    }

    let mut triggered = Vec::new();
    for rule in rules {
        if let Some(date) = transaction.value_date {
            if !rule.is_in_force_on(date) {
                continue;
            }
        }

        let compared = if rule.cumulative {
            running_total.ok_or_else(|| ComplianceError::InsufficientContext {
                rule_id: rule.rule_id.clone(),
                transaction_type: tx_type,
            })?
        } else {
            transaction.amount
        };

        if compared >= rule.amount {
            log::debug!(
                "{tx_type} {} {}: triggered {} (threshold {})",
                compared,
                transaction.currency,
                rule.rule_id,
                rule.amount
            );
            triggered.push(rule.clone());
        }
    }

    Ok(triggered)
}

fn check_running_total(total: Decimal, amount: Decimal) -> Result<(), ValidationError> {
    if total < Decimal::ZERO {
        return Err(ValidationError::NegativeRunningTotal {
            running_total: total,
        });
    }
    if total < amount {
        return Err(ValidationError::RunningTotalBelowAmount {
            running_total: total,
            amount,
        });
    }
    Ok(())
}
