//! Versioned table of regulatory reporting thresholds.
//!
//! The table is built once and never mutated. Rules are validated on load and
//! kept sorted by (transaction type, amount, rule_id), so `lookup` returns the
//! most conservative threshold first.

use crate::{
    error::ConfigError,
    types::{Currency, Deadline, ObligationKind, TransactionType},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub rule_id: String,
    pub transaction_type: TransactionType,
    pub currency: Currency,
    pub amount: Decimal,
    pub deadline: Deadline,
    pub applicable_from: NaiveDate,
    /// Evaluated against the running total of the reporting window instead
    /// of the single transaction amount.
    pub cumulative: bool,
    pub obligation: ObligationKind,
    pub description: String,
}

impl ThresholdRule {
    pub fn is_in_force_on(&self, date: NaiveDate) -> bool {
        self.applicable_from <= date
    }
}

/// On-disk shape. Enum-valued fields stay strings here so a bad value can be
/// reported against the rule that carries it.
#[derive(Debug, Clone, Deserialize)]
struct RawRule {
    rule_id: String,
    transaction_type: String,
    currency: String,
    amount: Decimal,
    deadline: String,
    applicable_from: NaiveDate,
    #[serde(default)]
    cumulative: bool,
    obligation: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ThresholdFile {
    version: String,
    rules: Vec<RawRule>,
}

impl RawRule {
    fn into_rule(self) -> Result<ThresholdRule, ConfigError> {
        let transaction_type = TransactionType::from_str(&self.transaction_type).map_err(|_| {
            ConfigError::UnknownTransactionType {
                rule_id: self.rule_id.clone(),
                value: self.transaction_type.clone(),
            }
        })?;
        let deadline = Deadline::from_str(&self.deadline).map_err(|_| ConfigError::UnknownValue {
            rule_id: self.rule_id.clone(),
            field: "deadline",
            value: self.deadline.clone(),
        })?;
        let obligation =
            ObligationKind::from_str(&self.obligation).map_err(|_| ConfigError::UnknownValue {
                rule_id: self.rule_id.clone(),
                field: "obligation",
                value: self.obligation.clone(),
            })?;
        let currency = Currency::new(&self.currency).map_err(|_| {
            ConfigError::UnknownValue {
                rule_id: self.rule_id.clone(),
                field: "currency",
                value: self.currency.clone(),
            }
        })?;

        Ok(ThresholdRule {
            rule_id: self.rule_id,
            transaction_type,
            currency,
            amount: self.amount,
            deadline,
            applicable_from: self.applicable_from,
            cumulative: self.cumulative,
            obligation,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ThresholdTable {
    version: String,
    rules: Vec<ThresholdRule>,
}

impl ThresholdTable {
    /// Load a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, "threshold table")
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: ThresholdFile = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        let rules = file
            .rules
            .into_iter()
            .map(RawRule::into_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(file.version, rules)
    }

    /// Build a table from already-typed rules, enforcing positive amounts and
    /// unique rule ids.
    pub fn from_rules(
        version: impl Into<String>,
        mut rules: Vec<ThresholdRule>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.amount <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveAmount {
                    rule_id: rule.rule_id.clone(),
                    amount: rule.amount,
                });
            }
            if !seen.insert(rule.rule_id.as_str()) {
                return Err(ConfigError::DuplicateRuleId {
                    rule_id: rule.rule_id.clone(),
                });
            }
        }

        rules.sort_by(|a, b| {
            a.transaction_type
                .cmp(&b.transaction_type)
                .then(a.amount.cmp(&b.amount))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });

        let version = version.into();
        log::info!("threshold table {version}: loaded {} rules", rules.len());
        Ok(Self { version, rules })
    }

    /// Rules of `transaction_type` denominated in `currency`, smallest
    /// threshold first, ties broken by rule_id.
    pub fn lookup(
        &self,
        transaction_type: TransactionType,
        currency: &Currency,
    ) -> Vec<&ThresholdRule> {
        self.rules_for(transaction_type)
            .filter(|r| &r.currency == currency)
            .collect()
    }

    /// Rules of `transaction_type` in any currency, in lookup order.
    pub fn rules_for(
        &self,
        transaction_type: TransactionType,
    ) -> impl Iterator<Item = &ThresholdRule> {
        self.rules
            .iter()
            .filter(move |r| r.transaction_type == transaction_type)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThresholdRule> {
        self.rules.iter()
    }
}
