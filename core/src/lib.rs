//! Deterministic evaluator for Turkish crypto-asset AML/CFT obligations.
//!
//! Tables (thresholds, risk model, required fields, CASP catalog) are loaded
//! once into a [`config::ComplianceContext`] and shared read-only. Every
//! evaluation is a pure function of a record and that context:
//!
//! - [`rule_evaluator::evaluate`]: which threshold rules a transaction triggers
//! - [`risk_scorer::score`]: score, tier and contributing factors
//! - [`compliance_checker::check`]: both of the above plus missing fields
//! - [`casp::summarize`]: obligations for a service-provider profile

pub mod casp;
pub mod compliance_checker;
pub mod config;
pub mod country;
pub mod error;
pub mod reporting_window;
pub mod risk_scorer;
pub mod rule_evaluator;
pub mod threshold_table;
pub mod transaction;
pub mod types;

pub use compliance_checker::{check, ComplianceReport};
pub use config::{ComplianceContext, Settings};
pub use error::{ComplianceError, ComplianceResult, ConfigError, ValidationError};
pub use transaction::TransactionRecord;
