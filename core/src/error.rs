use crate::types::TransactionType;
use rust_decimal::Decimal;
use thiserror::Error;

/// Malformed or unreadable configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Rule '{rule_id}': amount must be positive, got {amount}")]
    NonPositiveAmount { rule_id: String, amount: Decimal },

    #[error("Rule '{rule_id}': unknown transaction_type '{value}'")]
    UnknownTransactionType { rule_id: String, value: String },

    #[error("Rule '{rule_id}': unknown {field} '{value}'")]
    UnknownValue {
        rule_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Duplicate rule_id '{rule_id}'")]
    DuplicateRuleId { rule_id: String },

    #[error("Risk model: {reason}")]
    RiskModel { reason: String },

    #[error("Required fields for {transaction_type}: {reason}")]
    RequiredFields {
        transaction_type: TransactionType,
        reason: String,
    },

    #[error("CASP catalog: {reason}")]
    CaspCatalog { reason: String },
}

/// Structurally invalid evaluation input. Fatal for the call only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("amount must not be negative, got {amount}")]
    NegativeAmount { amount: Decimal },

    #[error("{field}: '{code}' is not an ISO 3166-1 alpha-2 country code")]
    UnknownCountry { field: &'static str, code: String },

    #[error("'{code}' is not a three-letter currency code")]
    InvalidCurrency { code: String },

    #[error(
        "no {transaction_type} rule is defined in {actual}; table uses {expected} (no conversion is performed)"
    )]
    CurrencyMismatch {
        transaction_type: TransactionType,
        expected: String,
        actual: String,
    },

    #[error("running total {running_total} is below the transaction amount {amount}")]
    RunningTotalBelowAmount {
        running_total: Decimal,
        amount: Decimal,
    },

    #[error("running total must not be negative, got {running_total}")]
    NegativeRunningTotal { running_total: Decimal },

    #[error("unknown CASP type '{casp_type}'")]
    UnknownCaspType { casp_type: String },

    #[error("malformed record: {field}: {reason}")]
    Malformed { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(
        "Rule '{rule_id}' is cumulative: a running total for the {transaction_type} reporting window is required"
    )]
    InsufficientContext {
        rule_id: String,
        transaction_type: TransactionType,
    },
}

impl ComplianceError {
    /// Process exit status the command-line tools report for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ComplianceError::Config(_) => 1,
            ComplianceError::Validation(_) | ComplianceError::InsufficientContext { .. } => 2,
        }
    }
}

pub type ComplianceResult<T> = Result<T, ComplianceError>;
