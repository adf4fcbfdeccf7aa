//! Shared closed vocabularies used across the rule tables and records.
//!
//! Every enum here has one canonical wire name (snake_case, as it appears in
//! the JSON tables and on the command line). Parsing is case-insensitive and
//! accepts `-` in place of `_`.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a string names no variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! wire_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $ty::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    WireTransfer,
    Cash,
    CryptoWithdrawal,
    TravelRule,
    CryptoDeposit,
    CryptoTransfer,
    FiatDeposit,
    FiatWithdrawal,
}

wire_names!(TransactionType, "transaction_type", {
    WireTransfer => "wire_transfer",
    Cash => "cash",
    CryptoWithdrawal => "crypto_withdrawal",
    TravelRule => "travel_rule",
    CryptoDeposit => "crypto_deposit",
    CryptoTransfer => "crypto_transfer",
    FiatDeposit => "fiat_deposit",
    FiatWithdrawal => "fiat_withdrawal",
});

/// Reporting deadline attached to a threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deadline {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "same_day")]
    SameDay,
    #[serde(rename = "10_business_days")]
    TenBusinessDays,
}

wire_names!(Deadline, "deadline", {
    Immediate => "immediate",
    SameDay => "same_day",
    TenBusinessDays => "10_business_days",
});

/// What a triggered rule obliges the provider to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    LargeTransactionReport,
    CashTransactionReport,
    TravelRule,
    EnhancedDueDiligence,
    SuspiciousTransactionReport,
}

wire_names!(ObligationKind, "obligation", {
    LargeTransactionReport => "large_transaction_report",
    CashTransactionReport => "cash_transaction_report",
    TravelRule => "travel_rule",
    EnhancedDueDiligence => "enhanced_due_diligence",
    SuspiciousTransactionReport => "suspicious_transaction_report",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Fiat,
    Stablecoin,
    PrivacyCoin,
    OtherCrypto,
}

wire_names!(AssetType, "asset_type", {
    Fiat => "fiat",
    Stablecoin => "stablecoin",
    PrivacyCoin => "privacy_coin",
    OtherCrypto => "other_crypto",
});

/// Customer-level risk indicators. Records carry these as a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerFlag {
    #[serde(alias = "PEP")]
    Pep,
    HighRiskJurisdiction,
    NewAccount,
    StructuringPattern,
}

wire_names!(CustomerFlag, "customer flag", {
    Pep => "pep",
    HighRiskJurisdiction => "high_risk_jurisdiction",
    NewAccount => "new_account",
    StructuringPattern => "structuring_pattern",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

wire_names!(RiskTier, "risk tier", {
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// Three-letter uppercase currency code. No conversion between currencies
/// ever happens inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Currency(code.to_ascii_uppercase()))
        } else {
            Err(ValidationError::InvalidCurrency {
                code: code.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::new(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
