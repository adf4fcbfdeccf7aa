//! The per-call input record.

use crate::{
    country::CountryCode,
    error::ValidationError,
    types::{AssetType, Currency, CustomerFlag, TransactionType},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity data carried alongside a transfer. Every field is optional here;
/// which ones are required depends on the transaction type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartyDetails {
    #[serde(default)]
    pub originator_name: Option<String>,
    #[serde(default)]
    pub originator_address: Option<String>,
    #[serde(default)]
    pub originator_id: Option<String>,
    #[serde(default)]
    pub beneficiary_name: Option<String>,
    #[serde(default)]
    pub beneficiary_address: Option<String>,
    #[serde(default)]
    pub beneficiary_account: Option<String>,
}

/// A single named field of [`PartyDetails`], as referenced by the
/// required-field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    OriginatorName,
    OriginatorAddress,
    OriginatorId,
    BeneficiaryName,
    BeneficiaryAddress,
    BeneficiaryAccount,
}

impl RecordField {
    /// True when the field holds a non-blank value.
    pub fn is_present(&self, parties: &PartyDetails) -> bool {
        let value = match self {
            RecordField::OriginatorName => &parties.originator_name,
            RecordField::OriginatorAddress => &parties.originator_address,
            RecordField::OriginatorId => &parties.originator_id,
            RecordField::BeneficiaryName => &parties.beneficiary_name,
            RecordField::BeneficiaryAddress => &parties.beneficiary_address,
            RecordField::BeneficiaryAccount => &parties.beneficiary_account,
        };
        value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionRecord {
    pub amount: Decimal,
    pub currency: Currency,
    pub transaction_type: TransactionType,
    pub origin_country: CountryCode,
    pub destination_country: CountryCode,
    pub asset_type: AssetType,
    #[serde(default)]
    pub customer_risk_flags: BTreeSet<CustomerFlag>,
    /// Date the transaction is evaluated for. Rules not yet in force on this
    /// date are skipped; when absent every loaded rule is in force.
    #[serde(default)]
    pub value_date: Option<NaiveDate>,
    #[serde(default)]
    pub parties: PartyDetails,
}

impl TransactionRecord {
    pub fn new(
        transaction_type: TransactionType,
        amount: Decimal,
        currency: &str,
        origin_country: &str,
        destination_country: &str,
        asset_type: AssetType,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            amount,
            currency: Currency::new(currency)?,
            transaction_type,
            origin_country: CountryCode::parse(origin_country, "origin_country")?,
            destination_country: CountryCode::parse(destination_country, "destination_country")?,
            asset_type,
            customer_risk_flags: BTreeSet::new(),
            value_date: None,
            parties: PartyDetails::default(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = CustomerFlag>) -> Self {
        self.customer_risk_flags.extend(flags);
        self
    }

    pub fn with_parties(mut self, parties: PartyDetails) -> Self {
        self.parties = parties;
        self
    }

    pub fn with_value_date(mut self, date: NaiveDate) -> Self {
        self.value_date = Some(date);
        self
    }

    /// Parse a record from JSON. Any structural problem (unknown field,
    /// unknown enum value, bad country code) is reported as a malformed
    /// record rather than a configuration error.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let record: TransactionRecord =
            serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
                field: "record".into(),
                reason: e.to_string(),
            })?;
        record.validate()?;
        Ok(record)
    }

    /// Structural checks that the type system does not already enforce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}
