use crate::{
    country::CountryCode,
    error::{ComplianceError, ComplianceResult, ConfigError},
    threshold_table::{ThresholdRule, ThresholdTable},
    transaction::RecordField,
    types::{
        AssetType, Currency, CustomerFlag, Deadline, ObligationKind, RiskTier, TransactionType,
    },
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "MASAK_DATA_DIR";
pub const TABLE_VERSION_ENV: &str = "MASAK_TABLE_VERSION";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_TABLE_VERSION: &str = "2025";

// ── Risk model ─────────────────────────────────────────────────────

/// Score boundaries. Scores below `medium_from` are low, scores from
/// `high_from` upward are high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBoundaries {
    pub medium_from: u8,
    pub high_from: u8,
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            medium_from: 31,
            high_from: 71,
        }
    }
}

impl TierBoundaries {
    pub fn tier_for(&self, score: u8) -> RiskTier {
        if score >= self.high_from {
            RiskTier::High
        } else if score >= self.medium_from {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.medium_from == 0 || self.medium_from >= self.high_from || self.high_from > 100 {
            return Err(ConfigError::RiskModel {
                reason: format!(
                    "tier boundaries must satisfy 0 < medium_from < high_from <= 100, got {} / {}",
                    self.medium_from, self.high_from
                ),
            });
        }
        Ok(())
    }
}

/// Risk weight for a directed (origin, destination) corridor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionPair {
    pub origin: CountryCode,
    pub destination: CountryCode,
    /// Negative for mitigating corridors.
    pub weight: i32,
    pub label: String,
    #[serde(default)]
    pub edd_required: bool,
    /// Comprehensively sanctioned corridor.
    #[serde(default)]
    pub prohibited: bool,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Classification of a single country. Used for corridors without an
/// explicit pair, where the riskier of the two ends applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRisk {
    pub country: CountryCode,
    pub weight: i32,
    pub label: String,
    #[serde(default)]
    pub edd_required: bool,
    #[serde(default)]
    pub prohibited: bool,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl CountryRisk {
    /// Prohibited outranks EDD, which outranks plain weight.
    fn severity(&self) -> (bool, bool, i32) {
        (self.prohibited, self.edd_required, self.weight)
    }
}

/// Extra weight for transfers that stay inside a watched group of
/// countries and touch at least one of its trigger countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorAlert {
    pub alert_id: String,
    pub countries: Vec<CountryCode>,
    pub triggers: Vec<CountryCode>,
    pub weight: i32,
    pub label: String,
    #[serde(default)]
    pub edd_required: bool,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl CorridorAlert {
    pub fn matches(&self, origin: &CountryCode, destination: &CountryCode) -> bool {
        self.countries.contains(origin)
            && self.countries.contains(destination)
            && (self.triggers.contains(origin) || self.triggers.contains(destination))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBand {
    pub currency: Currency,
    pub min_amount: Decimal,
    pub weight: i32,
    pub label: String,
    #[serde(default)]
    pub edd_required: bool,
}

/// Everything a [`RiskModel`] is built from. Also the layout of
/// `risk_model/<version>.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskModelConfig {
    pub version: String,
    pub unclassified_pair_weight: i32,
    #[serde(default)]
    pub jurisdiction_pairs: Vec<JurisdictionPair>,
    #[serde(default)]
    pub country_risks: Vec<CountryRisk>,
    #[serde(default)]
    pub corridor_alerts: Vec<CorridorAlert>,
    #[serde(default)]
    pub flag_weights: BTreeMap<CustomerFlag, i32>,
    #[serde(default)]
    pub asset_weights: BTreeMap<AssetType, i32>,
    #[serde(default)]
    pub amount_bands: Vec<AmountBand>,
    #[serde(default)]
    pub tiers: TierBoundaries,
}

/// Jurisdiction, flag, asset and amount weights plus tier boundaries.
#[derive(Debug, Clone)]
pub struct RiskModel {
    version: String,
    unclassified_pair_weight: i32,
    pairs: HashMap<(CountryCode, CountryCode), JurisdictionPair>,
    countries: HashMap<CountryCode, CountryRisk>,
    corridor_alerts: Vec<CorridorAlert>,
    flag_weights: BTreeMap<CustomerFlag, i32>,
    asset_weights: BTreeMap<AssetType, i32>,
    amount_bands: Vec<AmountBand>,
    tiers: TierBoundaries,
}

impl RiskModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: RiskModelConfig = read_json(path.as_ref())?;
        Self::new(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RiskModelConfig = parse_json(json, "risk model")?;
        Self::new(config)
    }

    pub fn new(config: RiskModelConfig) -> Result<Self, ConfigError> {
        let RiskModelConfig {
            version,
            unclassified_pair_weight,
            jurisdiction_pairs,
            country_risks,
            corridor_alerts,
            flag_weights,
            asset_weights,
            mut amount_bands,
            tiers,
        } = config;
        tiers.validate()?;

        let mut pairs = HashMap::new();
        for pair in jurisdiction_pairs {
            let key = (pair.origin.clone(), pair.destination.clone());
            if pairs.contains_key(&key) {
                return Err(ConfigError::RiskModel {
                    reason: format!("duplicate jurisdiction pair {}->{}", key.0, key.1),
                });
            }
            pairs.insert(key, pair);
        }

        let mut countries = HashMap::new();
        for risk in country_risks {
            if countries.contains_key(&risk.country) {
                return Err(ConfigError::RiskModel {
                    reason: format!("duplicate country risk entry for {}", risk.country),
                });
            }
            countries.insert(risk.country.clone(), risk);
        }

        let mut alert_ids = HashSet::new();
        for alert in &corridor_alerts {
            if !alert_ids.insert(alert.alert_id.as_str()) {
                return Err(ConfigError::RiskModel {
                    reason: format!("duplicate corridor alert '{}'", alert.alert_id),
                });
            }
            if alert.countries.is_empty() || alert.triggers.is_empty() {
                return Err(ConfigError::RiskModel {
                    reason: format!(
                        "corridor alert '{}' needs at least one country and one trigger",
                        alert.alert_id
                    ),
                });
            }
            if let Some(trigger) = alert.triggers.iter().find(|t| !alert.countries.contains(t)) {
                return Err(ConfigError::RiskModel {
                    reason: format!(
                        "corridor alert '{}': trigger {trigger} is not one of its countries",
                        alert.alert_id
                    ),
                });
            }
        }

        if let Some(band) = amount_bands.iter().find(|b| b.min_amount <= Decimal::ZERO) {
            return Err(ConfigError::RiskModel {
                reason: format!("amount band '{}' must have a positive min_amount", band.label),
            });
        }
        amount_bands.sort_by(|a, b| {
            a.currency
                .cmp(&b.currency)
                .then(a.min_amount.cmp(&b.min_amount))
        });

        log::info!(
            "risk model {version}: {} jurisdiction pairs, {} countries, {} corridor alerts, \
             {} amount bands, tiers {}/{}",
            pairs.len(),
            countries.len(),
            corridor_alerts.len(),
            amount_bands.len(),
            tiers.medium_from,
            tiers.high_from
        );

        Ok(Self {
            version,
            unclassified_pair_weight,
            pairs,
            countries,
            corridor_alerts,
            flag_weights,
            asset_weights,
            amount_bands,
            tiers,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn jurisdiction_pair(
        &self,
        origin: &CountryCode,
        destination: &CountryCode,
    ) -> Option<&JurisdictionPair> {
        self.pairs.get(&(origin.clone(), destination.clone()))
    }

    pub fn country_risk(&self, country: &CountryCode) -> Option<&CountryRisk> {
        self.countries.get(country)
    }

    /// The riskier end of a corridor. An unlisted end counts as
    /// unclassified at the baseline weight; `None` means that baseline
    /// is the riskier of the two.
    pub fn riskier_end(
        &self,
        origin: &CountryCode,
        destination: &CountryCode,
    ) -> Option<&CountryRisk> {
        let mut riskiest: Option<&CountryRisk> = None;
        let mut unlisted = false;
        for country in [origin, destination] {
            match self.countries.get(country) {
                Some(risk) if riskiest.map_or(true, |r| risk.severity() > r.severity()) => {
                    riskiest = Some(risk)
                }
                Some(_) => {}
                None => unlisted = true,
            }
        }
        let baseline = (false, false, self.unclassified_pair_weight);
        riskiest.filter(|r| !unlisted || r.severity() > baseline)
    }

    /// Alerts whose corridor the transfer falls into, in table order.
    pub fn corridor_alerts<'a>(
        &'a self,
        origin: &'a CountryCode,
        destination: &'a CountryCode,
    ) -> impl Iterator<Item = &'a CorridorAlert> + 'a {
        self.corridor_alerts
            .iter()
            .filter(move |a| a.matches(origin, destination))
    }

    /// Weight applied when a corridor has no entry: unclassified, treated
    /// as medium risk.
    pub fn unclassified_pair_weight(&self) -> i32 {
        self.unclassified_pair_weight
    }

    pub fn flag_weight(&self, flag: CustomerFlag) -> i32 {
        self.flag_weights.get(&flag).copied().unwrap_or(0)
    }

    pub fn asset_weight(&self, asset: AssetType) -> i32 {
        self.asset_weights.get(&asset).copied().unwrap_or(0)
    }

    /// Highest band in `currency` that `amount` reaches.
    pub fn amount_band(&self, currency: &Currency, amount: Decimal) -> Option<&AmountBand> {
        self.amount_bands
            .iter()
            .rev()
            .find(|b| &b.currency == currency && amount >= b.min_amount)
    }

    pub fn tiers(&self) -> TierBoundaries {
        self.tiers
    }
}


// ── Required fields ────────────────────────────────────────────────

/// A named requirement satisfied by any one of several record fields,
/// e.g. "originator address or national ID".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequirement {
    pub name: String,
    pub any_of: Vec<RecordField>,
}

#[derive(Debug, Clone, Deserialize)]
struct RequiredFieldsFile {
    version: String,
    requirements: HashMap<TransactionType, Vec<FieldRequirement>>,
}

#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    by_type: HashMap<TransactionType, Vec<FieldRequirement>>,
}

impl RequiredFields {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file: RequiredFieldsFile = read_json(path.as_ref())?;
        log::info!(
            "required fields {}: {} transaction types",
            file.version,
            file.requirements.len()
        );
        Self::new(file.requirements)
    }

    pub fn new(
        by_type: HashMap<TransactionType, Vec<FieldRequirement>>,
    ) -> Result<Self, ConfigError> {
        for (transaction_type, requirements) in &by_type {
            let mut names = HashSet::new();
            for req in requirements {
                if req.any_of.is_empty() {
                    return Err(ConfigError::RequiredFields {
                        transaction_type: *transaction_type,
                        reason: format!("requirement '{}' lists no fields", req.name),
                    });
                }
                if !names.insert(req.name.as_str()) {
                    return Err(ConfigError::RequiredFields {
                        transaction_type: *transaction_type,
                        reason: format!("requirement '{}' is listed twice", req.name),
                    });
                }
            }
        }
        Ok(Self { by_type })
    }

    pub fn required_fields_for(&self, transaction_type: TransactionType) -> &[FieldRequirement] {
        self.by_type
            .get(&transaction_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ── CASP catalog ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaspTypeConfig {
    pub casp_type: String,
    pub label: String,
    pub transaction_types: Vec<TransactionType>,
}

/// Programme requirements that apply once a provider serves at least
/// `min_customers` customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerTier {
    pub min_customers: u64,
    pub label: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CaspCatalogFile {
    version: String,
    casp_types: Vec<CaspTypeConfig>,
    customer_tiers: Vec<CustomerTier>,
}

#[derive(Debug, Clone)]
pub struct CaspCatalog {
    casp_types: Vec<CaspTypeConfig>,
    customer_tiers: Vec<CustomerTier>,
}

impl CaspCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file: CaspCatalogFile = read_json(path.as_ref())?;
        log::info!("CASP catalog {}: {} provider types", file.version, file.casp_types.len());
        Self::new(file.casp_types, file.customer_tiers)
    }

    pub fn new(
        casp_types: Vec<CaspTypeConfig>,
        mut customer_tiers: Vec<CustomerTier>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for casp in &casp_types {
            if !seen.insert(casp.casp_type.as_str()) {
                return Err(ConfigError::CaspCatalog {
                    reason: format!("duplicate casp_type '{}'", casp.casp_type),
                });
            }
        }

        customer_tiers.sort_by_key(|t| t.min_customers);
        // Every customer count must land in some tier.
        if customer_tiers.first().map(|t| t.min_customers) != Some(0) {
            return Err(ConfigError::CaspCatalog {
                reason: "customer tiers must start at min_customers = 0".into(),
            });
        }
        if customer_tiers
            .windows(2)
            .any(|w| w[0].min_customers == w[1].min_customers)
        {
            return Err(ConfigError::CaspCatalog {
                reason: "customer tiers must have distinct min_customers".into(),
            });
        }

        Ok(Self {
            casp_types,
            customer_tiers,
        })
    }

    pub fn casp_type(&self, casp_type: &str) -> Option<&CaspTypeConfig> {
        self.casp_types
            .iter()
            .find(|c| c.casp_type.eq_ignore_ascii_case(casp_type.trim()))
    }

    pub fn casp_types(&self) -> &[CaspTypeConfig] {
        &self.casp_types
    }

    pub fn customer_tier(&self, customers: u64) -> &CustomerTier {
        // Non-empty and starting at zero, checked in new().
        self.customer_tiers
            .iter()
            .rev()
            .find(|t| customers >= t.min_customers)
            .unwrap_or(&self.customer_tiers[0])
    }
}

// ── Settings & context ─────────────────────────────────────────────

/// Where the tables live and which version to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub table_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            table_version: DEFAULT_TABLE_VERSION.to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `MASAK_DATA_DIR` and `MASAK_TABLE_VERSION`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Ok(version) = std::env::var(TABLE_VERSION_ENV) {
            settings.table_version = version;
        }
        settings
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir
            .join(table)
            .join(format!("{}.json", self.table_version))
    }
}

/// Every table an evaluation needs, loaded once and shared read-only.
/// Reloading means building a new context.
#[derive(Debug, Clone)]
pub struct ComplianceContext {
    thresholds: ThresholdTable,
    risk_model: RiskModel,
    required_fields: RequiredFields,
    casp_catalog: CaspCatalog,
}

impl ComplianceContext {
    pub fn new(
        thresholds: ThresholdTable,
        risk_model: RiskModel,
        required_fields: RequiredFields,
        casp_catalog: CaspCatalog,
    ) -> Self {
        Self {
            thresholds,
            risk_model,
            required_fields,
            casp_catalog,
        }
    }

    /// Load all tables for `settings.table_version` from `settings.data_dir`.
    pub fn load(settings: &Settings) -> ComplianceResult<Self> {
        log::info!(
            "loading tables version {} from {}",
            settings.table_version,
            settings.data_dir.display()
        );
        let thresholds = ThresholdTable::load(settings.table_path("thresholds"))?;
        let risk_model = RiskModel::load(settings.table_path("risk_model"))?;
        let required_fields = RequiredFields::load(settings.table_path("required_fields"))?;
        let casp_catalog = CaspCatalog::load(settings.table_path("casp_profiles"))?;
        Ok(Self::new(thresholds, risk_model, required_fields, casp_catalog))
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn risk_model(&self) -> &RiskModel {
        &self.risk_model
    }

    pub fn required_fields(&self) -> &RequiredFields {
        &self.required_fields
    }

    pub fn casp_catalog(&self) -> &CaspCatalog {
        &self.casp_catalog
    }

    /// The 2025 MASAK tables, built in code. Mirrors `data/*/2025.json`.
    pub fn default_test() -> Self {
        Self::try_default_test().unwrap_or_else(|e| panic!("built-in tables are invalid: {e}"))
    }

    fn try_default_test() -> ComplianceResult<Self> {
        let thresholds = ThresholdTable::from_rules(DEFAULT_TABLE_VERSION, default_rules()?)?;
        let risk_model = default_risk_model()?;
        let required_fields = default_required_fields()?;
        let casp_catalog = default_casp_catalog()?;
        Ok(Self::new(thresholds, risk_model, required_fields, casp_catalog))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_json(&content, &path.display().to_string())
}

fn parse_json<T: DeserializeOwned>(json: &str, origin: &str) -> Result<T, ConfigError> {
    serde_json::from_str(json).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}

// ── Built-in 2025 tables ───────────────────────────────────────────

const BUILT_IN_EFFECTIVE_DATE: &str = "2025-01-01";

fn effective_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ConfigError::UnknownValue {
        rule_id: "built-in rules".into(),
        field: "applicable_from",
        value: value.to_string(),
    })
}

fn default_rules() -> ComplianceResult<Vec<ThresholdRule>> {
    let effective = effective_date(BUILT_IN_EFFECTIVE_DATE)?;
    let lira = Currency::new("TRY")?;
    let rule = |rule_id: &str,
                transaction_type: TransactionType,
                amount: i64,
                deadline: Deadline,
                cumulative: bool,
                obligation: ObligationKind,
                description: &str| ThresholdRule {
        rule_id: rule_id.to_string(),
        transaction_type,
        currency: lira.clone(),
        amount: Decimal::new(amount, 0),
        deadline,
        applicable_from: effective,
        cumulative,
        obligation,
        description: description.to_string(),
    };
    let edd = |rule_id: &str, transaction_type: TransactionType, cumulative: bool| {
        rule(
            rule_id,
            transaction_type,
            500_000,
            Deadline::Immediate,
            cumulative,
            ObligationKind::EnhancedDueDiligence,
            "Enhanced due diligence and source-of-funds verification",
        )
    };

    use Deadline::*;
    use ObligationKind::{
        CashTransactionReport, LargeTransactionReport, SuspiciousTransactionReport,
    };
    use TransactionType::{
        Cash, CryptoDeposit, CryptoTransfer, CryptoWithdrawal, FiatDeposit, FiatWithdrawal,
        WireTransfer,
    };
    Ok(vec![
        rule(
            "LTR-WIRE-75K",
            WireTransfer,
            75_000,
            SameDay,
            false,
            LargeTransactionReport,
            "Large transaction report for wire transfers",
        ),
        edd("EDD-WIRE-500K", WireTransfer, false),
        rule(
            "LTR-FIAT-DEP-75K",
            FiatDeposit,
            75_000,
            SameDay,
            false,
            LargeTransactionReport,
            "Large transaction report for fiat deposits",
        ),
        edd("EDD-FIAT-DEP-500K", FiatDeposit, false),
        rule(
            "LTR-FIAT-WDR-75K",
            FiatWithdrawal,
            75_000,
            SameDay,
            false,
            LargeTransactionReport,
            "Large transaction report for fiat withdrawals",
        ),
        edd("EDD-FIAT-WDR-500K", FiatWithdrawal, false),
        rule(
            "CTR-CASH-100K",
            Cash,
            100_000,
            SameDay,
            false,
            CashTransactionReport,
            "Cash transaction report",
        ),
        edd("EDD-CASH-500K", Cash, false),
        rule(
            "LTR-CRYPTO-WDR-75K",
            CryptoWithdrawal,
            75_000,
            SameDay,
            true,
            LargeTransactionReport,
            "Large transaction report on cumulative crypto withdrawals in the reporting window",
        ),
        edd("EDD-CRYPTO-WDR-500K", CryptoWithdrawal, true),
        rule(
            "LTR-CRYPTO-DEP-75K",
            CryptoDeposit,
            75_000,
            SameDay,
            false,
            LargeTransactionReport,
            "Large transaction report for crypto deposits",
        ),
        edd("EDD-CRYPTO-DEP-500K", CryptoDeposit, false),
        rule(
            "LTR-CRYPTO-TRF-75K",
            CryptoTransfer,
            75_000,
            SameDay,
            false,
            LargeTransactionReport,
            "Large transaction report for crypto transfers",
        ),
        edd("EDD-CRYPTO-TRF-500K", CryptoTransfer, false),
        rule(
            "TR-TRAVEL-15K",
            TransactionType::TravelRule,
            15_000,
            Immediate,
            false,
            ObligationKind::TravelRule,
            "Collect and transmit originator and beneficiary information",
        ),
        edd("EDD-TRAVEL-500K", TransactionType::TravelRule, false),
        rule(
            "STR-TRAVEL-500K",
            TransactionType::TravelRule,
            500_000,
            TenBusinessDays,
            false,
            SuspiciousTransactionReport,
            "Review for suspicious transaction report filing",
        ),
    ])
}

fn default_risk_model() -> ComplianceResult<RiskModel> {
    let country = |code: &str| CountryCode::parse(code, "risk_model");

    let mut jurisdiction_pairs = Vec::new();
    let corridors: &[(&str, &str, i32, &str, bool)] = &[
        ("TR", "TR", 0, "domestic", false),
        (
            "TR",
            "RU",
            60,
            "high-risk jurisdiction on the Turkey-Russia-Iran corridor",
            true,
        ),
        ("TR", "DE", -5, "low-risk jurisdiction", false),
        ("TR", "GB", -5, "low-risk jurisdiction", false),
        ("TR", "US", -5, "low-risk jurisdiction", false),
    ];
    for &(origin, destination, weight, label, edd_required) in corridors {
        for (from, to) in [(origin, destination), (destination, origin)] {
            let listed = jurisdiction_pairs.iter().any(|p: &JurisdictionPair| {
                p.origin.as_str() == from && p.destination.as_str() == to
            });
            if listed {
                continue;
            }
            let recommendations = if edd_required {
                vec!["Verify source and destination of funds".to_string()]
            } else {
                Vec::new()
            };
            jurisdiction_pairs.push(JurisdictionPair {
                origin: country(from)?,
                destination: country(to)?,
                weight,
                label: label.to_string(),
                edd_required,
                prohibited: false,
                recommendations,
            });
        }
    }

    let mut country_risks = Vec::new();
    let classes: &[(&[&str], i32, &str, bool, bool, &[&str])] = &[
        (
            &["IR", "KP", "SY", "CU"],
            100,
            "comprehensively sanctioned jurisdiction",
            true,
            true,
            &["Block: comprehensively sanctioned jurisdiction"],
        ),
        (
            &["RU", "BY", "MM", "VE", "YE"],
            50,
            "high-risk jurisdiction",
            true,
            false,
            &[
                "Enhanced due diligence required",
                "Verify source and destination of funds",
            ],
        ),
        (
            &["AE", "PK", "NG", "PH"],
            25,
            "elevated-risk jurisdiction",
            false,
            false,
            &["Additional monitoring recommended"],
        ),
        (&["TR"], 0, "standard-risk jurisdiction", false, false, &[]),
        (
            &["US", "GB", "DE", "FR", "JP", "SG", "CH"],
            -5,
            "low-risk jurisdiction",
            false,
            false,
            &[],
        ),
    ];
    for &(codes, weight, label, edd_required, prohibited, recommendations) in classes {
        for &code in codes {
            country_risks.push(CountryRisk {
                country: country(code)?,
                weight,
                label: label.to_string(),
                edd_required,
                prohibited,
                recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            });
        }
    }

    let corridor_alerts = vec![CorridorAlert {
        alert_id: "turkey_iran_russia".to_string(),
        countries: ["TR", "IR", "RU", "AE", "BY"]
            .into_iter()
            .map(country)
            .collect::<Result<_, _>>()?,
        triggers: vec![country("IR")?, country("RU")?],
        weight: 35,
        label: "Turkey-Iran-Russia sanctions-evasion corridor".to_string(),
        edd_required: true,
        recommendations: vec!["Manual review required - corridor transaction".to_string()],
    }];

    let flag_weights = BTreeMap::from([
        (CustomerFlag::Pep, 30),
        (CustomerFlag::HighRiskJurisdiction, 25),
        (CustomerFlag::NewAccount, 15),
        (CustomerFlag::StructuringPattern, 35),
    ]);
    let asset_weights = BTreeMap::from([
        (AssetType::Fiat, 0),
        (AssetType::Stablecoin, 15),
        (AssetType::PrivacyCoin, 40),
        (AssetType::OtherCrypto, 0),
    ]);
    let band = |currency: &str,
                min: i64,
                weight: i32,
                label: &str,
                edd_required: bool|
     -> ComplianceResult<AmountBand> {
        Ok(AmountBand {
            currency: Currency::new(currency)?,
            min_amount: Decimal::new(min, 0),
            weight,
            label: label.to_string(),
            edd_required,
        })
    };
    let amount_bands = vec![
        band("TRY", 340_000, 10, "significant amount", false)?,
        band("TRY", 3_400_000, 20, "large amount", true)?,
        band("USD", 10_000, 10, "significant amount", false)?,
        band("USD", 100_000, 20, "large amount", true)?,
    ];

    RiskModel::new(RiskModelConfig {
        version: DEFAULT_TABLE_VERSION.to_string(),
        unclassified_pair_weight: 35,
        jurisdiction_pairs,
        country_risks,
        corridor_alerts,
        flag_weights,
        asset_weights,
        amount_bands,
        tiers: TierBoundaries::default(),
    })
    .map_err(ComplianceError::from)
}

fn default_required_fields() -> ComplianceResult<RequiredFields> {
    use RecordField::*;
    let req = |name: &str, any_of: &[RecordField]| FieldRequirement {
        name: name.to_string(),
        any_of: any_of.to_vec(),
    };
    let travel_rule = vec![
        req("originator_name", &[OriginatorName]),
        req("originator_address_or_id", &[OriginatorAddress, OriginatorId]),
        req("beneficiary_name", &[BeneficiaryName]),
        req("beneficiary_address", &[BeneficiaryAddress]),
    ];
    let transfer = vec![
        req("originator_name", &[OriginatorName]),
        req("beneficiary_name", &[BeneficiaryName]),
        req("beneficiary_account", &[BeneficiaryAccount]),
    ];
    let by_type = HashMap::from([
        (TransactionType::TravelRule, travel_rule),
        (TransactionType::WireTransfer, transfer.clone()),
        (TransactionType::CryptoTransfer, transfer.clone()),
        (TransactionType::CryptoWithdrawal, transfer),
        (TransactionType::Cash, vec![req("originator_name", &[OriginatorName])]),
    ]);
    Ok(RequiredFields::new(by_type)?)
}

fn default_casp_catalog() -> ComplianceResult<CaspCatalog> {
    use TransactionType::*;
    let casp = |casp_type: &str, label: &str, types: &[TransactionType]| CaspTypeConfig {
        casp_type: casp_type.to_string(),
        label: label.to_string(),
        transaction_types: types.to_vec(),
    };
    let tier = |min_customers: u64, label: &str, requirements: &[&str]| CustomerTier {
        min_customers,
        label: label.to_string(),
        requirements: requirements.iter().map(|r| r.to_string()).collect(),
    };
    let casp_types = vec![
        casp(
            "exchange",
            "Crypto asset trading platform",
            &[
                WireTransfer,
                FiatDeposit,
                FiatWithdrawal,
                CryptoDeposit,
                CryptoWithdrawal,
                CryptoTransfer,
                TravelRule,
            ],
        ),
        casp(
            "custodian",
            "Crypto asset custodian",
            &[CryptoDeposit, CryptoWithdrawal, CryptoTransfer, TravelRule],
        ),
        casp(
            "wallet_provider",
            "Hosted wallet provider",
            &[CryptoDeposit, CryptoWithdrawal, CryptoTransfer, TravelRule],
        ),
        casp(
            "broker",
            "Crypto asset broker",
            &[
                WireTransfer,
                Cash,
                FiatDeposit,
                FiatWithdrawal,
                CryptoTransfer,
                TravelRule,
            ],
        ),
    ];
    let customer_tiers = vec![
        tier(
            0,
            "small",
            &[
                "Appoint a compliance officer registered with MASAK",
                "Written AML/CFT policy approved by the board",
            ],
        ),
        tier(
            10_000,
            "medium",
            &[
                "Automated transaction monitoring",
                "Annual independent AML audit",
            ],
        ),
        tier(
            100_000,
            "large",
            &[
                "Dedicated compliance unit with deputy compliance officer",
                "Real-time sanctions screening on all transfers",
            ],
        ),
    ];
    Ok(CaspCatalog::new(casp_types, customer_tiers)?)
}
