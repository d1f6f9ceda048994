use crate::utils::error::{PricingError, Result};
use crate::utils::money::Amount;
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const ISRAELI_CODES: [&str; 2] = ["ILS", "NIS"];
const ISRAELI_SYMBOL: char = '₪';
const INTERNATIONAL_CODES: [&str; 3] = ["USD", "GBP", "EUR"];
const INTERNATIONAL_SYMBOLS: [char; 3] = ['$', '£', '€'];

/// Applicant-count bucket used to index a [`PricingTierTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TierKey {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4-7")]
    FourToSeven,
    #[serde(rename = "8-9")]
    EightToNine,
    #[serde(rename = "10-15")]
    TenToFifteen,
    #[serde(rename = "16+")]
    SixteenPlus,
}

impl TierKey {
    pub const ALL: [TierKey; 7] = [
        TierKey::One,
        TierKey::Two,
        TierKey::Three,
        TierKey::FourToSeven,
        TierKey::EightToNine,
        TierKey::TenToFifteen,
        TierKey::SixteenPlus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TierKey::One => "1",
            TierKey::Two => "2",
            TierKey::Three => "3",
            TierKey::FourToSeven => "4-7",
            TierKey::EightToNine => "8-9",
            TierKey::TenToFifteen => "10-15",
            TierKey::SixteenPlus => "16+",
        }
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-applicant prices keyed by tier. Any tier may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTierTable {
    #[serde(rename = "1", default, skip_serializing_if = "Option::is_none")]
    pub one: Option<Amount>,
    #[serde(rename = "2", default, skip_serializing_if = "Option::is_none")]
    pub two: Option<Amount>,
    #[serde(rename = "3", default, skip_serializing_if = "Option::is_none")]
    pub three: Option<Amount>,
    #[serde(rename = "4-7", default, skip_serializing_if = "Option::is_none")]
    pub four_to_seven: Option<Amount>,
    #[serde(rename = "8-9", default, skip_serializing_if = "Option::is_none")]
    pub eight_to_nine: Option<Amount>,
    #[serde(rename = "10-15", default, skip_serializing_if = "Option::is_none")]
    pub ten_to_fifteen: Option<Amount>,
    #[serde(rename = "16+", default, skip_serializing_if = "Option::is_none")]
    pub sixteen_plus: Option<Amount>,
}

impl PricingTierTable {
    pub fn get(&self, key: TierKey) -> Option<Amount> {
        match key {
            TierKey::One => self.one,
            TierKey::Two => self.two,
            TierKey::Three => self.three,
            TierKey::FourToSeven => self.four_to_seven,
            TierKey::EightToNine => self.eight_to_nine,
            TierKey::TenToFifteen => self.ten_to_fifteen,
            TierKey::SixteenPlus => self.sixteen_plus,
        }
    }

    pub fn set(&mut self, key: TierKey, price: Amount) {
        let slot = match key {
            TierKey::One => &mut self.one,
            TierKey::Two => &mut self.two,
            TierKey::Three => &mut self.three,
            TierKey::FourToSeven => &mut self.four_to_seven,
            TierKey::EightToNine => &mut self.eight_to_nine,
            TierKey::TenToFifteen => &mut self.ten_to_fifteen,
            TierKey::SixteenPlus => &mut self.sixteen_plus,
        };
        *slot = Some(price);
    }

    pub fn with(mut self, key: TierKey, price: Amount) -> Self {
        self.set(key, price);
        self
    }

    /// Builds a fully configured table from prices in [`TierKey::ALL`] order.
    pub fn from_prices(prices: [Amount; 7]) -> Self {
        TierKey::ALL
            .into_iter()
            .zip(prices)
            .fold(Self::default(), |table, (key, price)| table.with(key, price))
    }

    pub fn is_empty(&self) -> bool {
        TierKey::ALL.iter().all(|key| self.get(*key).is_none())
    }

    pub fn is_complete(&self) -> bool {
        TierKey::ALL.iter().all(|key| self.get(*key).is_some())
    }

    pub fn entries(&self) -> impl Iterator<Item = (TierKey, Amount)> + '_ {
        TierKey::ALL
            .into_iter()
            .filter_map(|key| self.get(key).map(|price| (key, price)))
    }
}

/// Pricing partition of currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurrencyFamily {
    Israeli,
    International,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    pub display_label: String,
    pub iso_code: String,
}

impl Currency {
    pub fn new(id: impl Into<String>, display_label: impl Into<String>, iso_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
            iso_code: iso_code.into(),
        }
    }

    fn normalized_code(&self) -> String {
        self.iso_code.trim().to_ascii_uppercase()
    }

    fn carries_symbol(&self, symbol: char) -> bool {
        self.iso_code.contains(symbol) || self.display_label.contains(symbol)
    }

    pub fn family(&self) -> CurrencyFamily {
        let code = self.normalized_code();
        if ISRAELI_CODES.contains(&code.as_str()) || self.carries_symbol(ISRAELI_SYMBOL) {
            CurrencyFamily::Israeli
        } else {
            CurrencyFamily::International
        }
    }

    pub fn is_israeli(&self) -> bool {
        self.family() == CurrencyFamily::Israeli
    }

    /// USD, GBP or EUR, by code or symbol.
    pub fn is_major_international(&self) -> bool {
        if self.is_israeli() {
            return false;
        }
        let code = self.normalized_code();
        INTERNATIONAL_CODES.contains(&code.as_str())
            || INTERNATIONAL_SYMBOLS
                .iter()
                .any(|symbol| self.carries_symbol(*symbol))
    }
}

/// Where a template record came from. Resolved once when the template is
/// loaded; pricing never looks at it except to copy the legacy id through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TemplateSource {
    #[default]
    Modern,
    #[serde(rename_all = "camelCase")]
    Legacy { legacy_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: TemplateSource,
    /// USD/GBP/EUR tiers.
    #[serde(default)]
    pub pricing_tiers_usd: Option<PricingTierTable>,
    #[serde(default)]
    pub pricing_tiers_nis: Option<PricingTierTable>,
    /// Undifferentiated table from templates that predate per-currency pricing.
    #[serde(default)]
    pub pricing_tiers: Option<PricingTierTable>,
}

impl ContractTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            source: TemplateSource::Modern,
            pricing_tiers_usd: None,
            pricing_tiers_nis: None,
            pricing_tiers: None,
        }
    }

    pub fn legacy_id(&self) -> Option<&str> {
        match &self.source {
            TemplateSource::Legacy { legacy_id } => Some(legacy_id),
            TemplateSource::Modern => None,
        }
    }

    pub fn family_table(&self, family: CurrencyFamily) -> Option<&PricingTierTable> {
        match family {
            CurrencyFamily::Israeli => self.pricing_tiers_nis.as_ref(),
            CurrencyFamily::International => self.pricing_tiers_usd.as_ref(),
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = (&'static str, &PricingTierTable)> + '_ {
        [
            ("pricing_tiers_usd", self.pricing_tiers_usd.as_ref()),
            ("pricing_tiers_nis", self.pricing_tiers_nis.as_ref()),
            ("pricing_tiers", self.pricing_tiers.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, table)| table.map(|table| (name, table)))
    }
}

impl Validate for ContractTemplate {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("template.id", &self.id)?;
        if let TemplateSource::Legacy { legacy_id } = &self.source {
            validate_non_empty_string("template.legacy_id", legacy_id)?;
        }
        for (name, table) in self.tables() {
            if let Some((key, price)) = table.entries().find(|(_, price)| *price < 0) {
                return Err(PricingError::InvalidTierPrice {
                    table: name.to_string(),
                    tier: key.to_string(),
                    price,
                });
            }
        }
        Ok(())
    }
}

/// Whether a resolved price already contains VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxTreatment {
    Exclusive,
    Inclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PricingSource {
    /// The template's table for the currency family.
    Template,
    /// The template's undifferentiated legacy table.
    LegacyTable,
    SystemDefault,
    /// No currency was selected, so nothing was priced.
    Unpriced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub percent_of_nominal: u32,
    pub due_date: NaiveDate,
    pub value: Amount,
    pub value_vat: Amount,
    pub label: String,
    pub notes: String,
    pub currency: String,
}

/// Pricing payload attached to a contract record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPricingSnapshot {
    pub applicant_count: i64,
    pub pricing_tiers: PricingTierTable,
    pub per_applicant_price: Amount,
    pub total_amount: Amount,
    pub discount_percentage: u32,
    pub discount_amount: Amount,
    pub final_amount: Amount,
    pub currency: String,
    pub archival_research_fee: Amount,
    pub include_vat: bool,
    pub vat_included_in_price: bool,
    pub pricing_source: PricingSource,
    pub template_id: Option<String>,
    pub legacy_template_id: Option<String>,
    pub payment_plan: Vec<Installment>,
}

impl ContractPricingSnapshot {
    /// False for previews built from an invalid count or with no price.
    pub fn is_complete(&self) -> bool {
        self.applicant_count >= 1 && self.per_applicant_price > 0
    }

    pub fn installment_total(&self) -> Amount {
        self.payment_plan
            .iter()
            .fold(0, |total: Amount, i| total.saturating_add(i.value))
    }

    pub fn vat_total(&self) -> Amount {
        self.payment_plan
            .iter()
            .fold(0, |total: Amount, i| total.saturating_add(i.value_vat))
    }
}

/// Everything the engine needs for one pricing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInputs {
    pub template: Option<ContractTemplate>,
    pub currency: Option<Currency>,
    pub applicant_count: i64,
    pub include_archival_research: bool,
    pub include_vat: bool,
    pub start_date: NaiveDate,
}
