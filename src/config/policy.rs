use crate::domain::model::{PricingTierTable, TierKey};
use crate::utils::error::{PricingError, Result};
use crate::utils::money::Amount;
use crate::utils::validation::{validate_non_negative_amount, validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ISRAELI_ARCHIVAL_FEE: Amount = 1650;
pub const DEFAULT_INTERNATIONAL_ARCHIVAL_FEE: Amount = 850;
pub const DEFAULT_VAT_PERCENT: u32 = 17;

/// 定價政策：檔案研究費用與增值稅率
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub israeli_archival_fee: Amount,
    pub international_archival_fee: Amount,
    pub vat_percent: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            israeli_archival_fee: DEFAULT_ISRAELI_ARCHIVAL_FEE,
            international_archival_fee: DEFAULT_INTERNATIONAL_ARCHIVAL_FEE,
            vat_percent: DEFAULT_VAT_PERCENT,
        }
    }
}

impl Validate for PricingPolicy {
    fn validate(&self) -> Result<()> {
        validate_non_negative_amount("policy.israeli_archival_fee", self.israeli_archival_fee)?;
        validate_non_negative_amount(
            "policy.international_archival_fee",
            self.international_archival_fee,
        )?;
        validate_range("policy.vat_percent", self.vat_percent, 0, 100)
    }
}

/// 系統預設價目表，模板沒有對應價格時使用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTiers {
    pub usd: PricingTierTable,
    pub nis: PricingTierTable,
}

impl Default for DefaultTiers {
    fn default() -> Self {
        Self {
            usd: PricingTierTable::from_prices([2500, 2250, 2000, 1750, 1500, 1250, 1000]),
            nis: PricingTierTable::from_prices([9000, 8000, 7200, 6300, 5400, 4500, 3600]),
        }
    }
}

impl Validate for DefaultTiers {
    fn validate(&self) -> Result<()> {
        for (name, table) in [("default_tiers.usd", &self.usd), ("default_tiers.nis", &self.nis)] {
            if !table.is_complete() {
                let missing: Vec<&str> = TierKey::ALL
                    .iter()
                    .filter(|key| table.get(**key).is_none())
                    .map(|key| key.as_str())
                    .collect();
                return Err(PricingError::InvalidConfigValueError {
                    field: name.to_string(),
                    value: missing.join(", "),
                    reason: "Default tier tables must define every tier".to_string(),
                });
            }
            for (key, price) in table.entries() {
                validate_non_negative_amount(&format!("{}.{}", name, key), price)?;
            }
        }
        Ok(())
    }
}
