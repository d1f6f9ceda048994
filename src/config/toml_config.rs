use crate::config::policy::{DefaultTiers, PricingPolicy};
use crate::domain::model::{
    ContractInputs, ContractTemplate, Currency, PricingTierTable, TemplateSource,
};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 報價設定檔：定價政策、預設價目表、模板、幣別與請求參數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub policy: PricingPolicy,
    #[serde(default)]
    pub default_tiers: DefaultTiers,
    pub template: Option<TemplateConfig>,
    pub currency: Option<CurrencyConfig>,
    pub request: RequestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub id: String,
    pub name: Option<String>,
    /// 舊版模板來源的識別碼；設定時模板視為舊版來源
    pub legacy_id: Option<String>,
    pub pricing_tiers_usd: Option<PricingTierTable>,
    pub pricing_tiers_nis: Option<PricingTierTable>,
    pub pricing_tiers: Option<PricingTierTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub id: Option<String>,
    pub display_label: String,
    pub iso_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub applicant_count: i64,
    pub include_archival_research: Option<bool>,
    pub include_vat: Option<bool>,
    /// ISO 日期字串，例如 "2024-01-15"；未設定時使用當天日期
    pub start_date: Option<NaiveDate>,
}

impl TemplateConfig {
    pub fn to_template(&self) -> ContractTemplate {
        let source = match &self.legacy_id {
            Some(legacy_id) => TemplateSource::Legacy {
                legacy_id: legacy_id.clone(),
            },
            None => TemplateSource::Modern,
        };
        ContractTemplate {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_default(),
            source,
            pricing_tiers_usd: self.pricing_tiers_usd.clone(),
            pricing_tiers_nis: self.pricing_tiers_nis.clone(),
            pricing_tiers: self.pricing_tiers.clone(),
        }
    }
}

impl CurrencyConfig {
    pub fn to_currency(&self) -> Currency {
        Currency {
            id: self.id.clone().unwrap_or_else(|| self.iso_code.clone()),
            display_label: self.display_label.clone(),
            iso_code: self.iso_code.clone(),
        }
    }
}

impl QuoteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DEFAULT_CURRENCY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn template(&self) -> Option<ContractTemplate> {
        self.template.as_ref().map(TemplateConfig::to_template)
    }

    pub fn currency(&self) -> Option<Currency> {
        self.currency.as_ref().map(CurrencyConfig::to_currency)
    }

    /// 轉換為引擎輸入；`today` 用於未指定起始日期時
    pub fn to_inputs(&self, today: NaiveDate) -> ContractInputs {
        ContractInputs {
            template: self.template(),
            currency: self.currency(),
            applicant_count: self.request.applicant_count,
            include_archival_research: self.request.include_archival_research.unwrap_or(false),
            include_vat: self.request.include_vat.unwrap_or(false),
            start_date: self.request.start_date.unwrap_or(today),
        }
    }
}

impl QuoteConfig {
    /// 建立合約前的檢查：模板與幣別區段必須存在
    pub fn validate_for_contract(&self) -> Result<()> {
        self.validate()?;
        validate_required_field("template", &self.template)?;
        validate_required_field("currency", &self.currency)?;
        Ok(())
    }
}

impl Validate for QuoteConfig {
    fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        self.default_tiers.validate()?;

        if let Some(template) = self.template() {
            template.validate()?;
        }
        if let Some(currency) = &self.currency {
            validate_non_empty_string("currency.display_label", &currency.display_label)?;
            validate_non_empty_string("currency.iso_code", &currency.iso_code)?;
        }
        Ok(())
    }
}
