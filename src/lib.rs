pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, OutputFormat};

pub use crate::config::{DefaultTiers, PricingPolicy, QuoteConfig};
pub use crate::core::{
    engine::PricingEngine,
    fees::{compute_archival_fee, compute_vat_rate, VatRate},
    payment_plan::build_payment_plan,
    preview::{payment_plan_csv, render_preview},
    tiers::{resolve_price_per_applicant, resolve_tier_key, TierTableDefaultPricer},
};
pub use crate::domain::contract::{ContractRecord, ContractStatus};
pub use crate::domain::model::{
    ContractInputs, ContractPricingSnapshot, ContractTemplate, Currency, CurrencyFamily,
    Installment, PricingSource, PricingTierTable, TaxTreatment, TemplateSource, TierKey,
};
pub use crate::domain::ports::{DefaultPrice, DefaultPricer};
pub use crate::utils::error::{PricingError, Result};
