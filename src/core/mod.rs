pub mod assembler;
pub mod engine;
pub mod fees;
pub mod payment_plan;
pub mod preview;
pub mod tiers;

pub use crate::domain::model::{ContractInputs, ContractPricingSnapshot, Installment};
pub use crate::domain::ports::{DefaultPrice, DefaultPricer};
pub use crate::utils::error::Result;
