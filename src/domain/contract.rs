use crate::domain::model::ContractPricingSnapshot;
use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractStatus {
    Draft,
    Signed,
}

/// Contract record as far as pricing is concerned: the snapshot may be
/// replaced while the contract is a draft and is frozen once signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub id: String,
    pub status: ContractStatus,
    pub pricing: Option<ContractPricingSnapshot>,
}

impl ContractRecord {
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: ContractStatus::Draft,
            pricing: None,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.status == ContractStatus::Signed
    }

    pub fn apply_pricing(&mut self, snapshot: ContractPricingSnapshot) -> Result<()> {
        if self.is_signed() {
            return Err(PricingError::ContractLocked {
                contract_id: self.id.clone(),
            });
        }
        tracing::debug!(
            contract_id = %self.id,
            final_amount = snapshot.final_amount,
            "Replacing draft pricing snapshot"
        );
        self.pricing = Some(snapshot);
        Ok(())
    }

    pub fn sign(&mut self) -> Result<()> {
        if self.is_signed() {
            return Err(PricingError::InvalidContractState {
                message: format!("contract {} is already signed", self.id),
            });
        }
        if self.pricing.is_none() {
            return Err(PricingError::InvalidContractState {
                message: format!("contract {} has no pricing to sign", self.id),
            });
        }
        self.status = ContractStatus::Signed;
        tracing::info!(contract_id = %self.id, "Contract signed; pricing frozen");
        Ok(())
    }
}
