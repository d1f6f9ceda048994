use crate::config::policy::PricingPolicy;
use crate::core::assembler::{
    assemble_preview, assemble_snapshot, unpriced_snapshot, PriceTotals, SnapshotParts,
};
use crate::core::fees::{effective_vat_rate, FeeCalculator};
use crate::core::payment_plan::build_payment_plan;
use crate::core::tiers::{resolve_price_per_applicant, TierTableDefaultPricer};
use crate::domain::contract::ContractRecord;
use crate::domain::model::{ContractInputs, ContractPricingSnapshot, ContractTemplate, Currency};
use crate::domain::ports::DefaultPricer;
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::Validate;

/// 定價引擎：層級解析 → 費用計算 → 付款計畫 → 組裝快照
pub struct PricingEngine<P: DefaultPricer = TierTableDefaultPricer> {
    fees: FeeCalculator,
    pricer: P,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingPolicy::default(), TierTableDefaultPricer::default())
    }
}

impl<P: DefaultPricer> PricingEngine<P> {
    pub fn new(policy: PricingPolicy, pricer: P) -> Self {
        Self {
            fees: FeeCalculator::from_policy(&policy),
            pricer,
        }
    }

    /// 建立合約用：結構性問題回傳錯誤
    pub fn price_contract(&self, inputs: &ContractInputs) -> Result<ContractPricingSnapshot> {
        let template = inputs.template.as_ref().ok_or(PricingError::MissingTemplate)?;
        let currency = inputs.currency.as_ref().ok_or(PricingError::MissingCurrency)?;
        if inputs.applicant_count < 1 {
            return Err(PricingError::InvalidApplicantCount {
                count: inputs.applicant_count,
            });
        }
        template.validate()?;

        let parts = self.run_stages(Some(template), currency, inputs)?;
        let snapshot = assemble_snapshot(parts)?;

        tracing::info!(
            template_id = %template.id,
            applicant_count = snapshot.applicant_count,
            final_amount = snapshot.final_amount,
            installments = snapshot.payment_plan.len(),
            "Contract priced"
        );
        Ok(snapshot)
    }

    /// 即時預覽用：永不失敗，無法定價時回傳歸零的快照
    pub fn preview(&self, inputs: &ContractInputs) -> ContractPricingSnapshot {
        let template = inputs.template.as_ref();
        let Some(currency) = inputs.currency.as_ref() else {
            tracing::warn!("No currency selected; returning unpriced preview");
            return unpriced_snapshot(template, "", inputs.applicant_count, inputs.include_vat);
        };
        if inputs.applicant_count < 1 {
            tracing::warn!(
                applicant_count = inputs.applicant_count,
                "Invalid applicant count; pricing preview at the first tier"
            );
        }

        match self.run_stages(template, currency, inputs) {
            Ok(parts) => assemble_preview(parts),
            Err(e) => {
                tracing::warn!("Pricing preview degraded: {}", e);
                unpriced_snapshot(
                    template,
                    &currency.display_label,
                    inputs.applicant_count,
                    inputs.include_vat,
                )
            }
        }
    }

    /// Prices `inputs` and stores the result on a draft contract.
    pub fn reprice(&self, contract: &mut ContractRecord, inputs: &ContractInputs) -> Result<()> {
        if contract.is_signed() {
            return Err(PricingError::ContractLocked {
                contract_id: contract.id.clone(),
            });
        }
        let snapshot = self.price_contract(inputs)?;
        contract.apply_pricing(snapshot)
    }

    fn run_stages<'a>(
        &self,
        template: Option<&'a ContractTemplate>,
        currency: &'a Currency,
        inputs: &ContractInputs,
    ) -> Result<SnapshotParts<'a>> {
        let resolved = resolve_price_per_applicant(
            inputs.applicant_count,
            currency,
            template,
            inputs.include_vat,
            &self.pricer,
        );
        tracing::debug!(
            tier = %resolved.tier,
            per_applicant_price = resolved.amount,
            source = ?resolved.source,
            "Tier resolved"
        );

        let archival_fee = self
            .fees
            .archival_fee(currency, inputs.include_archival_research);
        let vat_rate = effective_vat_rate(
            self.fees.vat_rate(currency, inputs.include_vat),
            resolved.tax,
        );
        tracing::debug!(archival_fee, vat_percent = vat_rate.percent(), "Fees computed");

        let totals = PriceTotals::compute(resolved.amount, inputs.applicant_count);
        let payment_plan = build_payment_plan(
            totals.final_amount,
            archival_fee,
            vat_rate,
            inputs.include_archival_research,
            &currency.display_label,
            inputs.start_date,
        )?;
        tracing::debug!(
            final_amount = totals.final_amount,
            installments = payment_plan.len(),
            "Payment plan built"
        );

        Ok(SnapshotParts {
            template,
            currency_label: &currency.display_label,
            applicant_count: inputs.applicant_count,
            resolved,
            totals,
            archival_fee,
            include_vat: inputs.include_vat,
            payment_plan,
        })
    }
}
