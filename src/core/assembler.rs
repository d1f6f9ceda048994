use crate::core::tiers::ResolvedPrice;
use crate::domain::model::{
    ContractPricingSnapshot, ContractTemplate, Installment, PricingSource, PricingTierTable,
    TaxTreatment,
};
use crate::utils::error::{PricingError, Result};
use crate::utils::money::Amount;

/// Discounts are not offered yet; the fields stay in the payload at zero.
const DISCOUNT_PERCENTAGE: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTotals {
    pub total_amount: Amount,
    pub discount_amount: Amount,
    pub final_amount: Amount,
}

impl PriceTotals {
    /// Counts below zero are priced as zero applicants.
    pub fn compute(per_applicant_price: Amount, applicant_count: i64) -> Self {
        let total_amount = per_applicant_price.saturating_mul(applicant_count.max(0));
        let discount_amount = 0;
        Self {
            total_amount,
            discount_amount,
            final_amount: total_amount.saturating_sub(discount_amount),
        }
    }
}

/// Stage outputs gathered for one snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotParts<'a> {
    pub template: Option<&'a ContractTemplate>,
    pub currency_label: &'a str,
    pub applicant_count: i64,
    pub resolved: ResolvedPrice,
    pub totals: PriceTotals,
    pub archival_fee: Amount,
    pub include_vat: bool,
    pub payment_plan: Vec<Installment>,
}

/// Strict assembly for contract creation.
pub fn assemble_snapshot(parts: SnapshotParts<'_>) -> Result<ContractPricingSnapshot> {
    if parts.template.is_none() {
        return Err(PricingError::MissingTemplate);
    }
    if parts.applicant_count < 1 {
        return Err(PricingError::InvalidApplicantCount {
            count: parts.applicant_count,
        });
    }
    Ok(assemble_preview(parts))
}

/// Best-effort assembly for UI previews; never fails.
pub fn assemble_preview(parts: SnapshotParts<'_>) -> ContractPricingSnapshot {
    let (template_id, legacy_template_id) = match parts.template {
        Some(template) => match template.legacy_id() {
            Some(legacy_id) => (None, Some(legacy_id.to_string())),
            None => (Some(template.id.clone()), None),
        },
        None => (None, None),
    };

    ContractPricingSnapshot {
        applicant_count: parts.applicant_count,
        pricing_tiers: parts.resolved.table,
        per_applicant_price: parts.resolved.amount,
        total_amount: parts.totals.total_amount,
        discount_percentage: DISCOUNT_PERCENTAGE,
        discount_amount: parts.totals.discount_amount,
        final_amount: parts.totals.final_amount,
        currency: parts.currency_label.to_string(),
        archival_research_fee: parts.archival_fee,
        include_vat: parts.include_vat,
        vat_included_in_price: parts.resolved.tax == TaxTreatment::Inclusive,
        pricing_source: parts.resolved.source,
        template_id,
        legacy_template_id,
        payment_plan: parts.payment_plan,
    }
}

/// Zeroed snapshot for a request that cannot be priced. `currency_label` is
/// empty when no currency was selected.
pub fn unpriced_snapshot(
    template: Option<&ContractTemplate>,
    currency_label: &str,
    applicant_count: i64,
    include_vat: bool,
) -> ContractPricingSnapshot {
    let resolved = ResolvedPrice {
        tier: crate::core::tiers::resolve_tier_key(applicant_count),
        amount: 0,
        table: PricingTierTable::default(),
        source: PricingSource::Unpriced,
        tax: TaxTreatment::Exclusive,
    };
    assemble_preview(SnapshotParts {
        template,
        currency_label,
        applicant_count,
        resolved,
        totals: PriceTotals::compute(0, applicant_count),
        archival_fee: 0,
        include_vat,
        payment_plan: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{TemplateSource, TierKey};

    fn resolved(amount: Amount) -> ResolvedPrice {
        ResolvedPrice {
            tier: TierKey::One,
            amount,
            table: PricingTierTable::default().with(TierKey::One, amount),
            source: PricingSource::Template,
            tax: TaxTreatment::Exclusive,
        }
    }

    fn parts<'a>(template: Option<&'a ContractTemplate>, applicant_count: i64) -> SnapshotParts<'a> {
        SnapshotParts {
            template,
            currency_label: "$",
            applicant_count,
            resolved: resolved(1000),
            totals: PriceTotals::compute(1000, applicant_count),
            archival_fee: 0,
            include_vat: false,
            payment_plan: Vec::new(),
        }
    }

    #[test]
    fn test_totals() {
        let totals = PriceTotals::compute(2000, 5);
        assert_eq!(totals.total_amount, 10000);
        assert_eq!(totals.discount_amount, 0);
        assert_eq!(totals.final_amount, 10000);
        assert_eq!(PriceTotals::compute(2000, -3).final_amount, 0);
    }

    #[test]
    fn test_missing_template_is_structural_error() {
        assert!(matches!(
            assemble_snapshot(parts(None, 1)),
            Err(PricingError::MissingTemplate)
        ));
    }

    #[test]
    fn test_invalid_count_rejected_by_strict_assembly() {
        let template = ContractTemplate::new("t-1");
        assert!(matches!(
            assemble_snapshot(parts(Some(&template), 0)),
            Err(PricingError::InvalidApplicantCount { count: 0 })
        ));
        let preview = assemble_preview(parts(Some(&template), 0));
        assert_eq!(preview.total_amount, 0);
        assert!(!preview.is_complete());
    }

    #[test]
    fn test_legacy_template_id_passthrough() {
        let mut template = ContractTemplate::new("t-9");
        template.source = TemplateSource::Legacy {
            legacy_id: "1187".to_string(),
        };
        let snapshot = assemble_snapshot(parts(Some(&template), 1)).unwrap();
        assert_eq!(snapshot.legacy_template_id.as_deref(), Some("1187"));
        assert_eq!(snapshot.template_id, None);

        let modern = ContractTemplate::new("t-10");
        let snapshot = assemble_snapshot(parts(Some(&modern), 1)).unwrap();
        assert_eq!(snapshot.template_id.as_deref(), Some("t-10"));
        assert_eq!(snapshot.legacy_template_id, None);
    }

    #[test]
    fn test_unpriced_snapshot_is_zeroed() {
        let snapshot = unpriced_snapshot(None, "", 3, true);
        assert_eq!(snapshot.currency, "");
        assert_eq!(snapshot.per_applicant_price, 0);
        assert_eq!(snapshot.final_amount, 0);
        assert_eq!(snapshot.pricing_source, PricingSource::Unpriced);
        assert!(snapshot.payment_plan.is_empty());

        let snapshot = unpriced_snapshot(None, "€", 2, false);
        assert_eq!(snapshot.currency, "€");
        assert_eq!(snapshot.total_amount, 0);
    }
}
