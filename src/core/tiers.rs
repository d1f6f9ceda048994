//! Applicant-count tiers and per-applicant price lookup.

use crate::config::policy::{DefaultTiers, PricingPolicy};
use crate::core::fees::VatRate;
use crate::domain::model::{
    ContractTemplate, Currency, CurrencyFamily, PricingSource, PricingTierTable, TaxTreatment,
    TierKey,
};
use crate::domain::ports::{DefaultPrice, DefaultPricer};
use crate::utils::money::Amount;

/// Maps an applicant count to its tier. Counts below 1 fall into tier `"1"`.
pub fn resolve_tier_key(applicant_count: i64) -> TierKey {
    match applicant_count {
        i64::MIN..=1 => TierKey::One,
        2 => TierKey::Two,
        3 => TierKey::Three,
        4..=7 => TierKey::FourToSeven,
        8..=9 => TierKey::EightToNine,
        10..=15 => TierKey::TenToFifteen,
        _ => TierKey::SixteenPlus,
    }
}

/// Smallest applicant count in a tier.
fn representative_count(key: TierKey) -> i64 {
    match key {
        TierKey::One => 1,
        TierKey::Two => 2,
        TierKey::Three => 3,
        TierKey::FourToSeven => 4,
        TierKey::EightToNine => 8,
        TierKey::TenToFifteen => 10,
        TierKey::SixteenPlus => 16,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub tier: TierKey,
    pub amount: Amount,
    /// The table the amount was read from.
    pub table: PricingTierTable,
    pub source: PricingSource,
    pub tax: TaxTreatment,
}

/// Looks up the per-applicant price.
///
/// Israeli currencies read the NIS table, everything else the USD-family
/// table; either way the template's legacy table is tried next. Negative
/// entries count as missing. When no table has the tier, `pricer` decides,
/// and for an Israeli currency with VAT requested its VAT-inclusive price is
/// used and flagged [`TaxTreatment::Inclusive`].
pub fn resolve_price_per_applicant<P: DefaultPricer + ?Sized>(
    applicant_count: i64,
    currency: &Currency,
    template: Option<&ContractTemplate>,
    include_vat: bool,
    pricer: &P,
) -> ResolvedPrice {
    let tier = resolve_tier_key(applicant_count);
    let family = currency.family();

    if let Some(template) = template {
        let candidates = [
            (template.family_table(family), PricingSource::Template),
            (template.pricing_tiers.as_ref(), PricingSource::LegacyTable),
        ];
        for (table, source) in candidates {
            let Some(table) = table else { continue };
            if let Some(amount) = table.get(tier).filter(|price| *price >= 0) {
                tracing::debug!(
                    template_id = %template.id,
                    tier = %tier,
                    amount,
                    ?source,
                    "Resolved per-applicant price from template"
                );
                return ResolvedPrice {
                    tier,
                    amount,
                    table: table.clone(),
                    source,
                    tax: TaxTreatment::Exclusive,
                };
            }
        }
    }

    let is_israeli = family == CurrencyFamily::Israeli;
    let tax = if is_israeli && include_vat {
        TaxTreatment::Inclusive
    } else {
        TaxTreatment::Exclusive
    };
    let pick = |price: DefaultPrice| match tax {
        TaxTreatment::Inclusive => price.price_with_vat,
        TaxTreatment::Exclusive => price.price,
    };
    let amount = pick(pricer.default_price(applicant_count.max(1), is_israeli));
    let table = TierKey::ALL.into_iter().fold(PricingTierTable::default(), |table, key| {
        let price = pick(pricer.default_price(representative_count(key), is_israeli));
        table.with(key, price)
    });

    tracing::debug!(tier = %tier, amount, ?tax, "Falling back to system default price");
    ResolvedPrice {
        tier,
        amount,
        table,
        source: PricingSource::SystemDefault,
        tax,
    }
}

/// Stock [`DefaultPricer`] backed by the configured default tier tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTableDefaultPricer {
    tiers: DefaultTiers,
    vat: VatRate,
}

impl Default for TierTableDefaultPricer {
    fn default() -> Self {
        Self::new(DefaultTiers::default(), &PricingPolicy::default())
    }
}

impl TierTableDefaultPricer {
    pub fn new(tiers: DefaultTiers, policy: &PricingPolicy) -> Self {
        Self {
            tiers,
            vat: VatRate::from_percent(policy.vat_percent),
        }
    }
}

impl DefaultPricer for TierTableDefaultPricer {
    fn default_price(&self, applicant_count: i64, is_israeli: bool) -> DefaultPrice {
        let tier = resolve_tier_key(applicant_count);
        if is_israeli {
            let price = self.tiers.nis.get(tier).unwrap_or(0);
            DefaultPrice {
                price,
                price_with_vat: price.saturating_add(self.vat.apply(price)),
            }
        } else {
            let price = self.tiers.usd.get(tier).unwrap_or(0);
            DefaultPrice {
                price,
                price_with_vat: price,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::new("2", "$", "USD")
    }

    fn ils() -> Currency {
        Currency::new("1", "₪", "ILS")
    }

    fn flat_pricer(applicant_count: i64, is_israeli: bool) -> DefaultPrice {
        let base = if is_israeli { 300 } else { 100 };
        let price = base * applicant_count.min(16);
        DefaultPrice {
            price,
            price_with_vat: price * 2,
        }
    }

    #[test]
    fn test_tier_key_boundaries() {
        let expected = [
            (1, "1"),
            (2, "2"),
            (3, "3"),
            (4, "4-7"),
            (7, "4-7"),
            (8, "8-9"),
            (9, "8-9"),
            (10, "10-15"),
            (15, "10-15"),
            (16, "16+"),
            (500, "16+"),
        ];
        for (count, key) in expected {
            assert_eq!(resolve_tier_key(count).as_str(), key, "count {}", count);
        }
    }

    #[test]
    fn test_invalid_counts_clamp_to_first_tier() {
        assert_eq!(resolve_tier_key(0), TierKey::One);
        assert_eq!(resolve_tier_key(-4), TierKey::One);
        assert_eq!(resolve_tier_key(i64::MIN), TierKey::One);
    }

    #[test]
    fn test_family_table_preferred_over_legacy() {
        let mut template = ContractTemplate::new("t-1");
        template.pricing_tiers_usd = Some(PricingTierTable::default().with(TierKey::Two, 900));
        template.pricing_tiers = Some(PricingTierTable::default().with(TierKey::Two, 700));

        let resolved = resolve_price_per_applicant(2, &usd(), Some(&template), false, &flat_pricer);
        assert_eq!(resolved.amount, 900);
        assert_eq!(resolved.source, PricingSource::Template);

        let resolved = resolve_price_per_applicant(2, &ils(), Some(&template), true, &flat_pricer);
        assert_eq!(resolved.amount, 700);
        assert_eq!(resolved.source, PricingSource::LegacyTable);
        assert_eq!(resolved.tax, TaxTreatment::Exclusive);
    }

    #[test]
    fn test_partial_family_table_falls_through_to_legacy() {
        let mut template = ContractTemplate::new("t-2");
        template.pricing_tiers_nis = Some(PricingTierTable::default().with(TierKey::One, 4000));
        template.pricing_tiers = Some(PricingTierTable::default().with(TierKey::Three, 3500));

        let resolved = resolve_price_per_applicant(3, &ils(), Some(&template), false, &flat_pricer);
        assert_eq!(resolved.amount, 3500);
        assert_eq!(resolved.source, PricingSource::LegacyTable);
    }

    #[test]
    fn test_negative_entry_is_treated_as_missing() {
        let mut template = ContractTemplate::new("t-3");
        template.pricing_tiers_usd = Some(PricingTierTable::default().with(TierKey::One, -10));

        let resolved = resolve_price_per_applicant(1, &usd(), Some(&template), false, &flat_pricer);
        assert_eq!(resolved.source, PricingSource::SystemDefault);
        assert_eq!(resolved.amount, 100);
    }

    #[test]
    fn test_israeli_fallback_with_vat_is_inclusive() {
        let resolved = resolve_price_per_applicant(2, &ils(), None, true, &flat_pricer);
        assert_eq!(resolved.amount, 1200);
        assert_eq!(resolved.tax, TaxTreatment::Inclusive);
        assert_eq!(resolved.table.get(TierKey::One), Some(600));

        let resolved = resolve_price_per_applicant(2, &ils(), None, false, &flat_pricer);
        assert_eq!(resolved.amount, 600);
        assert_eq!(resolved.tax, TaxTreatment::Exclusive);
    }

    #[test]
    fn test_international_fallback_never_inclusive() {
        let resolved = resolve_price_per_applicant(20, &usd(), None, true, &flat_pricer);
        assert_eq!(resolved.tier, TierKey::SixteenPlus);
        assert_eq!(resolved.amount, 1600);
        assert_eq!(resolved.tax, TaxTreatment::Exclusive);
    }

    #[test]
    fn test_tier_table_default_pricer() {
        let pricer = TierTableDefaultPricer::default();
        let usd_price = pricer.default_price(20, false);
        assert_eq!(usd_price.price, 1000);
        assert_eq!(usd_price.price_with_vat, 1000);

        let nis_price = pricer.default_price(1, true);
        assert_eq!(nis_price.price, 9000);
        assert_eq!(nis_price.price_with_vat, 10530);
    }

    #[test]
    fn test_default_price_with_vat_saturates() {
        let tiers = DefaultTiers {
            nis: PricingTierTable::from_prices([i64::MAX; 7]),
            ..DefaultTiers::default()
        };
        let pricer = TierTableDefaultPricer::new(tiers, &PricingPolicy::default());
        let price = pricer.default_price(1, true);
        assert_eq!(price.price, i64::MAX);
        assert_eq!(price.price_with_vat, i64::MAX);

        let resolved = resolve_price_per_applicant(1, &ils(), None, true, &pricer);
        assert_eq!(resolved.amount, i64::MAX);
        assert_eq!(resolved.tax, TaxTreatment::Inclusive);
    }
}
