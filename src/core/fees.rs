//! Archival-research fee and VAT rate selection.

use crate::config::policy::PricingPolicy;
use crate::domain::model::{Currency, TaxTreatment};
use crate::utils::money::{percent_of, Amount};
use serde::{Deserialize, Serialize};

/// Whole-percent VAT rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRate(u32);

impl VatRate {
    pub const ZERO: VatRate = VatRate(0);

    pub fn from_percent(percent: u32) -> Self {
        Self(percent)
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `round(base * rate)`, ties up.
    pub fn apply(self, base: Amount) -> Amount {
        percent_of(base, self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeCalculator {
    israeli_archival_fee: Amount,
    international_archival_fee: Amount,
    vat_percent: u32,
}

impl Default for FeeCalculator {
    fn default() -> Self {
        Self::from_policy(&PricingPolicy::default())
    }
}

impl FeeCalculator {
    pub fn from_policy(policy: &PricingPolicy) -> Self {
        Self {
            israeli_archival_fee: policy.israeli_archival_fee,
            international_archival_fee: policy.international_archival_fee,
            vat_percent: policy.vat_percent,
        }
    }

    /// Flat fee, not per applicant. Currencies outside ILS/USD/GBP/EUR get none.
    pub fn archival_fee(&self, currency: &Currency, include_archival: bool) -> Amount {
        if !include_archival {
            return 0;
        }
        if currency.is_israeli() {
            self.israeli_archival_fee
        } else if currency.is_major_international() {
            self.international_archival_fee
        } else {
            0
        }
    }

    pub fn vat_rate(&self, currency: &Currency, include_vat: bool) -> VatRate {
        if include_vat && currency.is_israeli() {
            VatRate::from_percent(self.vat_percent)
        } else {
            VatRate::ZERO
        }
    }
}

/// Rate to charge on top of a price with the given treatment.
pub fn effective_vat_rate(rate: VatRate, tax: TaxTreatment) -> VatRate {
    match tax {
        TaxTreatment::Exclusive => rate,
        TaxTreatment::Inclusive => VatRate::ZERO,
    }
}

pub fn compute_archival_fee(currency: &Currency, include_archival: bool) -> Amount {
    FeeCalculator::default().archival_fee(currency, include_archival)
}

pub fn compute_vat_rate(currency: &Currency, include_vat: bool) -> VatRate {
    FeeCalculator::default().vat_rate(currency, include_vat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ils() -> Currency {
        Currency::new("1", "₪", "ILS")
    }

    #[test]
    fn test_archival_fee_by_currency() {
        assert_eq!(compute_archival_fee(&ils(), true), 1650);
        assert_eq!(compute_archival_fee(&Currency::new("2", "$", "USD"), true), 850);
        assert_eq!(compute_archival_fee(&Currency::new("3", "£", "GBP"), true), 850);
        assert_eq!(compute_archival_fee(&Currency::new("4", "€", "EUR"), true), 850);
        assert_eq!(compute_archival_fee(&Currency::new("5", "CHF", "CHF"), true), 0);
        assert_eq!(compute_archival_fee(&ils(), false), 0);
    }

    #[test]
    fn test_vat_only_for_israeli_currency() {
        assert_eq!(compute_vat_rate(&ils(), true).percent(), 17);
        assert!(compute_vat_rate(&ils(), false).is_zero());
        assert!(compute_vat_rate(&Currency::new("2", "$", "USD"), true).is_zero());
    }

    #[test]
    fn test_vat_apply_rounds_half_up() {
        let rate = VatRate::from_percent(17);
        assert_eq!(rate.apply(1650), 281);
        assert_eq!(rate.apply(4175), 710);
        assert_eq!(rate.apply(2088), 355);
        assert_eq!(VatRate::ZERO.apply(1000), 0);
    }

    #[test]
    fn test_inclusive_price_is_not_taxed_again() {
        let rate = VatRate::from_percent(17);
        assert_eq!(effective_vat_rate(rate, TaxTreatment::Exclusive), rate);
        assert!(effective_vat_rate(rate, TaxTreatment::Inclusive).is_zero());
    }

    #[test]
    fn test_policy_overrides_constants() {
        let policy = PricingPolicy {
            israeli_archival_fee: 2000,
            international_archival_fee: 900,
            vat_percent: 18,
        };
        let fees = FeeCalculator::from_policy(&policy);
        assert_eq!(fees.archival_fee(&ils(), true), 2000);
        assert_eq!(fees.vat_rate(&ils(), true).percent(), 18);
    }
}
