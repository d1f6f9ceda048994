//! Installment schedule generation.
//!
//! The standard split is 50/25/25 at day 0/30/60. Every installment is rounded
//! on its own, so the values of a split may differ from the amount being split
//! by a unit or two; that difference is kept as-is.

use crate::core::fees::VatRate;
use crate::domain::model::Installment;
use crate::utils::error::{PricingError, Result};
use crate::utils::money::{percent_of, Amount};
use chrono::{Days, NaiveDate};

pub const ARCHIVAL_RESEARCH_LABEL: &str = "Archival Research";

struct SplitStep {
    percent: u32,
    offset_days: u64,
    label: &'static str,
}

const STANDARD_SPLIT: [SplitStep; 3] = [
    SplitStep {
        percent: 50,
        offset_days: 0,
        label: "First Payment",
    },
    SplitStep {
        percent: 25,
        offset_days: 30,
        label: "Intermediate Payment",
    },
    SplitStep {
        percent: 25,
        offset_days: 60,
        label: "Final Payment",
    },
];

fn due_date(start_date: NaiveDate, days: u64) -> Result<NaiveDate> {
    start_date
        .checked_add_days(Days::new(days))
        .ok_or(PricingError::DateOutOfRange {
            start: start_date,
            days,
        })
}

fn installment(
    percent: u32,
    due_date: NaiveDate,
    value: Amount,
    vat_rate: VatRate,
    label: &str,
    currency: &str,
) -> Installment {
    Installment {
        percent_of_nominal: percent,
        due_date,
        value,
        value_vat: vat_rate.apply(value),
        label: label.to_string(),
        notes: String::new(),
        currency: currency.to_string(),
    }
}

fn standard_split(
    amount: Amount,
    vat_rate: VatRate,
    currency: &str,
    start_date: NaiveDate,
) -> Result<Vec<Installment>> {
    STANDARD_SPLIT
        .iter()
        .map(|step| {
            Ok(installment(
                step.percent,
                due_date(start_date, step.offset_days)?,
                percent_of(amount, step.percent),
                vat_rate,
                step.label,
                currency,
            ))
        })
        .collect()
}

/// Builds the installment schedule for `final_amount`.
///
/// With archival research (flag set and a positive fee) the fee is billed
/// first at 100% of itself, and the remainder of `final_amount` goes through
/// the standard split only when it is positive.
pub fn build_payment_plan(
    final_amount: Amount,
    archival_fee: Amount,
    vat_rate: VatRate,
    include_archival: bool,
    currency: &str,
    start_date: NaiveDate,
) -> Result<Vec<Installment>> {
    if !include_archival || archival_fee <= 0 {
        return standard_split(final_amount, vat_rate, currency, start_date);
    }

    let mut plan = vec![installment(
        100,
        start_date,
        archival_fee,
        vat_rate,
        ARCHIVAL_RESEARCH_LABEL,
        currency,
    )];

    let rest_amount = final_amount.saturating_sub(archival_fee);
    if rest_amount > 0 {
        plan.extend(standard_split(rest_amount, vat_rate, currency, start_date)?);
    } else {
        tracing::debug!(
            final_amount,
            archival_fee,
            "Archival fee covers the whole amount; no standard installments"
        );
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_standard_split_without_archival() {
        let plan = build_payment_plan(1000, 0, VatRate::ZERO, false, "$", start()).unwrap();

        let percents: Vec<u32> = plan.iter().map(|i| i.percent_of_nominal).collect();
        let values: Vec<Amount> = plan.iter().map(|i| i.value).collect();
        let offsets: Vec<i64> = plan.iter().map(|i| (i.due_date - start()).num_days()).collect();
        let labels: Vec<&str> = plan.iter().map(|i| i.label.as_str()).collect();

        assert_eq!(percents, vec![50, 25, 25]);
        assert_eq!(values, vec![500, 250, 250]);
        assert_eq!(offsets, vec![0, 30, 60]);
        assert_eq!(labels, vec!["First Payment", "Intermediate Payment", "Final Payment"]);
        assert!(plan.iter().all(|i| i.value_vat == 0 && i.notes.is_empty() && i.currency == "$"));
    }

    #[test]
    fn test_independent_rounding_is_not_corrected() {
        let plan = build_payment_plan(1002, 0, VatRate::ZERO, false, "$", start()).unwrap();
        let values: Vec<Amount> = plan.iter().map(|i| i.value).collect();
        // 501 + 251 + 251 = 1003
        assert_eq!(values, vec![501, 251, 251]);
    }

    #[test]
    fn test_flag_with_zero_fee_uses_standard_split() {
        let plan = build_payment_plan(1000, 0, VatRate::ZERO, true, "CHF", start()).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].label, "First Payment");
    }

    #[test]
    fn test_archival_installment_first() {
        let vat = VatRate::from_percent(17);
        let plan = build_payment_plan(10000, 1650, vat, true, "₪", start()).unwrap();

        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].label, ARCHIVAL_RESEARCH_LABEL);
        assert_eq!(plan[0].percent_of_nominal, 100);
        assert_eq!(plan[0].value, 1650);
        assert_eq!(plan[0].value_vat, 281);
        assert_eq!(plan[0].due_date, start());

        let rest: Vec<(Amount, Amount)> = plan[1..].iter().map(|i| (i.value, i.value_vat)).collect();
        assert_eq!(rest, vec![(4175, 710), (2088, 355), (2088, 355)]);
    }

    #[test]
    fn test_archival_only_when_nothing_remains() {
        let plan = build_payment_plan(850, 850, VatRate::ZERO, true, "$", start()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].value, 850);

        let plan = build_payment_plan(0, 850, VatRate::ZERO, true, "$", start()).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_negative_final_amount_keeps_archival_only() {
        let plan = build_payment_plan(i64::MIN, 850, VatRate::ZERO, true, "$", start()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].value, 850);
    }

    #[test]
    fn test_due_date_overflow_is_an_error() {
        let err = build_payment_plan(1000, 0, VatRate::ZERO, false, "$", NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, PricingError::DateOutOfRange { days: 30, .. }));
    }
}
