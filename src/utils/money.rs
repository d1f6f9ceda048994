//! Whole-unit amount arithmetic.
//!
//! Amounts are integers in the currency's main unit (no minor units). Every
//! rounding in the pricing pipeline goes through [`round_half_up`], which
//! rounds ties toward positive infinity.

/// Whole currency units.
pub type Amount = i64;

/// `round(numerator / denominator)` with ties rounded up.
///
/// `denominator` must be positive.
pub fn round_half_up(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

/// `round(amount * percent / 100)`.
pub fn percent_of(amount: Amount, percent: u32) -> Amount {
    let rounded = round_half_up(amount as i128 * percent as i128, 100);
    rounded.clamp(Amount::MIN as i128, Amount::MAX as i128) as Amount
}
