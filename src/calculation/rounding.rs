//! Currency rounding policy.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to `scale` decimal places, halves away from zero.
///
/// Colombian pesos are settled in whole units, so the shipped configuration
/// uses a scale of 0.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let severance = Decimal::from_str("1216666.6667").unwrap();
/// assert_eq!(round_money(severance, 0), Decimal::from(1_216_667));
/// ```
pub fn round_money(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}
