//! Monetary types and the fixed settlement constants.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Amount of TON represented as a Decimal for precision.
pub type Ton = Decimal;

/// Decimal places of one nanoton, the smallest TON unit.
pub const NANOTON_SCALE: u32 = 9;

/// Share of the pooled stakes kept as a fee on directional settlements.
///
/// Hard-coded on purpose: unlike the withdrawal fee it is not exposed in
/// configuration, since changing it alters payouts of markets already open.
pub const SETTLEMENT_FEE_RATE: Decimal = dec!(0.02);

/// Relative distance from the strike below which a settlement is a draw.
pub const TIE_TOLERANCE: Decimal = dec!(0.002);

/// Round an amount toward zero to nanoton precision.
#[must_use]
pub fn floor_nanoton(amount: Ton) -> Ton {
    amount.round_dp_with_strategy(NANOTON_SCALE, RoundingStrategy::ToZero)
}
