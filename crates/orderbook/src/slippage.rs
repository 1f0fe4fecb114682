//! Limit-price protection.
//!
//! The only place a slippage margin is applied to a quote. Exact integer
//! arithmetic throughout: quoted amounts routinely exceed what a float can
//! hold, and the result must be reproducible from the inputs alone.

use alloy_primitives::U256;

/// Basis-point denominator.
pub const MAX_SLIPPAGE_BIPS: u32 = 10_000;

/// Applied when the order definition does not specify a tolerance (1%).
pub const DEFAULT_SLIPPAGE_BIPS: u32 = 100;

/// Reduces a quoted buy amount by the slippage tolerance:
/// `buy_amount * (10000 - bips) / 10000`, truncating.
///
/// A tolerance of 10000 bips or more would zero out (or underflow) the
/// limit price and is rejected; callers validate this before any network
/// call, this check is the last line of defense.
pub fn apply_slippage(buy_amount_quote: U256, slippage_bips: u32) -> eyre::Result<U256> {
    if slippage_bips >= MAX_SLIPPAGE_BIPS {
        eyre::bail!(
            "Slippage tolerance must be below {} bips, got {}",
            MAX_SLIPPAGE_BIPS,
            slippage_bips
        );
    }

    let keep = U256::from(MAX_SLIPPAGE_BIPS - slippage_bips);
    let scaled = buy_amount_quote
        .checked_mul(keep)
        .ok_or_else(|| eyre::eyre!("Buy amount too large to apply slippage"))?;

    Ok(scaled / U256::from(MAX_SLIPPAGE_BIPS))
}
