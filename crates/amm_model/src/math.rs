//! Constant product AMM math (x·y=k), no fee

use crate::{AmmError, Result};

/// Accept only finite quantities strictly greater than zero.
pub fn validate_amount(value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AmmError::InvalidAmount {
            input: value.to_string(),
        })
    }
}

/// Parse user-supplied text into a positive amount
pub fn parse_amount(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| AmmError::InvalidAmount {
        input: trimmed.to_string(),
    })?;
    validate_amount(value).map_err(|_| AmmError::InvalidAmount {
        input: trimmed.to_string(),
    })
}

/// Output of a swap that keeps K fixed
///
/// - x1 = x0 + Δx_in
/// - y1 = k / x1
/// - Δy_out = y0 - y1
///
/// `0 < Δy_out < y0` for any positive input on a consistent pool: the output
/// reserve approaches zero but is never fully drained.
///
/// # Arguments
/// * `reserve_in` - Reserve of the asset being paid in
/// * `reserve_out` - Reserve of the asset being received
/// * `k` - Constant product held by the pool
/// * `amount_in` - Amount paid in
pub fn amount_out(reserve_in: f64, reserve_out: f64, k: f64, amount_in: f64) -> Result<f64> {
    let amount_in = validate_amount(amount_in)?;
    if k <= 0.0 || reserve_in <= 0.0 || reserve_out <= 0.0 {
        return Err(AmmError::EmptyPool);
    }

    let (_, new_reserve_out) = reserves_after(reserve_in, k, amount_in);
    let out = reserve_out - new_reserve_out;
    if out.is_nan() || out <= 0.0 {
        return Err(AmmError::OutputTooSmall { amount_in });
    }
    if out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    Ok(out)
}

/// Reserves `(x1, y1)` after paying `amount_in` into a pool holding K.
///
/// A committed swap stores these directly. Subtracting the output from the
/// old reserve instead cancels badly once `amount_in` dwarfs `reserve_in`,
/// and the product then drifts away from K.
pub fn reserves_after(reserve_in: f64, k: f64, amount_in: f64) -> (f64, f64) {
    let new_reserve_in = reserve_in + amount_in;
    (new_reserve_in, k / new_reserve_in)
}

/// Share of the post-trade input reserve contributed by this trade, in percent.
pub fn price_impact_pct(reserve_in: f64, amount_in: f64) -> f64 {
    amount_in / (reserve_in + amount_in) * 100.0
}
