//! # Polynomial Bonding Curve
//!
//! Prices every token unit as a function of how many units the engine has
//! already issued.
//!
//! ## Marginal Price
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │        price(s) = base + slope·s + curvature·s²             │
//! │                                                              │
//! │   Where:                                                     │
//! │   • s = units issued so far (the supply record)             │
//! │   • coefficients are scaled by PRICE_SCALE (10⁹)            │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `curvature = 0` gives a linear curve. Coefficients are unsigned, so every
//! configuration is non-decreasing in `s`.
//!
//! ## Buying and Selling
//!
//! Buying `n` units at supply `s` pays for units `s .. s+n`; selling `n`
//! units at supply `s` refunds units `s-n .. s`. Both sums use closed forms:
//!
//! ```text
//! Σ i   for i < k  =  k(k-1)/2
//! Σ i²  for i < k  =  (k-1)k(2k-1)/6
//! ```
//!
//! The buy sum is rounded **up** and the sell sum **down** when converting
//! back from the fixed-point scale, so a buy followed by the matching sell
//! never returns more than was paid.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, PRICE_SCALE};

/// Errors specific to curve evaluation
#[error_code(offset = 7000)]
pub enum CurveError {
    #[msg("Base price must be positive")]
    InvalidBasePrice,
    #[msg("Curve arithmetic overflow")]
    Overflow,
    #[msg("Cannot sell more than the issued supply")]
    InsufficientSupply,
}

/// Shape of a configured curve, derived from its coefficients
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    Flat,
    Linear,
    Quadratic,
}

/// Curve coefficients stored on every listing
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct CurveParams {
    /// Price of the first unit (scaled by PRICE_SCALE)
    pub base_price: u64,
    /// Linear coefficient (scaled by PRICE_SCALE)
    pub slope: u64,
    /// Quadratic coefficient (scaled by PRICE_SCALE)
    pub curvature: u64,
}

impl CurveParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.base_price > 0, CurveError::InvalidBasePrice);
        Ok(())
    }

    pub fn kind(&self) -> CurveKind {
        match (self.slope, self.curvature) {
            (_, c) if c > 0 => CurveKind::Quadratic,
            (s, _) if s > 0 => CurveKind::Linear,
            _ => CurveKind::Flat,
        }
    }

    /// Marginal price of the unit issued at `supply` (scaled by PRICE_SCALE)
    pub fn spot_price(&self, supply: u64) -> Result<u128> {
        let s = supply as u128;
        let linear = (self.slope as u128)
            .checked_mul(s)
            .ok_or(CurveError::Overflow)?;
        let quadratic = (self.curvature as u128)
            .checked_mul(s)
            .and_then(|v| v.checked_mul(s))
            .ok_or(CurveError::Overflow)?;

        (self.base_price as u128)
            .checked_add(linear)
            .and_then(|v| v.checked_add(quadratic))
            .ok_or_else(|| error!(CurveError::Overflow))
    }

    /// Cost of issuing `amount` units starting at `supply`, rounded up
    pub fn buy_cost(&self, supply: u64, amount: u64) -> Result<u64> {
        let end = supply.checked_add(amount).ok_or(CurveError::Overflow)?;
        let raw = self.price_sum(supply, end)?;
        to_units(ceil_div(raw, PRICE_SCALE))
    }

    /// Proceeds of redeeming `amount` units from `supply`, rounded down
    pub fn sell_proceeds(&self, supply: u64, amount: u64) -> Result<u64> {
        require!(amount <= supply, CurveError::InsufficientSupply);
        let raw = self.price_sum(supply - amount, supply)?;
        to_units(raw / PRICE_SCALE)
    }

    /// Σ price(i) for i in [from, to), still scaled by PRICE_SCALE
    fn price_sum(&self, from: u64, to: u64) -> Result<u128> {
        let (from, to) = (from as u128, to as u128);
        let count = to - from;

        let mut total = (self.base_price as u128)
            .checked_mul(count)
            .ok_or(CurveError::Overflow)?;

        if self.slope > 0 {
            let span = sum_of_indices(to)?
                .checked_sub(sum_of_indices(from)?)
                .ok_or(CurveError::Overflow)?;
            let term = (self.slope as u128)
                .checked_mul(span)
                .ok_or(CurveError::Overflow)?;
            total = total.checked_add(term).ok_or(CurveError::Overflow)?;
        }

        if self.curvature > 0 {
            let span = sum_of_squares(to)?
                .checked_sub(sum_of_squares(from)?)
                .ok_or(CurveError::Overflow)?;
            let term = (self.curvature as u128)
                .checked_mul(span)
                .ok_or(CurveError::Overflow)?;
            total = total.checked_add(term).ok_or(CurveError::Overflow)?;
        }

        Ok(total)
    }
}

/// Cost of `amount` units at a flat scaled price, rounded up
pub fn fixed_cost(price: u64, amount: u64) -> Result<u64> {
    let raw = (price as u128)
        .checked_mul(amount as u128)
        .ok_or(CurveError::Overflow)?;
    to_units(ceil_div(raw, PRICE_SCALE))
}

/// Protocol fee on `amount`, rounded up
pub fn fee_on(amount: u64, fee_bps: u16) -> Result<u64> {
    let raw = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(CurveError::Overflow)?;
    to_units(ceil_div(raw, BPS_DENOMINATOR))
}

/// Σ i for i < k
fn sum_of_indices(k: u128) -> Result<u128> {
    if k == 0 {
        return Ok(0);
    }
    k.checked_mul(k - 1)
        .map(|v| v / 2)
        .ok_or_else(|| error!(CurveError::Overflow))
}

/// Σ i² for i < k
fn sum_of_squares(k: u128) -> Result<u128> {
    if k == 0 {
        return Ok(0);
    }
    (k - 1)
        .checked_mul(k)
        .and_then(|v| v.checked_mul(2 * k - 1))
        .map(|v| v / 6)
        .ok_or_else(|| error!(CurveError::Overflow))
}

fn ceil_div(value: u128, divisor: u128) -> u128 {
    value / divisor + u128::from(value % divisor != 0)
}

fn to_units(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(CurveError::Overflow))
}

// ============================================================================
// TESTS
// ============================================================================
