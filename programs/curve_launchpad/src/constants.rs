//! Protocol-wide constants
//!
//! Fixed-point scales and the bounds enforced on admin-supplied
//! parameters.

/// Fixed-point scale for curve coefficients and private sale prices.
///
/// A coefficient of `PRICE_SCALE` equals one payment base unit per token
/// base unit.
pub const PRICE_SCALE: u128 = 1_000_000_000;

/// Basis point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Upper bound on the protocol fee (10%)
pub const MAX_PROTOCOL_FEE_BPS: u16 = 1_000;

/// Shortest private sale window (1 hour)
pub const MIN_SALE_DURATION: i64 = 60 * 60;

/// Longest private sale window (30 days)
pub const MAX_SALE_DURATION: i64 = 30 * 24 * 60 * 60;

/// Metaplex limits for listing metadata
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;

/// Largest supported mint decimals
pub const MAX_DECIMALS: u8 = 9;
