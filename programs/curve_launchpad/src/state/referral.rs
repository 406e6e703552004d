//! Referral bookkeeping

use anchor_lang::prelude::*;

/// Running totals for buys that named this referrer
///
/// Seeds: ["referral", referrer]
#[account]
#[derive(InitSpace)]
pub struct ReferralRecord {
    pub referrer: Pubkey,
    pub referred_trades: u64,
    /// Payment tokens spent by referred buyers, fees excluded
    pub referred_volume: u64,
    pub bump: u8,
}

impl ReferralRecord {
    pub const SEED: &'static [u8] = b"referral";
}
