//! Per-account flash-loan guard state

use anchor_lang::prelude::*;

/// Last execution step in which an account completed a trade
///
/// Seeds: ["trader", authority]
#[account]
#[derive(InitSpace)]
pub struct TraderGuard {
    pub authority: Pubkey,

    /// Slot of the last completed buy or sell
    pub last_slot: u64,

    /// Completed trades; zero means `last_slot` carries no meaning yet
    pub trade_count: u64,

    pub bump: u8,
}

impl TraderGuard {
    pub const SEED: &'static [u8] = b"trader";
}
