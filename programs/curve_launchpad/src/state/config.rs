//! Launchpad Configuration
//!
//! One account shared by every listing: who administers the protocol, what
//! buyers pay with, where fees go, and the protocol-wide trading flags.

use anchor_lang::prelude::*;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["launchpad_config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol administrator, implicitly holds every capability
    pub admin: Pubkey,

    /// Payment (quote) token mint used by every listing
    pub payment_mint: Pubkey,

    /// Wallet whose payment token account receives protocol fees
    pub fee_recipient: Pubkey,

    /// Protocol fee in basis points (100 = 1%)
    pub protocol_fee_bps: u16,

    /// Id the next listing receives
    pub listing_count: u64,

    /// Whether trading is paused for every listing
    pub paused: bool,

    /// In-flight marker for state-mutating trade instructions
    pub locked: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"launchpad_config";
}
