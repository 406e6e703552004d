//! Buyer whitelist entries

use anchor_lang::prelude::*;

/// Whitelist status of one account for one listing
///
/// Seeds: ["whitelist", mint, account]
#[account]
#[derive(InitSpace)]
pub struct WhitelistEntry {
    pub mint: Pubkey,
    pub account: Pubkey,
    pub allowed: bool,
    pub bump: u8,
}

impl WhitelistEntry {
    pub const SEED: &'static [u8] = b"whitelist";

    pub fn allows(&self, mint: &Pubkey, account: &Pubkey) -> bool {
        self.allowed && self.mint == *mint && self.account == *account
    }
}
