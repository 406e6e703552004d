//! Capability grants for the admin surface
//!
//! The config admin holds every capability. Anyone else needs an
//! `AccessGrant` with the matching bit set.

use anchor_lang::prelude::*;

/// Admin capabilities, one bit each
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Capability {
    /// Create listings and toggle their eligibility
    ListingManager,
    /// Run private sales and admit participants
    SaleOperator,
    /// Maintain buyer whitelists
    WhitelistManager,
    /// Pause and resume trading
    Pauser,
    /// Fee configuration and emergency fund recovery
    Treasurer,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::ListingManager,
        Capability::SaleOperator,
        Capability::WhitelistManager,
        Capability::Pauser,
        Capability::Treasurer,
    ];

    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn mask(capabilities: &[Capability]) -> u8 {
        capabilities.iter().fold(0, |acc, c| acc | c.bit())
    }
}

/// Capabilities held by one member
///
/// Seeds: ["access", member]
#[account]
#[derive(InitSpace)]
pub struct AccessGrant {
    pub member: Pubkey,
    pub capabilities: u8,
    pub bump: u8,
}

impl AccessGrant {
    pub const SEED: &'static [u8] = b"access";

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities & capability.bit() != 0
    }
}
