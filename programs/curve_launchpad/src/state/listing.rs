//! Token Listing State
//!
//! Each listing is one token tradable against its own bonding curve. The
//! listing also carries the supply ledger: the count of units issued through
//! this program, independent of the mint's own total supply.

use anchor_lang::prelude::*;

use crate::curve::CurveParams;
use crate::errors::ExchangeError;
use crate::state::PrivateSaleWindow;

/// Listing account
///
/// Seeds: ["listing", id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct TokenListing {
    /// Unique listing identifier
    pub id: u64,

    /// Address that created the listing
    pub creator: Pubkey,

    /// Mint issued by this listing (mint authority is this PDA)
    pub mint: Pubkey,

    /// Whether the listing is eligible for trading
    pub active: bool,

    /// Per-listing trading pause
    pub paused: bool,

    /// Maximum units ever outstanding through the engine
    pub issuance_cap: u64,

    /// Maximum units per buy or sell
    pub max_per_tx: u64,

    /// Pricing curve coefficients
    pub curve: CurveParams,

    /// Units currently issued through the engine (the supply record)
    pub issued_supply: u64,

    /// Payment tokens backing the issued supply, held by the vault
    pub reserves: u64,

    /// Spot price after the last trade (scaled by PRICE_SCALE)
    pub last_price: u128,

    /// Whether buyers must hold a whitelist entry
    pub whitelist_enabled: bool,

    /// Fixed-price private sale override
    pub private_sale: PrivateSaleWindow,

    /// PDA bump seed
    pub bump: u8,
}

impl TokenListing {
    pub const SEED: &'static [u8] = b"listing";
    pub const MINT_SEED: &'static [u8] = b"mint";

    /// Units that can still be issued before the cap is reached
    pub fn remaining_capacity(&self) -> u64 {
        self.issuance_cap.saturating_sub(self.issued_supply)
    }

    /// Record `amount` newly issued units, returning the new supply.
    ///
    /// Fails without touching the record if the cap would be exceeded.
    pub fn reserve_supply(&mut self, amount: u64) -> Result<u64> {
        let next = self
            .issued_supply
            .checked_add(amount)
            .ok_or(ExchangeError::MathOverflow)?;
        require!(next <= self.issuance_cap, ExchangeError::SupplyCapExceeded);
        self.issued_supply = next;
        Ok(next)
    }

    /// Record `amount` redeemed units, returning the new supply.
    pub fn release_supply(&mut self, amount: u64) -> Result<u64> {
        let next = self
            .issued_supply
            .checked_sub(amount)
            .ok_or(ExchangeError::InsufficientSupply)?;
        self.issued_supply = next;
        Ok(next)
    }
}
