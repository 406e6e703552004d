//! Pause, listing, whitelist and capability gates

use anchor_lang::prelude::*;

use crate::errors::ExchangeError;
use crate::state::{AccessGrant, Capability, Config, TokenListing, WhitelistEntry};

/// Pause and listing gates shared by buys and sells
pub fn check_trading_gates(config: &Config, listing: &TokenListing) -> Result<()> {
    require!(!config.paused, ExchangeError::ProtocolPaused);
    require!(listing.active, ExchangeError::TokenNotListed);
    require!(!listing.paused, ExchangeError::TokenPaused);
    Ok(())
}

/// Whitelist gate, only consulted when the listing enables it
pub fn check_whitelist(
    listing: &TokenListing,
    buyer: &Pubkey,
    entry: Option<&WhitelistEntry>,
) -> Result<()> {
    if !listing.whitelist_enabled {
        return Ok(());
    }
    let allowed = entry.is_some_and(|e| e.allows(&listing.mint, buyer));
    require!(allowed, ExchangeError::NotWhitelisted);
    Ok(())
}

/// Require `caller` to hold `capability`, either as admin or via a grant
pub fn require_capability(
    config: &Config,
    caller: &Pubkey,
    grant: Option<&AccessGrant>,
    capability: Capability,
) -> Result<()> {
    if *caller == config.admin {
        return Ok(());
    }
    let granted = grant.is_some_and(|g| g.member == *caller && g.has(capability));
    require!(granted, ExchangeError::Unauthorized);
    Ok(())
}
