//! Buyer Whitelists
//!
//! When a listing enables its whitelist, only accounts with an allowed entry
//! can buy. Sells are never gated, so holders can always exit.

use anchor_lang::prelude::*;

use crate::errors::ExchangeError;
use crate::guard::require_capability;
use crate::instructions::ListingAdmin;
use crate::state::{AccessGrant, Capability, Config, TokenListing, WhitelistEntry};

/// Event emitted when a listing's whitelist is switched on or off
#[event]
pub struct WhitelistToggled {
    pub mint: Pubkey,
    pub enabled: bool,
}

/// Event emitted when an account is added to or removed from a whitelist
#[event]
pub struct WhitelistChanged {
    pub mint: Pubkey,
    pub account: Pubkey,
    pub allowed: bool,
}

impl<'info> ListingAdmin<'info> {
    pub fn set_whitelist_enabled(&mut self, enabled: bool) -> Result<()> {
        self.authorize(Capability::WhitelistManager)?;
        self.listing.whitelist_enabled = enabled;

        emit!(WhitelistToggled {
            mint: self.listing.mint,
            enabled,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct SetWhitelistStatus<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub access: Option<Account<'info, AccessGrant>>,

    #[account(
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Account<'info, TokenListing>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + WhitelistEntry::INIT_SPACE,
        seeds = [WhitelistEntry::SEED, listing.mint.as_ref(), account.as_ref()],
        bump,
    )]
    pub entry: Account<'info, WhitelistEntry>,

    pub system_program: Program<'info, System>,
}

impl<'info> SetWhitelistStatus<'info> {
    pub fn set_whitelist_status(&mut self, account: Pubkey, allowed: bool, bump: u8) -> Result<()> {
        require_capability(
            &self.config,
            &self.authority.key(),
            self.access.as_deref(),
            Capability::WhitelistManager,
        )?;
        require!(account != Pubkey::default(), ExchangeError::InvalidAddress);

        self.entry.set_inner(WhitelistEntry {
            mint: self.listing.mint,
            account,
            allowed,
            bump,
        });

        emit!(WhitelistChanged {
            mint: self.listing.mint,
            account,
            allowed,
        });
        Ok(())
    }
}
