//! Admin Surface
//!
//! Capability-gated configuration: pausing, fees, capability grants, listing
//! status and emergency recovery of vault funds. Every handler checks the
//! caller's capability before touching state.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::MAX_PROTOCOL_FEE_BPS;
use crate::errors::ExchangeError;
use crate::guard::require_capability;
use crate::state::{AccessGrant, Capability, Config, TokenListing};

/// Event emitted when trading is paused or resumed
#[event]
pub struct PauseChanged {
    /// `None` for the protocol-wide switch
    pub mint: Option<Pubkey>,
    pub paused: bool,
    pub authority: Pubkey,
}

/// Event emitted when the fee configuration changes
#[event]
pub struct FeeConfigChanged {
    pub protocol_fee_bps: u16,
    pub fee_recipient: Pubkey,
}

/// Event emitted when a member's capabilities change
#[event]
pub struct CapabilitiesChanged {
    pub member: Pubkey,
    pub capabilities: u8,
}

/// Event emitted when a listing is activated or deactivated
#[event]
pub struct ListingStatusChanged {
    pub mint: Pubkey,
    pub active: bool,
}

/// Event emitted on emergency recovery of vault funds
#[event]
pub struct FundsRecovered {
    pub mint: Pubkey,
    pub destination: Pubkey,
    pub amount: u64,
    pub reserves_after: u64,
}

// =============================================================================
// PROTOCOL-WIDE SETTINGS
// =============================================================================

#[derive(Accounts)]
pub struct ProtocolAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Capability grant of the authority, not needed for the admin
    pub access: Option<Account<'info, AccessGrant>>,
}

impl<'info> ProtocolAdmin<'info> {
    fn authorize(&self, capability: Capability) -> Result<()> {
        require_capability(
            &self.config,
            &self.authority.key(),
            self.access.as_deref(),
            capability,
        )
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.authorize(Capability::Pauser)?;
        self.config.paused = paused;

        msg!("Protocol paused: {}", paused);
        emit!(PauseChanged {
            mint: None,
            paused,
            authority: self.authority.key(),
        });
        Ok(())
    }

    pub fn set_protocol_fee(&mut self, protocol_fee_bps: u16, fee_recipient: Pubkey) -> Result<()> {
        self.authorize(Capability::Treasurer)?;
        require!(
            protocol_fee_bps <= MAX_PROTOCOL_FEE_BPS,
            ExchangeError::FeeTooHigh
        );
        require!(
            fee_recipient != Pubkey::default(),
            ExchangeError::InvalidAddress
        );

        self.config.protocol_fee_bps = protocol_fee_bps;
        self.config.fee_recipient = fee_recipient;

        emit!(FeeConfigChanged {
            protocol_fee_bps,
            fee_recipient,
        });
        Ok(())
    }
}

// =============================================================================
// CAPABILITY GRANTS (admin only)
// =============================================================================

#[derive(Accounts)]
#[instruction(member: Pubkey)]
pub struct GrantCapabilities<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        has_one = admin @ ExchangeError::Unauthorized,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + AccessGrant::INIT_SPACE,
        seeds = [AccessGrant::SEED, member.as_ref()],
        bump,
    )]
    pub access: Account<'info, AccessGrant>,

    pub system_program: Program<'info, System>,
}

impl<'info> GrantCapabilities<'info> {
    pub fn grant_capabilities(
        &mut self,
        member: Pubkey,
        capabilities: Vec<Capability>,
        bump: u8,
    ) -> Result<()> {
        require!(member != Pubkey::default(), ExchangeError::InvalidAddress);

        let access = &mut self.access;
        access.member = member;
        access.bump = bump;
        access.capabilities |= Capability::mask(&capabilities);

        msg!("Capabilities of {}: {:#07b}", member, access.capabilities);
        emit!(CapabilitiesChanged {
            member,
            capabilities: access.capabilities,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(member: Pubkey)]
pub struct RevokeCapabilities<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        has_one = admin @ ExchangeError::Unauthorized,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [AccessGrant::SEED, member.as_ref()],
        bump = access.bump,
    )]
    pub access: Account<'info, AccessGrant>,
}

impl<'info> RevokeCapabilities<'info> {
    pub fn revoke_capabilities(
        &mut self,
        member: Pubkey,
        capabilities: Vec<Capability>,
    ) -> Result<()> {
        let access = &mut self.access;
        access.capabilities &= !Capability::mask(&capabilities);

        msg!("Capabilities of {}: {:#07b}", member, access.capabilities);
        emit!(CapabilitiesChanged {
            member,
            capabilities: access.capabilities,
        });
        Ok(())
    }
}

// =============================================================================
// PER-LISTING SETTINGS
// =============================================================================

#[derive(Accounts)]
pub struct ListingAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub access: Option<Account<'info, AccessGrant>>,

    #[account(
        mut,
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Account<'info, TokenListing>,
}

impl<'info> ListingAdmin<'info> {
    pub(crate) fn authorize(&self, capability: Capability) -> Result<()> {
        require_capability(
            &self.config,
            &self.authority.key(),
            self.access.as_deref(),
            capability,
        )
    }

    pub fn set_listing_active(&mut self, active: bool) -> Result<()> {
        self.authorize(Capability::ListingManager)?;
        self.listing.active = active;

        emit!(ListingStatusChanged {
            mint: self.listing.mint,
            active,
        });
        Ok(())
    }

    pub fn set_listing_paused(&mut self, paused: bool) -> Result<()> {
        self.authorize(Capability::Pauser)?;
        self.listing.paused = paused;

        msg!("Listing {} paused: {}", self.listing.mint, paused);
        emit!(PauseChanged {
            mint: Some(self.listing.mint),
            paused,
            authority: self.authority.key(),
        });
        Ok(())
    }
}

// =============================================================================
// EMERGENCY RECOVERY
// =============================================================================

#[derive(Accounts)]
pub struct RecoverFunds<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    pub access: Option<Account<'info, AccessGrant>>,

    #[account(
        mut,
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Box<Account<'info, TokenListing>>,

    #[account(address = config.payment_mint)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Listing's payment vault
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = listing,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = payment_mint,
        token::token_program = token_program,
    )]
    pub destination: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> RecoverFunds<'info> {
    pub fn recover_funds(&mut self, amount: u64) -> Result<()> {
        require_capability(
            &self.config,
            &self.authority.key(),
            self.access.as_deref(),
            Capability::Treasurer,
        )?;
        require!(
            self.config.paused || self.listing.paused,
            ExchangeError::NotPaused
        );
        require!(amount > 0, ExchangeError::ZeroAmount);
        require!(amount <= self.vault.amount, ExchangeError::InsufficientReserve);

        self.listing.reserves = self.listing.reserves.saturating_sub(amount);

        let mint = self.listing.mint;
        let id = self.listing.id.to_le_bytes();
        let bump = [self.listing.bump];
        let listing_seeds: &[&[u8]] = &[TokenListing::SEED, &id, &bump];
        let signer_seeds = &[listing_seeds];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault.to_account_info(),
                    mint: self.payment_mint.to_account_info(),
                    to: self.destination.to_account_info(),
                    authority: self.listing.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
            self.payment_mint.decimals,
        )?;

        msg!("Recovered {} from listing {}", amount, mint);
        emit!(FundsRecovered {
            mint,
            destination: self.destination.key(),
            amount,
            reserves_after: self.listing.reserves,
        });
        Ok(())
    }
}
