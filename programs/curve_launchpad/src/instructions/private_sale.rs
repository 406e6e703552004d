//! Private Sale Controller
//!
//! Operators schedule a fixed-price window, admit participants, and may end
//! the window early. Pricing itself happens in the exchange engine.

use anchor_lang::prelude::*;

use crate::errors::ExchangeError;
use crate::guard::require_capability;
use crate::instructions::ListingAdmin;
use crate::state::{
    AccessGrant, Capability, Config, NonParticipantPolicy, SaleParticipant, TokenListing,
};

/// Event emitted when a private sale round is scheduled
#[event]
pub struct PrivateSaleCreated {
    pub mint: Pubkey,
    pub round: u32,
    pub start_time: i64,
    pub end_time: i64,
    pub fixed_price: u64,
    pub policy: NonParticipantPolicy,
}

/// Event emitted when a participant is admitted
#[event]
pub struct SaleParticipantAdded {
    pub mint: Pubkey,
    pub round: u32,
    pub participant: Pubkey,
}

/// Event emitted when a sale is ended by an operator
#[event]
pub struct PrivateSaleEnded {
    pub mint: Pubkey,
    pub round: u32,
    pub ended_at: i64,
    pub participants: u32,
}

impl<'info> ListingAdmin<'info> {
    pub fn create_private_sale(
        &mut self,
        start_time: i64,
        end_time: i64,
        fixed_price: u64,
        policy: NonParticipantPolicy,
    ) -> Result<()> {
        self.authorize(Capability::SaleOperator)?;
        let now = Clock::get()?.unix_timestamp;

        let round = self
            .listing
            .private_sale
            .schedule(now, start_time, end_time, fixed_price, policy)?;

        msg!(
            "Private sale round {} for {}: [{}, {}) at {}",
            round,
            self.listing.mint,
            start_time,
            end_time,
            fixed_price
        );
        emit!(PrivateSaleCreated {
            mint: self.listing.mint,
            round,
            start_time,
            end_time,
            fixed_price,
            policy,
        });
        Ok(())
    }

    pub fn end_private_sale(&mut self) -> Result<()> {
        self.authorize(Capability::SaleOperator)?;
        let now = Clock::get()?.unix_timestamp;

        self.listing.private_sale.end()?;

        emit!(PrivateSaleEnded {
            mint: self.listing.mint,
            round: self.listing.private_sale.round,
            ended_at: now,
            participants: self.listing.private_sale.participant_count,
        });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(participant: Pubkey)]
pub struct AddSaleParticipant<'info> {
    #[account(mut)]
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

    /// Membership for the current round; creation fails for duplicates
    #[account(
        init,
        payer = authority,
        space = 8 + SaleParticipant::INIT_SPACE,
        seeds = [
            SaleParticipant::SEED,
            listing.mint.as_ref(),
            listing.private_sale.round.to_le_bytes().as_ref(),
            participant.as_ref(),
        ],
        bump,
    )]
    pub membership: Account<'info, SaleParticipant>,

    pub system_program: Program<'info, System>,
}

impl<'info> AddSaleParticipant<'info> {
    pub fn add_sale_participant(&mut self, participant: Pubkey, bump: u8) -> Result<()> {
        require_capability(
            &self.config,
            &self.authority.key(),
            self.access.as_deref(),
            Capability::SaleOperator,
        )?;
        require!(participant != Pubkey::default(), ExchangeError::InvalidAddress);

        let now = Clock::get()?.unix_timestamp;
        let round = self.listing.private_sale.admit(now)?;

        self.membership.set_inner(SaleParticipant {
            mint: self.listing.mint,
            round,
            participant,
            bump,
        });

        emit!(SaleParticipantAdded {
            mint: self.listing.mint,
            round,
            participant,
        });
        Ok(())
    }
}
