//! Protocol Initialization
//!
//! Creates the singleton `Config` once at deployment. The signer becomes the
//! admin, who holds every capability until grants are handed out.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::constants::MAX_PROTOCOL_FEE_BPS;
use crate::errors::ExchangeError;
use crate::state::Config;

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer, recorded as the protocol admin
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Launchpad configuration (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// Mint every listing is priced and paid in
    pub payment_mint: InterfaceAccount<'info, Mint>,

    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(
        &mut self,
        protocol_fee_bps: u16,
        fee_recipient: Pubkey,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        require!(
            protocol_fee_bps <= MAX_PROTOCOL_FEE_BPS,
            ExchangeError::FeeTooHigh
        );
        require!(
            fee_recipient != Pubkey::default(),
            ExchangeError::InvalidAddress
        );

        self.config.set_inner(Config {
            admin: self.admin.key(),
            payment_mint: self.payment_mint.key(),
            fee_recipient,
            protocol_fee_bps,
            listing_count: 0,
            paused: false,
            locked: false,
            bump: bumps.config,
        });

        msg!(
            "Launchpad config: admin {}, pays in {}, fee {} bps to {}",
            self.admin.key(),
            self.payment_mint.key(),
            protocol_fee_bps,
            fee_recipient
        );

        Ok(())
    }
}
