//! Referral Registration
//!
//! A referrer creates its record once; buys that name the referrer then
//! credit it on a best-effort basis.

use anchor_lang::prelude::*;

use crate::state::ReferralRecord;

/// Event emitted when a referrer registers
#[event]
pub struct ReferrerRegistered {
    pub referrer: Pubkey,
}

/// Event emitted when a buy credits a referrer
#[event]
pub struct ReferralCredited {
    pub referrer: Pubkey,
    pub buyer: Pubkey,
    pub mint: Pubkey,
    pub volume: u64,
}

#[derive(Accounts)]
pub struct RegisterReferrer<'info> {
    #[account(mut)]
    pub referrer: Signer<'info>,

    #[account(
        init,
        payer = referrer,
        space = 8 + ReferralRecord::INIT_SPACE,
        seeds = [ReferralRecord::SEED, referrer.key().as_ref()],
        bump,
    )]
    pub referral: Account<'info, ReferralRecord>,

    pub system_program: Program<'info, System>,
}

impl<'info> RegisterReferrer<'info> {
    pub fn register_referrer(&mut self, bump: u8) -> Result<()> {
        self.referral.set_inner(ReferralRecord {
            referrer: self.referrer.key(),
            referred_trades: 0,
            referred_volume: 0,
            bump,
        });

        emit!(ReferrerRegistered {
            referrer: self.referrer.key(),
        });
        Ok(())
    }
}
