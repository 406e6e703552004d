//! Trade Previews
//!
//! Read-only quotes. The result is returned through the instruction's return
//! data so clients can simulate before sending a buy or sell.

use anchor_lang::prelude::*;

use crate::engine::{quote_buy, quote_sell, TradeQuote};
use crate::state::{Config, SaleParticipant, TokenListing};

#[derive(Accounts)]
#[instruction(amount: u64, buyer: Pubkey)]
pub struct PreviewBuy<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Account<'info, TokenListing>,

    /// CHECK: membership address of `buyer` for the current sale round,
    /// read through `SaleParticipant::resolve`
    #[account(
        seeds = [
            SaleParticipant::SEED,
            listing.mint.as_ref(),
            listing.private_sale.round.to_le_bytes().as_ref(),
            buyer.as_ref(),
        ],
        bump,
    )]
    pub membership: UncheckedAccount<'info>,
}

impl<'info> PreviewBuy<'info> {
    /// Cost of buying `amount` units as `buyer`, fee included
    pub fn preview_buy(&self, amount: u64, buyer: Pubkey) -> Result<TradeQuote> {
        let now = Clock::get()?.unix_timestamp;
        let is_participant = SaleParticipant::resolve(
            &self.membership,
            &self.listing.mint,
            self.listing.private_sale.round,
            &buyer,
        )?;
        quote_buy(&self.config, &self.listing, is_participant, now, amount)
    }
}

#[derive(Accounts)]
pub struct PreviewSell<'info> {
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Account<'info, TokenListing>,
}

impl<'info> PreviewSell<'info> {
    /// Proceeds of selling `amount` units, fee deducted
    pub fn preview_sell(&self, amount: u64) -> Result<TradeQuote> {
        quote_sell(&self.config, &self.listing, amount)
    }
}
