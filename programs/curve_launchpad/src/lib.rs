//! # Curve Launchpad
//!
//! Token issuance and exchange on Solana, priced by per-listing bonding
//! curves.
//!
//! ## Overview
//!
//! A listing manager lists a token with its own curve, supply cap and
//! per-transaction limit. Anyone can then buy newly minted tokens against
//! the curve, paying in the protocol's payment token, and sell them back
//! for a share of the listing's reserves.
//!
//! ## Around the core exchange
//! - Fixed-price private sale windows with an explicit participant list
//! - Optional per-listing buyer whitelists
//! - Best-effort referral crediting
//! - Capability-based administration with protocol and listing pauses
//! - Reentrancy lock and a per-trader one-trade-per-slot guard
//!

use anchor_lang::prelude::*;

pub mod constants;
pub mod curve;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod instructions;
pub mod state;

pub use curve::*;
pub use instructions::*;

use crate::engine::TradeQuote;
use crate::state::{Capability, NonParticipantPolicy};

// Replace with your deployed program ID
declare_id!("4WeNzQU5EmoUVF8B91pa61exPcY6Tk12743A8JjjUkWh");

/// Main launchpad program
#[program]
pub mod curve_launchpad {
    use super::*;

    /// Initialize the protocol with global configuration
    pub fn initialize(
        ctx: Context<Initialize>,
        protocol_fee_bps: u16,
        fee_recipient: Pubkey,
    ) -> Result<()> {
        ctx.accounts.initialize(protocol_fee_bps, fee_recipient, &ctx.bumps)
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Pause or resume all trading
    pub fn set_paused(ctx: Context<ProtocolAdmin>, paused: bool) -> Result<()> {
        ctx.accounts.set_paused(paused)
    }

    /// Change the protocol fee and its recipient
    pub fn set_protocol_fee(
        ctx: Context<ProtocolAdmin>,
        protocol_fee_bps: u16,
        fee_recipient: Pubkey,
    ) -> Result<()> {
        ctx.accounts.set_protocol_fee(protocol_fee_bps, fee_recipient)
    }

    pub fn grant_capabilities(
        ctx: Context<GrantCapabilities>,
        member: Pubkey,
        capabilities: Vec<Capability>,
    ) -> Result<()> {
        ctx.accounts
            .grant_capabilities(member, capabilities, ctx.bumps.access)
    }

    pub fn revoke_capabilities(
        ctx: Context<RevokeCapabilities>,
        member: Pubkey,
        capabilities: Vec<Capability>,
    ) -> Result<()> {
        ctx.accounts.revoke_capabilities(member, capabilities)
    }

    /// Pull payment tokens out of a vault while trading is paused
    pub fn recover_funds(ctx: Context<RecoverFunds>, amount: u64) -> Result<()> {
        ctx.accounts.recover_funds(amount)
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    /// List a new token with its own curve
    pub fn list_token(ctx: Context<ListToken>, params: ListTokenParams) -> Result<()> {
        ctx.accounts.list_token(params, &ctx.bumps)
    }

    pub fn set_listing_active(ctx: Context<ListingAdmin>, active: bool) -> Result<()> {
        ctx.accounts.set_listing_active(active)
    }

    pub fn set_listing_paused(ctx: Context<ListingAdmin>, paused: bool) -> Result<()> {
        ctx.accounts.set_listing_paused(paused)
    }

    pub fn set_whitelist_enabled(ctx: Context<ListingAdmin>, enabled: bool) -> Result<()> {
        ctx.accounts.set_whitelist_enabled(enabled)
    }

    pub fn set_whitelist_status(
        ctx: Context<SetWhitelistStatus>,
        account: Pubkey,
        allowed: bool,
    ) -> Result<()> {
        ctx.accounts
            .set_whitelist_status(account, allowed, ctx.bumps.entry)
    }

    // =========================================================================
    // PRIVATE SALES
    // =========================================================================

    /// Schedule a fixed-price sale window
    pub fn create_private_sale(
        ctx: Context<ListingAdmin>,
        start_time: i64,
        end_time: i64,
        fixed_price: u64,
        policy: NonParticipantPolicy,
    ) -> Result<()> {
        ctx.accounts
            .create_private_sale(start_time, end_time, fixed_price, policy)
    }

    pub fn add_sale_participant(
        ctx: Context<AddSaleParticipant>,
        participant: Pubkey,
    ) -> Result<()> {
        ctx.accounts
            .add_sale_participant(participant, ctx.bumps.membership)
    }

    /// Close the current sale window early
    pub fn end_private_sale(ctx: Context<ListingAdmin>) -> Result<()> {
        ctx.accounts.end_private_sale()
    }

    // =========================================================================
    // TRADING
    // =========================================================================

    pub fn register_referrer(ctx: Context<RegisterReferrer>) -> Result<()> {
        ctx.accounts.register_referrer(ctx.bumps.referral)
    }

    /// Buy tokens (payment -> listed token)
    pub fn buy(
        ctx: Context<Buy>,
        amount: u64,
        max_cost: u64,
        referrer: Option<Pubkey>,
    ) -> Result<TradeQuote> {
        ctx.accounts
            .buy(amount, max_cost, referrer, ctx.bumps.trader_guard)
    }

    /// Sell tokens (listed token -> payment)
    pub fn sell(ctx: Context<Sell>, amount: u64, min_proceeds: u64) -> Result<TradeQuote> {
        ctx.accounts
            .sell(amount, min_proceeds, ctx.bumps.trader_guard)
    }

    pub fn preview_buy(
        ctx: Context<PreviewBuy>,
        amount: u64,
        buyer: Pubkey,
    ) -> Result<TradeQuote> {
        ctx.accounts.preview_buy(amount, buyer)
    }

    pub fn preview_sell(ctx: Context<PreviewSell>, amount: u64) -> Result<TradeQuote> {
        ctx.accounts.preview_sell(amount)
    }
}
