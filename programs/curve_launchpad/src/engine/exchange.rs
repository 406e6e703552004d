//! Buy and sell orchestration
//!
//! Everything here is pure state transition over plain account structs: no
//! CPIs and no sysvars. The instruction handlers call `begin_*` to pass the
//! gates and take the lock, feed in the clock and slot to `execute_*`, and
//! only then perform token interactions with the returned receipt.

use anchor_lang::prelude::*;

use crate::curve::{fee_on, fixed_cost};
use crate::errors::ExchangeError;
use crate::guard::{check_trading_gates, check_whitelist};
use crate::state::{Config, PriceSource, TokenListing, TraderGuard, WhitelistEntry};

/// Price of a prospective trade
///
/// For buys `net = gross + fee` is what the buyer pays. For sells
/// `net = gross - fee` is what the seller receives.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeQuote {
    pub amount: u64,
    /// Curve or fixed-price value of `amount` units
    pub gross: u64,
    /// Protocol fee
    pub fee: u64,
    pub net: u64,
    /// Whether the private sale price applied
    pub private_sale: bool,
}

/// Clock inputs for one instruction
#[derive(Clone, Copy, Debug)]
pub struct ExecutionContext {
    pub trader: Pubkey,
    pub now: i64,
    pub slot: u64,
}

/// Outcome of a committed trade, consumed by the interaction phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradeReceipt {
    pub quote: TradeQuote,
    pub old_price: u128,
    pub new_price: u128,
    pub supply_after: u64,
}

fn check_amount(listing: &TokenListing, amount: u64) -> Result<()> {
    require!(amount > 0, ExchangeError::ZeroAmount);
    require!(amount <= listing.max_per_tx, ExchangeError::AmountExceedsTxCap);
    Ok(())
}

/// Pass the buy gates, then take the reentrancy lock.
///
/// A rejected caller never touches `config.locked`.
pub fn begin_buy(
    config: &mut Config,
    listing: &TokenListing,
    buyer: &Pubkey,
    whitelist: Option<&WhitelistEntry>,
) -> Result<()> {
    check_trading_gates(config, listing)?;
    check_whitelist(listing, buyer, whitelist)?;
    config.enter()
}

/// Pass the sell gates, then take the reentrancy lock.
pub fn begin_sell(config: &mut Config, listing: &TokenListing) -> Result<()> {
    check_trading_gates(config, listing)?;
    config.enter()
}

/// Quote a buy of `amount` units.
///
/// `is_participant` says whether the buyer holds a membership for the
/// listing's current sale round.
pub fn quote_buy(
    config: &Config,
    listing: &TokenListing,
    is_participant: bool,
    now: i64,
    amount: u64,
) -> Result<TradeQuote> {
    check_amount(listing, amount)?;
    require!(
        amount <= listing.remaining_capacity(),
        ExchangeError::SupplyCapExceeded
    );

    let source = listing.private_sale.price_source(now, is_participant)?;

    let gross = match source {
        PriceSource::Curve => listing.curve.buy_cost(listing.issued_supply, amount)?,
        PriceSource::Fixed(price) => fixed_cost(price, amount)?,
    };
    let fee = fee_on(gross, config.protocol_fee_bps)?;
    let net = gross.checked_add(fee).ok_or(ExchangeError::MathOverflow)?;

    Ok(TradeQuote {
        amount,
        gross,
        fee,
        net,
        private_sale: matches!(source, PriceSource::Fixed(_)),
    })
}

/// Quote a sell of `amount` units. Redemption is always priced on the curve.
pub fn quote_sell(config: &Config, listing: &TokenListing, amount: u64) -> Result<TradeQuote> {
    check_amount(listing, amount)?;
    require!(
        amount <= listing.issued_supply,
        ExchangeError::InsufficientSupply
    );

    let gross = listing.curve.sell_proceeds(listing.issued_supply, amount)?;
    let fee = fee_on(gross, config.protocol_fee_bps)?;
    let net = gross.checked_sub(fee).ok_or(ExchangeError::MathOverflow)?;

    Ok(TradeQuote {
        amount,
        gross,
        fee,
        net,
        private_sale: false,
    })
}

/// Validate and commit a buy.
///
/// Expects `begin_buy` to have passed. On error nothing in `listing` or
/// `guard` has changed.
pub fn execute_buy(
    config: &Config,
    listing: &mut TokenListing,
    guard: &mut TraderGuard,
    ctx: &ExecutionContext,
    amount: u64,
    max_cost: u64,
    is_participant: bool,
) -> Result<TradeReceipt> {
    guard.check(ctx.slot)?;

    let quote = quote_buy(config, listing, is_participant, ctx.now, amount)?;
    require!(quote.net <= max_cost, ExchangeError::SlippageExceeded);

    let old_price = listing.curve.spot_price(listing.issued_supply)?;
    let new_price = listing.curve.spot_price(listing.issued_supply + amount)?;
    let reserves = listing
        .reserves
        .checked_add(quote.gross)
        .ok_or(ExchangeError::MathOverflow)?;

    let supply_after = listing.reserve_supply(amount)?;
    listing.reserves = reserves;
    listing.last_price = new_price;
    guard.record(ctx.slot);

    Ok(TradeReceipt {
        quote,
        old_price,
        new_price,
        supply_after,
    })
}

/// Validate and commit a sell.
///
/// Expects `begin_sell` to have passed. On error nothing in `listing` or
/// `guard` has changed.
pub fn execute_sell(
    config: &Config,
    listing: &mut TokenListing,
    guard: &mut TraderGuard,
    ctx: &ExecutionContext,
    amount: u64,
    min_proceeds: u64,
) -> Result<TradeReceipt> {
    guard.check(ctx.slot)?;

    let quote = quote_sell(config, listing, amount)?;
    require!(quote.net >= min_proceeds, ExchangeError::SlippageExceeded);

    let reserves = listing
        .reserves
        .checked_sub(quote.gross)
        .ok_or(ExchangeError::InsufficientReserve)?;
    let old_price = listing.curve.spot_price(listing.issued_supply)?;
    let new_price = listing.curve.spot_price(listing.issued_supply - amount)?;

    let supply_after = listing.release_supply(amount)?;
    listing.reserves = reserves;
    listing.last_price = new_price;
    guard.record(ctx.slot);

    Ok(TradeReceipt {
        quote,
        old_price,
        new_price,
        supply_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::listing::tests::listing;
    use crate::state::NonParticipantPolicy;

    const T0: i64 = 1_700_000_000;

    fn config(fee_bps: u16) -> Config {
        Config {
            admin: Pubkey::new_unique(),
            payment_mint: Pubkey::new_unique(),
            fee_recipient: Pubkey::new_unique(),
            protocol_fee_bps: fee_bps,
            listing_count: 1,
            paused: false,
            locked: false,
            bump: 255,
        }
    }

    fn guard_for(authority: Pubkey) -> TraderGuard {
        TraderGuard {
            authority,
            last_slot: 0,
            trade_count: 0,
            bump: 255,
        }
    }

    fn ctx(trader: Pubkey, slot: u64) -> ExecutionContext {
        ExecutionContext {
            trader,
            now: T0,
            slot,
        }
    }

    #[test]
    fn test_buy_commits_supply_reserves_and_price() {
        let cfg = config(100);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        let receipt =
            execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 5), 100, u64::MAX, false).unwrap();

        assert_eq!(receipt.quote.gross, 150);
        assert_eq!(receipt.quote.fee, 2);
        assert_eq!(receipt.quote.net, 152);
        assert!(!receipt.quote.private_sale);
        assert_eq!(receipt.supply_after, 100);
        assert!(receipt.new_price > receipt.old_price);
        assert_eq!(l.issued_supply, 100);
        assert_eq!(l.reserves, 150);
        assert_eq!(l.last_price, receipt.new_price);
        assert_eq!(guard.last_slot, 5);
    }

    #[test]
    fn test_preview_matches_execution() {
        let cfg = config(250);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        let preview = quote_buy(&cfg, &l, false, T0, 777).unwrap();
        let receipt =
            execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 1), 777, preview.net, false)
                .unwrap();
        assert_eq!(receipt.quote, preview);

        let preview = quote_sell(&cfg, &l, 300).unwrap();
        let receipt =
            execute_sell(&cfg, &mut l, &mut guard, &ctx(trader, 2), 300, preview.net).unwrap();
        assert_eq!(receipt.quote, preview);
    }

    #[test]
    fn test_slippage_aborts_without_changes() {
        let cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        let err = execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 1), 100, 149, false)
            .unwrap_err();
        assert_eq!(err, ExchangeError::SlippageExceeded.into());
        assert_eq!(l.issued_supply, 0);
        assert_eq!(l.reserves, 0);
        assert_eq!(guard.trade_count, 0);

        execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 1), 100, 150, false).unwrap();

        let err = execute_sell(&cfg, &mut l, &mut guard, &ctx(trader, 2), 100, 150).unwrap_err();
        assert_eq!(err, ExchangeError::SlippageExceeded.into());
        assert_eq!(l.issued_supply, 100);
        assert_eq!(l.reserves, 150);
        assert_eq!(guard.trade_count, 1);
    }

    #[test]
    fn test_amount_bounds() {
        let cfg = config(0);
        let mut l = listing(1_000, 10);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        let zero = execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 1), 0, u64::MAX, false);
        assert_eq!(zero.unwrap_err(), ExchangeError::ZeroAmount.into());

        let big = execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 1), 11, u64::MAX, false);
        assert_eq!(big.unwrap_err(), ExchangeError::AmountExceedsTxCap.into());

        let sell = execute_sell(&cfg, &mut l, &mut guard, &ctx(trader, 1), 1, 0);
        assert_eq!(sell.unwrap_err(), ExchangeError::InsufficientSupply.into());
    }

    #[test]
    fn test_cap_rejects_first_overflowing_buy() {
        let cfg = config(0);
        let mut l = listing(250, 100);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        for slot in 1..=2 {
            execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, slot), 100, u64::MAX, false)
                .unwrap();
        }
        let err = execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 3), 51, u64::MAX, false)
            .unwrap_err();
        assert_eq!(err, ExchangeError::SupplyCapExceeded.into());
        assert_eq!(l.issued_supply, 200);

        execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 3), 50, u64::MAX, false).unwrap();
        assert_eq!(l.issued_supply, l.issuance_cap);
    }

    #[test]
    fn test_flash_loan_guard_blocks_same_slot() {
        let cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 9), 100, u64::MAX, false).unwrap();

        // Valid parameters do not help within the same slot
        let sell = execute_sell(&cfg, &mut l, &mut guard, &ctx(trader, 9), 100, 0);
        assert_eq!(sell.unwrap_err(), ExchangeError::FlashLoanGuard.into());
        let buy = execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 9), 1, u64::MAX, false);
        assert_eq!(buy.unwrap_err(), ExchangeError::FlashLoanGuard.into());

        execute_sell(&cfg, &mut l, &mut guard, &ctx(trader, 10), 100, 0).unwrap();
        assert_eq!(l.issued_supply, 0);
    }

    #[test]
    fn test_flash_loan_guard_precedes_amount_checks() {
        let cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);
        let at = ctx(trader, 9);

        execute_buy(&cfg, &mut l, &mut guard, &at, 100, u64::MAX, false).unwrap();

        for amount in [0, 10_001] {
            let buy = execute_buy(&cfg, &mut l, &mut guard, &at, amount, u64::MAX, false);
            assert_eq!(buy.unwrap_err(), ExchangeError::FlashLoanGuard.into());
            let sell = execute_sell(&cfg, &mut l, &mut guard, &at, amount, 0);
            assert_eq!(sell.unwrap_err(), ExchangeError::FlashLoanGuard.into());
        }
        assert_eq!(l.issued_supply, 100);
        assert_eq!(guard.trade_count, 1);
    }

    #[test]
    fn test_failed_trade_does_not_consume_slot() {
        let cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        assert!(execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 4), 100, 1, false).is_err());
        execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 4), 100, u64::MAX, false).unwrap();
    }

    #[test]
    fn test_sell_requires_reserves() {
        let cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();
        let mut guard = guard_for(trader);

        execute_buy(&cfg, &mut l, &mut guard, &ctx(trader, 1), 100, u64::MAX, false).unwrap();
        l.reserves = 10;

        let err = execute_sell(&cfg, &mut l, &mut guard, &ctx(trader, 2), 100, 0).unwrap_err();
        assert_eq!(err, ExchangeError::InsufficientReserve.into());
        assert_eq!(l.issued_supply, 100);
    }

    #[test]
    fn test_private_sale_pricing_and_fallback() {
        let cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let fixed = crate::constants::PRICE_SCALE as u64 / 2;

        l.private_sale
            .schedule(T0 - 100, T0 - 10, T0 + 3_600, fixed, NonParticipantPolicy::CurvePricing)
            .unwrap();

        let mut alice_guard = guard_for(alice);
        let receipt =
            execute_buy(&cfg, &mut l, &mut alice_guard, &ctx(alice, 1), 100, u64::MAX, true)
                .unwrap();
        assert!(receipt.quote.private_sale);
        assert_eq!(receipt.quote.gross, 50);

        // Bob pays the curve at the supply Alice left behind
        let mut bob_guard = guard_for(bob);
        let expected = l.curve.buy_cost(100, 100).unwrap();
        let receipt =
            execute_buy(&cfg, &mut l, &mut bob_guard, &ctx(bob, 1), 100, u64::MAX, false)
                .unwrap();
        assert!(!receipt.quote.private_sale);
        assert_eq!(receipt.quote.gross, expected);

        // Members are quoted the fixed price, never the curve
        let curve_cost = l.curve.buy_cost(l.issued_supply, 100).unwrap();
        let member = quote_buy(&cfg, &l, true, T0, 100).unwrap();
        assert_eq!(member.gross, fixed_cost(fixed, 100).unwrap());
        assert_ne!(member.gross, curve_cost);
    }

    #[test]
    fn test_gates_run_before_lock() {
        let mut cfg = config(0);
        let mut l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();

        // A paused protocol reports the pause, even with a stuck lock
        cfg.paused = true;
        cfg.locked = true;
        let err = begin_buy(&mut cfg, &l, &trader, None).unwrap_err();
        assert_eq!(err, ExchangeError::ProtocolPaused.into());
        let err = begin_sell(&mut cfg, &l).unwrap_err();
        assert_eq!(err, ExchangeError::ProtocolPaused.into());
        assert!(cfg.locked);

        cfg.paused = false;
        cfg.locked = false;
        l.whitelist_enabled = true;
        let err = begin_buy(&mut cfg, &l, &trader, None).unwrap_err();
        assert_eq!(err, ExchangeError::NotWhitelisted.into());
        assert!(!cfg.locked);

        l.whitelist_enabled = false;
        l.paused = true;
        let err = begin_sell(&mut cfg, &l).unwrap_err();
        assert_eq!(err, ExchangeError::TokenPaused.into());
        assert!(!cfg.locked);
    }

    #[test]
    fn test_begin_takes_lock_once() {
        let mut cfg = config(0);
        let l = listing(1_000_000, 10_000);
        let trader = Pubkey::new_unique();

        begin_buy(&mut cfg, &l, &trader, None).unwrap();
        assert!(cfg.locked);
        let err = begin_sell(&mut cfg, &l).unwrap_err();
        assert_eq!(err, ExchangeError::ReentrantCall.into());

        cfg.leave();
        begin_sell(&mut cfg, &l).unwrap();
        assert!(cfg.locked);
    }
}
