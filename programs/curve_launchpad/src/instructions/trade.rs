//! Token Trading
//!
//! Buys and sells against a listing's bonding curve. Each handler runs in
//! three phases:
//!
//! 1. Gates, then the reentrancy lock (`engine::begin_*`)
//! 2. Checks and effects in the pure engine (`engine::execute_*`)
//! 3. Persisting the reentrancy lock and updated state
//! 4. Token interactions: critical ones propagate errors, the referral
//!    credit is best-effort

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, mint_to, transfer_checked, Burn, Mint, MintTo, TokenAccount, TokenInterface,
        TransferChecked,
    },
};

use crate::engine::{
    begin_buy, begin_sell, best_effort, execute_buy, execute_sell, notify_referral,
    ExecutionContext, TradeQuote,
};
use crate::errors::ExchangeError;
use crate::instructions::ReferralCredited;
use crate::state::{
    Config, ReferralRecord, SaleParticipant, TokenListing, TraderGuard, WhitelistEntry,
};

/// Event emitted when tokens are bought
#[event]
pub struct TokensBought {
    pub buyer: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    /// Payment for the tokens, fee excluded
    pub cost: u64,
    pub fee: u64,
    pub old_price: u128,
    pub new_price: u128,
    pub supply_after: u64,
    pub private_sale: bool,
    pub slot: u64,
}

/// Event emitted when tokens are sold
#[event]
pub struct TokensSold {
    pub seller: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    /// Gross proceeds, fee included
    pub proceeds: u64,
    pub fee: u64,
    pub old_price: u128,
    pub new_price: u128,
    pub supply_after: u64,
    pub slot: u64,
}

/// Accounts for buying
#[derive(Accounts)]
pub struct Buy<'info> {
    /// Buyer
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// Protocol configuration, carries the reentrancy lock
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Listing being traded
    #[account(
        mut,
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Box<Account<'info, TokenListing>>,

    /// Listed token mint
    #[account(mut, address = listing.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Payment mint
    #[account(address = config.payment_mint)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Buyer's payment account
    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = buyer,
        token::token_program = token_program,
    )]
    pub buyer_payment: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Buyer's listed token account
    #[account(
        init_if_needed,
        payer = buyer,
        associated_token::mint = mint,
        associated_token::authority = buyer,
        associated_token::token_program = token_program,
    )]
    pub buyer_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Listing's payment vault
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = listing,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Fee recipient's payment account
    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = config.fee_recipient,
        token::token_program = token_program,
    )]
    pub fee_destination: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Flash-loan guard state of the buyer
    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + TraderGuard::INIT_SPACE,
        seeds = [TraderGuard::SEED, buyer.key().as_ref()],
        bump,
    )]
    pub trader_guard: Box<Account<'info, TraderGuard>>,

    /// CHECK: the buyer's membership address for the current sale round.
    /// Empty unless the buyer was admitted, see `SaleParticipant::resolve`.
    #[account(
        seeds = [
            SaleParticipant::SEED,
            listing.mint.as_ref(),
            listing.private_sale.round.to_le_bytes().as_ref(),
            buyer.key().as_ref(),
        ],
        bump,
    )]
    pub membership: UncheckedAccount<'info>,

    /// Whitelist entry, required when the listing's whitelist is enabled
    pub whitelist_entry: Option<Account<'info, WhitelistEntry>>,

    /// Referrer's record, credited best-effort
    #[account(mut)]
    pub referral: Option<Account<'info, ReferralRecord>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Buy<'info> {
    /// Buy `amount` listed tokens paying at most `max_cost` including fee
    pub fn buy(
        &mut self,
        amount: u64,
        max_cost: u64,
        referrer: Option<Pubkey>,
        guard_bump: u8,
    ) -> Result<TradeQuote> {
        let clock = Clock::get()?;
        let buyer = self.buyer.key();

        begin_buy(
            &mut self.config,
            &self.listing,
            &buyer,
            self.whitelist_entry.as_deref(),
        )?;
        let is_participant = SaleParticipant::resolve(
            &self.membership,
            &self.listing.mint,
            self.listing.private_sale.round,
            &buyer,
        )?;
        if self.trader_guard.authority == Pubkey::default() {
            self.trader_guard.authority = buyer;
            self.trader_guard.bump = guard_bump;
        }

        let ctx = ExecutionContext {
            trader: buyer,
            now: clock.unix_timestamp,
            slot: clock.slot,
        };
        let receipt = execute_buy(
            &self.config,
            &mut self.listing,
            &mut self.trader_guard,
            &ctx,
            amount,
            max_cost,
            is_participant,
        )?;
        let quote = receipt.quote;
        require!(
            self.buyer_payment.amount >= quote.net,
            ExchangeError::InsufficientFunds
        );

        // Persist before any CPI so a nested invocation sees the lock
        self.config.exit(&crate::ID)?;
        self.listing.exit(&crate::ID)?;
        self.trader_guard.exit(&crate::ID)?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.buyer_payment.to_account_info(),
                    mint: self.payment_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.buyer.to_account_info(),
                },
            ),
            quote.gross,
            self.payment_mint.decimals,
        )?;

        if quote.fee > 0 {
            transfer_checked(
                CpiContext::new(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.buyer_payment.to_account_info(),
                        mint: self.payment_mint.to_account_info(),
                        to: self.fee_destination.to_account_info(),
                        authority: self.buyer.to_account_info(),
                    },
                ),
                quote.fee,
                self.payment_mint.decimals,
            )?;
        }

        let id = self.listing.id.to_le_bytes();
        let bump = [self.listing.bump];
        let listing_seeds: &[&[u8]] = &[TokenListing::SEED, &id, &bump];
        let signer_seeds = &[listing_seeds];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.mint.to_account_info(),
                    to: self.buyer_token.to_account_info(),
                    authority: self.listing.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )?;

        if let Some(referrer) = referrer {
            let referral = self.referral.as_deref_mut();
            let credited = best_effort("referral", || {
                notify_referral(referral, &buyer, &referrer, quote.gross)
            });
            if credited.is_some() {
                emit!(ReferralCredited {
                    referrer,
                    buyer,
                    mint: self.listing.mint,
                    volume: quote.gross,
                });
            }
        }

        self.config.leave();

        emit!(TokensBought {
            buyer,
            mint: self.listing.mint,
            amount,
            cost: quote.gross,
            fee: quote.fee,
            old_price: receipt.old_price,
            new_price: receipt.new_price,
            supply_after: receipt.supply_after,
            private_sale: quote.private_sale,
            slot: ctx.slot,
        });

        Ok(quote)
    }
}

/// Accounts for selling
#[derive(Accounts)]
pub struct Sell<'info> {
    /// Seller
    #[account(mut)]
    pub seller: Signer<'info>,

    /// Protocol configuration, carries the reentrancy lock
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Listing being traded
    #[account(
        mut,
        seeds = [TokenListing::SEED, listing.id.to_le_bytes().as_ref()],
        bump = listing.bump,
    )]
    pub listing: Box<Account<'info, TokenListing>>,

    /// Listed token mint
    #[account(mut, address = listing.mint)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Payment mint
    #[account(address = config.payment_mint)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Seller's payment account
    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = seller,
        token::token_program = token_program,
    )]
    pub seller_payment: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Seller's listed token account
    #[account(
        mut,
        token::mint = mint,
        token::authority = seller,
        token::token_program = token_program,
    )]
    pub seller_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Listing's payment vault
    #[account(
        mut,
        associated_token::mint = payment_mint,
        associated_token::authority = listing,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Fee recipient's payment account
    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = config.fee_recipient,
        token::token_program = token_program,
    )]
    pub fee_destination: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Flash-loan guard state of the seller
    #[account(
        init_if_needed,
        payer = seller,
        space = 8 + TraderGuard::INIT_SPACE,
        seeds = [TraderGuard::SEED, seller.key().as_ref()],
        bump,
    )]
    pub trader_guard: Box<Account<'info, TraderGuard>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Sell<'info> {
    /// Sell `amount` listed tokens receiving at least `min_proceeds` after fee
    pub fn sell(&mut self, amount: u64, min_proceeds: u64, guard_bump: u8) -> Result<TradeQuote> {
        let clock = Clock::get()?;
        let seller = self.seller.key();

        begin_sell(&mut self.config, &self.listing)?;
        if self.trader_guard.authority == Pubkey::default() {
            self.trader_guard.authority = seller;
            self.trader_guard.bump = guard_bump;
        }

        let ctx = ExecutionContext {
            trader: seller,
            now: clock.unix_timestamp,
            slot: clock.slot,
        };
        let receipt = execute_sell(
            &self.config,
            &mut self.listing,
            &mut self.trader_guard,
            &ctx,
            amount,
            min_proceeds,
        )?;
        let quote = receipt.quote;
        require!(
            self.seller_token.amount >= amount,
            ExchangeError::InsufficientFunds
        );

        // Persist before any CPI so a nested invocation sees the lock
        self.config.exit(&crate::ID)?;
        self.listing.exit(&crate::ID)?;
        self.trader_guard.exit(&crate::ID)?;

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.mint.to_account_info(),
                    from: self.seller_token.to_account_info(),
                    authority: self.seller.to_account_info(),
                },
            ),
            amount,
        )?;

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
                    to: self.seller_payment.to_account_info(),
                    authority: self.listing.to_account_info(),
                },
                signer_seeds,
            ),
            quote.net,
            self.payment_mint.decimals,
        )?;

        if quote.fee > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.vault.to_account_info(),
                        mint: self.payment_mint.to_account_info(),
                        to: self.fee_destination.to_account_info(),
                        authority: self.listing.to_account_info(),
                    },
                    signer_seeds,
                ),
                quote.fee,
                self.payment_mint.decimals,
            )?;
        }

        self.config.leave();

        emit!(TokensSold {
            seller,
            mint: self.listing.mint,
            amount,
            proceeds: quote.gross,
            fee: quote.fee,
            old_price: receipt.old_price,
            new_price: receipt.new_price,
            supply_after: receipt.supply_after,
            slot: ctx.slot,
        });

        Ok(quote)
    }
}
