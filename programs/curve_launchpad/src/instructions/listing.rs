//! Token Listing
//!
//! A listing manager creates a token together with everything it needs to
//! trade:
//! 1. The listing account holding curve parameters and the supply record
//! 2. A mint whose only authority is the listing PDA
//! 3. The listing's payment vault
//! 4. Metaplex metadata (name, symbol, uri)

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    metadata::{
        create_metadata_accounts_v3, mpl_token_metadata::types::DataV2,
        CreateMetadataAccountsV3, Metadata,
    },
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::{MAX_DECIMALS, MAX_NAME_LEN, MAX_SYMBOL_LEN, MAX_URI_LEN};
use crate::curve::CurveParams;
use crate::errors::ExchangeError;
use crate::guard::require_capability;
use crate::state::{AccessGrant, Capability, Config, PrivateSaleWindow, TokenListing};

/// Listing parameters
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ListTokenParams {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u8,
    pub issuance_cap: u64,
    pub max_per_tx: u64,
    pub curve: CurveParams,
}

impl ListTokenParams {
    pub fn validate(&self) -> Result<()> {
        self.curve.validate()?;
        require!(self.decimals <= MAX_DECIMALS, ExchangeError::InvalidDecimals);
        require!(
            self.issuance_cap > 0 && self.max_per_tx > 0 && self.max_per_tx <= self.issuance_cap,
            ExchangeError::InvalidIssuanceCap
        );
        require!(
            self.name.len() <= MAX_NAME_LEN
                && self.symbol.len() <= MAX_SYMBOL_LEN
                && self.uri.len() <= MAX_URI_LEN,
            ExchangeError::MetadataTooLong
        );
        Ok(())
    }
}

/// Event emitted when a new token is listed
#[event]
pub struct TokenListed {
    pub listing_id: u64,
    pub mint: Pubkey,
    pub creator: Pubkey,
    pub issuance_cap: u64,
    pub max_per_tx: u64,
    pub curve: CurveParams,
}

/// Accounts for listing a new token
#[derive(Accounts)]
#[instruction(params: ListTokenParams)]
pub struct ListToken<'info> {
    /// Listing manager (pays for accounts)
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Global protocol configuration
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    pub access: Option<Account<'info, AccessGrant>>,

    /// The new listing account
    #[account(
        init,
        payer = authority,
        space = 8 + TokenListing::INIT_SPACE,
        seeds = [TokenListing::SEED, config.listing_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub listing: Box<Account<'info, TokenListing>>,

    /// Token mint (created for this listing)
    #[account(
        init,
        payer = authority,
        mint::decimals = params.decimals,
        mint::authority = listing,
        mint::token_program = token_program,
        seeds = [TokenListing::MINT_SEED, listing.key().as_ref()],
        bump,
    )]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Payment token mint
    #[account(address = config.payment_mint)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Listing's payment vault
    #[account(
        init,
        payer = authority,
        associated_token::mint = payment_mint,
        associated_token::authority = listing,
        associated_token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: created and validated by the token metadata program
    #[account(
        mut,
        seeds = [b"metadata", token_metadata_program.key().as_ref(), mint.key().as_ref()],
        bump,
        seeds::program = token_metadata_program.key(),
    )]
    pub metadata: UncheckedAccount<'info>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// Metaplex token metadata program
    pub token_metadata_program: Program<'info, Metadata>,
    /// System program
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

impl<'info> ListToken<'info> {
    pub fn list_token(&mut self, params: ListTokenParams, bumps: &ListTokenBumps) -> Result<()> {
        require_capability(
            &self.config,
            &self.authority.key(),
            self.access.as_deref(),
            Capability::ListingManager,
        )?;
        params.validate()?;

        let listing_id = self.config.listing_count;
        let initial_price = params.curve.spot_price(0)?;

        self.listing.set_inner(TokenListing {
            id: listing_id,
            creator: self.authority.key(),
            mint: self.mint.key(),
            active: true,
            paused: false,
            issuance_cap: params.issuance_cap,
            max_per_tx: params.max_per_tx,
            curve: params.curve,
            issued_supply: 0,
            reserves: 0,
            last_price: initial_price,
            whitelist_enabled: false,
            private_sale: PrivateSaleWindow::default(),
            bump: bumps.listing,
        });

        self.config.listing_count = listing_id
            .checked_add(1)
            .ok_or(ExchangeError::MathOverflow)?;

        let id = listing_id.to_le_bytes();
        let bump = [bumps.listing];
        let listing_seeds: &[&[u8]] = &[TokenListing::SEED, &id, &bump];
        let signer_seeds = &[listing_seeds];

        create_metadata_accounts_v3(
            CpiContext::new_with_signer(
                self.token_metadata_program.to_account_info(),
                CreateMetadataAccountsV3 {
                    metadata: self.metadata.to_account_info(),
                    mint: self.mint.to_account_info(),
                    mint_authority: self.listing.to_account_info(),
                    payer: self.authority.to_account_info(),
                    update_authority: self.listing.to_account_info(),
                    system_program: self.system_program.to_account_info(),
                    rent: self.rent.to_account_info(),
                },
                signer_seeds,
            ),
            DataV2 {
                name: params.name,
                symbol: params.symbol,
                uri: params.uri,
                seller_fee_basis_points: 0,
                creators: None,
                collection: None,
                uses: None,
            },
            false,
            true,
            None,
        )?;

        msg!(
            "Listed {} as #{} ({:?} curve, cap {})",
            self.mint.key(),
            listing_id,
            params.curve.kind(),
            params.issuance_cap
        );
        emit!(TokenListed {
            listing_id,
            mint: self.mint.key(),
            creator: self.authority.key(),
            issuance_cap: params.issuance_cap,
            max_per_tx: params.max_per_tx,
            curve: params.curve,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRICE_SCALE;

    fn params() -> ListTokenParams {
        ListTokenParams {
            name: "Quest Token".to_string(),
            symbol: "QST".to_string(),
            uri: "https://example.com/qst.json".to_string(),
            decimals: 6,
            issuance_cap: 1_000_000,
            max_per_tx: 10_000,
            curve: CurveParams {
                base_price: PRICE_SCALE as u64,
                slope: 1_000,
                curvature: 0,
            },
        }
    }

    #[test]
    fn test_valid_params() {
        params().validate().unwrap();
    }

    #[test]
    fn test_invalid_params() {
        let mut p = params();
        p.max_per_tx = p.issuance_cap + 1;
        assert_eq!(p.validate().unwrap_err(), ExchangeError::InvalidIssuanceCap.into());

        let mut p = params();
        p.issuance_cap = 0;
        assert!(p.validate().is_err());

        let mut p = params();
        p.decimals = 12;
        assert_eq!(p.validate().unwrap_err(), ExchangeError::InvalidDecimals.into());

        let mut p = params();
        p.symbol = "TOOLONGSYMBOL".to_string();
        assert_eq!(p.validate().unwrap_err(), ExchangeError::MetadataTooLong.into());

        let mut p = params();
        p.curve.base_price = 0;
        assert!(p.validate().is_err());
    }
}
