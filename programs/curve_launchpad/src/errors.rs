//! Exchange error codes
//!
//! Grouped the way callers handle them: validation, economic, timing and
//! authorization. Every error aborts the whole instruction.

use anchor_lang::prelude::*;

#[error_code]
pub enum ExchangeError {
    // Validation
    #[msg("Address must not be the default public key")]
    InvalidAddress,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Amount exceeds the per-transaction cap")]
    AmountExceedsTxCap,
    #[msg("Token is not listed or listing is inactive")]
    TokenNotListed,
    #[msg("Token trading is paused")]
    TokenPaused,
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Issuance cap must be positive and per-transaction cap within it")]
    InvalidIssuanceCap,
    #[msg("Protocol fee exceeds the maximum")]
    FeeTooHigh,
    #[msg("Private sale window is out of bounds")]
    InvalidSaleWindow,
    #[msg("Private sale price must be positive")]
    InvalidFixedPrice,
    #[msg("Mint decimals out of range")]
    InvalidDecimals,
    #[msg("Metadata field exceeds maximum length")]
    MetadataTooLong,
    #[msg("Listing or protocol must be paused")]
    NotPaused,

    // Economic
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("Insufficient funds for trade")]
    InsufficientFunds,
    #[msg("Issuance cap exceeded")]
    SupplyCapExceeded,
    #[msg("Not enough issued supply to sell")]
    InsufficientSupply,
    #[msg("Reserves cannot cover proceeds")]
    InsufficientReserve,
    #[msg("Arithmetic overflow")]
    MathOverflow,

    // Timing
    #[msg("Private sale has ended")]
    SaleEnded,
    #[msg("A private sale is already scheduled or active")]
    SaleAlreadyConfigured,
    #[msg("No private sale configured")]
    SaleNotConfigured,
    #[msg("Account already traded in this slot")]
    FlashLoanGuard,

    // Authorization
    #[msg("Caller lacks the required capability")]
    Unauthorized,
    #[msg("Caller is not whitelisted")]
    NotWhitelisted,
    #[msg("Caller is not a private sale participant")]
    NotSaleParticipant,
    #[msg("Reentrant call rejected")]
    ReentrantCall,

    // Best-effort side effects
    #[msg("Referral record does not match referrer")]
    InvalidReferral,
}
