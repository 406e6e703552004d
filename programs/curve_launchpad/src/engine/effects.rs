//! Side effects whose failure must not abort a trade
//!
//! Critical interactions (mint, burn, vault and fee transfers) propagate
//! their errors and revert the instruction. Effects routed through
//! [`best_effort`] are logged and dropped on failure instead.

use anchor_lang::prelude::*;

use crate::errors::ExchangeError;
use crate::state::ReferralRecord;

/// Run `effect`, logging and swallowing its error
pub fn best_effort<T>(label: &str, effect: impl FnOnce() -> Result<T>) -> Option<T> {
    match effect() {
        Ok(value) => Some(value),
        Err(err) => {
            msg!("{} skipped: {}", label, err);
            None
        }
    }
}

/// Credit `referrer` with a buy of `volume` payment tokens by `buyer`.
///
/// Leaves the record untouched on any failure.
pub fn notify_referral(
    record: Option<&mut ReferralRecord>,
    buyer: &Pubkey,
    referrer: &Pubkey,
    volume: u64,
) -> Result<()> {
    let record = record.ok_or(ExchangeError::InvalidReferral)?;
    require!(buyer != referrer, ExchangeError::InvalidReferral);
    require!(record.referrer == *referrer, ExchangeError::InvalidReferral);

    let trades = record
        .referred_trades
        .checked_add(1)
        .ok_or(ExchangeError::MathOverflow)?;
    let referred_volume = record
        .referred_volume
        .checked_add(volume)
        .ok_or(ExchangeError::MathOverflow)?;

    record.referred_trades = trades;
    record.referred_volume = referred_volume;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(referrer: Pubkey) -> ReferralRecord {
        ReferralRecord {
            referrer,
            referred_trades: 0,
            referred_volume: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_referral_credited() {
        let referrer = Pubkey::new_unique();
        let mut rec = record(referrer);
        notify_referral(Some(&mut rec), &Pubkey::new_unique(), &referrer, 150).unwrap();
        notify_referral(Some(&mut rec), &Pubkey::new_unique(), &referrer, 50).unwrap();
        assert_eq!(rec.referred_trades, 2);
        assert_eq!(rec.referred_volume, 200);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let referrer = Pubkey::new_unique();
        let buyer = Pubkey::new_unique();

        assert!(best_effort("referral", || notify_referral(None, &buyer, &referrer, 1)).is_none());

        let mut rec = record(Pubkey::new_unique());
        let outcome = best_effort("referral", || {
            notify_referral(Some(&mut rec), &buyer, &referrer, 1)
        });
        assert!(outcome.is_none());
        assert_eq!(rec.referred_trades, 0);

        let mut own = record(buyer);
        assert!(notify_referral(Some(&mut own), &buyer, &buyer, 1).is_err());

        let mut full = record(referrer);
        full.referred_volume = u64::MAX;
        assert!(notify_referral(Some(&mut full), &buyer, &referrer, 1).is_err());
        assert_eq!(full.referred_trades, 0);
    }
}
