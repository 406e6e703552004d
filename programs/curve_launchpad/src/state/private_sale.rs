//! Private Sale State
//!
//! A listing can run one fixed-price private sale at a time. The window is
//! embedded in the listing; memberships are separate accounts keyed by sale
//! round so that starting a new round invalidates every earlier admission.
//!
//! ```text
//!   NotConfigured ──create──▶ Scheduled ──start──▶ Active ──end time──▶ Ended
//!                                 │                  │                    │
//!                                 └────── end_private_sale ──────────────▶│
//!   Ended ──create──▶ Scheduled (next round)
//! ```

use anchor_lang::prelude::*;

use crate::constants::{MAX_SALE_DURATION, MIN_SALE_DURATION};
use crate::errors::ExchangeError;

/// Stored lifecycle status; `Scheduled` and `Active` are both `Configured`
/// and told apart by the clock
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum SaleStatus {
    #[default]
    NotConfigured,
    Configured,
    Ended,
}

/// Effective phase at a given time
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SalePhase {
    NotConfigured,
    Scheduled,
    Active,
    Ended,
}

/// Treatment of buyers without a membership while a sale is active
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum NonParticipantPolicy {
    /// Non-participants keep buying on the curve
    #[default]
    CurvePricing,
    /// Only participants may buy until the sale ends
    Reject,
}

/// How a buy is priced
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PriceSource {
    Curve,
    /// Scaled price per unit
    Fixed(u64),
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct PrivateSaleWindow {
    /// Incremented on every new sale; memberships are bound to a round
    pub round: u32,
    /// Unix timestamp the sale opens
    pub start_time: i64,
    /// Unix timestamp the sale closes (exclusive)
    pub end_time: i64,
    /// Scaled price per unit for participants
    pub fixed_price: u64,
    pub status: SaleStatus,
    pub policy: NonParticipantPolicy,
    pub participant_count: u32,
}

impl PrivateSaleWindow {
    pub fn phase(&self, now: i64) -> SalePhase {
        match self.status {
            SaleStatus::NotConfigured => SalePhase::NotConfigured,
            SaleStatus::Ended => SalePhase::Ended,
            SaleStatus::Configured if now < self.start_time => SalePhase::Scheduled,
            SaleStatus::Configured if now < self.end_time => SalePhase::Active,
            SaleStatus::Configured => SalePhase::Ended,
        }
    }

    /// Configure the next sale round, returning its number
    pub fn schedule(
        &mut self,
        now: i64,
        start_time: i64,
        end_time: i64,
        fixed_price: u64,
        policy: NonParticipantPolicy,
    ) -> Result<u32> {
        require!(
            matches!(self.phase(now), SalePhase::NotConfigured | SalePhase::Ended),
            ExchangeError::SaleAlreadyConfigured
        );
        require!(start_time >= now, ExchangeError::InvalidSaleWindow);
        let duration = end_time
            .checked_sub(start_time)
            .ok_or(ExchangeError::InvalidSaleWindow)?;
        require!(
            (MIN_SALE_DURATION..=MAX_SALE_DURATION).contains(&duration),
            ExchangeError::InvalidSaleWindow
        );
        require!(fixed_price > 0, ExchangeError::InvalidFixedPrice);

        let round = self
            .round
            .checked_add(1)
            .ok_or(ExchangeError::MathOverflow)?;

        *self = Self {
            round,
            start_time,
            end_time,
            fixed_price,
            status: SaleStatus::Configured,
            policy,
            participant_count: 0,
        };
        Ok(round)
    }

    /// Force the sale into `Ended` regardless of time
    pub fn end(&mut self) -> Result<()> {
        match self.status {
            SaleStatus::NotConfigured => err!(ExchangeError::SaleNotConfigured),
            SaleStatus::Ended => err!(ExchangeError::SaleEnded),
            SaleStatus::Configured => {
                self.status = SaleStatus::Ended;
                Ok(())
            }
        }
    }

    /// Count a new participant; the set only grows until the sale ends
    pub fn admit(&mut self, now: i64) -> Result<u32> {
        match self.phase(now) {
            SalePhase::NotConfigured => return err!(ExchangeError::SaleNotConfigured),
            SalePhase::Ended => return err!(ExchangeError::SaleEnded),
            SalePhase::Scheduled | SalePhase::Active => {}
        }
        self.participant_count = self
            .participant_count
            .checked_add(1)
            .ok_or(ExchangeError::MathOverflow)?;
        Ok(self.round)
    }

    /// Decide how a buy is priced.
    ///
    /// `is_participant` is resolved from the buyer's derived membership
    /// address, so an admitted buyer cannot fall back to the curve while the
    /// window is active.
    pub fn price_source(&self, now: i64, is_participant: bool) -> Result<PriceSource> {
        match (self.phase(now), is_participant, self.policy) {
            (SalePhase::Active, true, _) => Ok(PriceSource::Fixed(self.fixed_price)),
            (SalePhase::Active, false, NonParticipantPolicy::Reject) => {
                err!(ExchangeError::NotSaleParticipant)
            }
            _ => Ok(PriceSource::Curve),
        }
    }
}

/// Admission of one address to one sale round
///
/// Seeds: ["participant", mint, round.to_le_bytes(), participant]
#[account]
#[derive(InitSpace)]
pub struct SaleParticipant {
    pub mint: Pubkey,
    pub round: u32,
    pub participant: Pubkey,
    pub bump: u8,
}

impl SaleParticipant {
    pub const SEED: &'static [u8] = b"participant";

    pub fn is_member(&self, mint: &Pubkey, round: u32, who: &Pubkey) -> bool {
        self.mint == *mint && self.round == round && self.participant == *who
    }

    /// Read membership from the account at `who`'s derived address.
    ///
    /// The caller checks the address. An account this program never created
    /// there means no membership.
    pub fn resolve(info: &AccountInfo, mint: &Pubkey, round: u32, who: &Pubkey) -> Result<bool> {
        if info.owner != &crate::ID || info.data_is_empty() {
            return Ok(false);
        }
        let data = info.try_borrow_data()?;
        let membership = SaleParticipant::try_deserialize(&mut &data[..])?;
        Ok(membership.is_member(mint, round, who))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;
    const HOUR: i64 = 60 * 60;
    const PRICE: u64 = 500_000_000;

    fn scheduled(policy: NonParticipantPolicy) -> PrivateSaleWindow {
        let mut window = PrivateSaleWindow::default();
        window
            .schedule(T0 - 10, T0, T0 + 2 * HOUR, PRICE, policy)
            .unwrap();
        window
    }

    fn membership(mint: Pubkey, round: u32, who: Pubkey) -> SaleParticipant {
        SaleParticipant {
            mint,
            round,
            participant: who,
            bump: 254,
        }
    }

    #[test]
    fn test_phases_follow_clock() {
        let window = scheduled(NonParticipantPolicy::CurvePricing);
        assert_eq!(PrivateSaleWindow::default().phase(T0), SalePhase::NotConfigured);
        assert_eq!(window.phase(T0 - 1), SalePhase::Scheduled);
        assert_eq!(window.phase(T0), SalePhase::Active);
        assert_eq!(window.phase(T0 + 2 * HOUR - 1), SalePhase::Active);
        assert_eq!(window.phase(T0 + 2 * HOUR), SalePhase::Ended);
    }

    #[test]
    fn test_schedule_rejects_bad_windows() {
        let mut window = PrivateSaleWindow::default();
        let policy = NonParticipantPolicy::CurvePricing;

        let too_short = window.schedule(T0, T0, T0 + HOUR - 1, PRICE, policy);
        assert_eq!(too_short.unwrap_err(), ExchangeError::InvalidSaleWindow.into());

        let too_long = window.schedule(T0, T0, T0 + MAX_SALE_DURATION + 1, PRICE, policy);
        assert_eq!(too_long.unwrap_err(), ExchangeError::InvalidSaleWindow.into());

        let in_past = window.schedule(T0, T0 - 1, T0 + HOUR, PRICE, policy);
        assert_eq!(in_past.unwrap_err(), ExchangeError::InvalidSaleWindow.into());

        let free = window.schedule(T0, T0, T0 + HOUR, 0, policy);
        assert_eq!(free.unwrap_err(), ExchangeError::InvalidFixedPrice.into());

        assert_eq!(window, PrivateSaleWindow::default());
    }

    #[test]
    fn test_only_one_sale_at_a_time() {
        let mut window = scheduled(NonParticipantPolicy::CurvePricing);
        let policy = NonParticipantPolicy::Reject;
        let again = window.schedule(T0 + 1, T0 + 10, T0 + 10 + HOUR, PRICE, policy);
        assert_eq!(again.unwrap_err(), ExchangeError::SaleAlreadyConfigured.into());

        // Natural expiry allows the next round
        let after = T0 + 3 * HOUR;
        let round = window
            .schedule(after, after, after + HOUR, PRICE, NonParticipantPolicy::Reject)
            .unwrap();
        assert_eq!(round, 2);
        assert_eq!(window.participant_count, 0);
    }

    #[test]
    fn test_forced_end() {
        let mut window = scheduled(NonParticipantPolicy::CurvePricing);
        window.end().unwrap();
        assert_eq!(window.phase(T0 + 1), SalePhase::Ended);
        assert_eq!(window.end().unwrap_err(), ExchangeError::SaleEnded.into());
        assert_eq!(
            PrivateSaleWindow::default().end().unwrap_err(),
            ExchangeError::SaleNotConfigured.into()
        );
    }

    #[test]
    fn test_admission_closes_when_ended() {
        let mut window = scheduled(NonParticipantPolicy::CurvePricing);
        assert_eq!(window.admit(T0 - 5).unwrap(), 1);
        assert_eq!(window.admit(T0 + 5).unwrap(), 1);
        assert_eq!(window.participant_count, 2);
        assert_eq!(
            window.admit(T0 + 2 * HOUR).unwrap_err(),
            ExchangeError::SaleEnded.into()
        );
    }

    #[test]
    fn test_participant_gets_fixed_price_only_while_active() {
        let window = scheduled(NonParticipantPolicy::CurvePricing);

        assert_eq!(window.price_source(T0 + 1, true).unwrap(), PriceSource::Fixed(PRICE));
        assert_eq!(window.price_source(T0 - 1, true).unwrap(), PriceSource::Curve);
        assert_eq!(window.price_source(T0 + 2 * HOUR, true).unwrap(), PriceSource::Curve);
    }

    #[test]
    fn test_participant_fixed_price_under_either_policy() {
        for policy in [NonParticipantPolicy::CurvePricing, NonParticipantPolicy::Reject] {
            let window = scheduled(policy);
            assert_eq!(window.price_source(T0 + 1, true).unwrap(), PriceSource::Fixed(PRICE));
        }
    }

    #[test]
    fn test_non_participant_policy() {
        let lenient = scheduled(NonParticipantPolicy::CurvePricing);
        assert_eq!(lenient.price_source(T0 + 1, false).unwrap(), PriceSource::Curve);

        let strict = scheduled(NonParticipantPolicy::Reject);
        assert_eq!(
            strict.price_source(T0 + 1, false).unwrap_err(),
            ExchangeError::NotSaleParticipant.into()
        );
        // Outside the window everyone trades on the curve
        assert_eq!(strict.price_source(T0 - 1, false).unwrap(), PriceSource::Curve);
        assert_eq!(
            PrivateSaleWindow::default().price_source(T0, false).unwrap(),
            PriceSource::Curve
        );
    }

    fn resolve_at(
        owner: &Pubkey,
        data: &mut [u8],
        mint: &Pubkey,
        round: u32,
        who: &Pubkey,
    ) -> bool {
        let key = Pubkey::new_unique();
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(&key, false, false, &mut lamports, data, owner, false, 0);
        SaleParticipant::resolve(&info, mint, round, who).unwrap()
    }

    fn stored(member: &SaleParticipant) -> Vec<u8> {
        let mut data = Vec::new();
        member.try_serialize(&mut data).unwrap();
        data
    }

    #[test]
    fn test_resolve_reads_membership_account() {
        let mint = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let mut data = stored(&membership(mint, 1, alice));

        assert!(resolve_at(&crate::ID, &mut data, &mint, 1, &alice));
        assert!(!resolve_at(&crate::ID, &mut data, &mint, 1, &Pubkey::new_unique()));
        assert!(!resolve_at(&crate::ID, &mut data, &Pubkey::new_unique(), 1, &alice));
        // A later round derives a different address, and the old record is stale
        assert!(!resolve_at(&crate::ID, &mut data, &mint, 2, &alice));
    }

    #[test]
    fn test_resolve_without_program_account() {
        let mint = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let system = anchor_lang::system_program::ID;

        assert!(!resolve_at(&system, &mut [], &mint, 1, &alice));

        let mut data = stored(&membership(mint, 1, alice));
        assert!(!resolve_at(&system, &mut data, &mint, 1, &alice));
    }
}
