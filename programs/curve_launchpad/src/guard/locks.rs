//! Reentrancy lock and flash-loan guard

use anchor_lang::prelude::*;

use crate::errors::ExchangeError;
use crate::state::{Config, TraderGuard};

impl Config {
    /// Mark a state-mutating call as in flight.
    ///
    /// The caller must persist the account before its first CPI so that a
    /// nested invocation deserializes the set flag.
    pub fn enter(&mut self) -> Result<()> {
        require!(!self.locked, ExchangeError::ReentrantCall);
        self.locked = true;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.locked = false;
    }
}

impl TraderGuard {
    /// Reject a second trade by the same account within one slot
    pub fn check(&self, slot: u64) -> Result<()> {
        require!(
            self.trade_count == 0 || self.last_slot != slot,
            ExchangeError::FlashLoanGuard
        );
        Ok(())
    }

    /// Record a completed trade at `slot`
    pub fn record(&mut self, slot: u64) {
        self.last_slot = slot;
        self.trade_count = self.trade_count.saturating_add(1);
    }
}
