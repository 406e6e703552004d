//! # Exchange Engine
//!
//! Checks, then effects, then interactions:
//!
//! ```text
//!   ┌──────────┐   ┌─────────────────────────┐   ┌──────────────────────┐
//!   │  guards  │──▶│ supply ledger, reserves │──▶│ mint / burn / pay    │
//!   │  quote   │   │ spot price, trader slot │   │ best-effort referral │
//!   │ slippage │   └─────────────────────────┘   └──────────────────────┘
//!   └──────────┘        (this module)            (instruction handlers)
//! ```

pub mod effects;
pub mod exchange;

pub use effects::*;
pub use exchange::*;
