//! Instruction handlers for the launchpad
//!
//! - `initialize` - Set up the protocol (admin, once)
//! - `admin` - Pausing, fees, capability grants, listing status, recovery
//! - `listing` - List a new token on its own curve
//! - `whitelist` - Per-listing buyer whitelists
//! - `private_sale` - Fixed-price sale windows and their participants
//! - `referral` - Referrer registration
//! - `trade` - Buy and sell against the curve
//! - `preview` - Read-only quotes

pub mod admin;
pub mod initialize;
pub mod listing;
pub mod preview;
pub mod private_sale;
pub mod referral;
pub mod trade;
pub mod whitelist;

pub use admin::*;
pub use initialize::*;
pub use listing::*;
pub use preview::*;
pub use private_sale::*;
pub use referral::*;
pub use trade::*;
pub use whitelist::*;
