//! State structures for the launchpad protocol

pub mod access;
pub mod config;
pub mod listing;
pub mod private_sale;
pub mod referral;
pub mod trader;
pub mod whitelist;

pub use access::*;
pub use config::*;
pub use listing::*;
pub use private_sale::*;
pub use referral::*;
pub use trader::*;
pub use whitelist::*;
