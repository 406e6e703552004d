//! # Guard Layer
//!
//! Admission checks consulted before any state mutation:
//!
//! ```text
//!   caller ─▶ pause / listing / whitelist gates
//!          ─▶ capability check (admin surface)
//!          ─▶ reentrancy lock + flash-loan guard (trade path)
//!          ─▶ exchange engine
//! ```
//!
//! Every guard rejects; none of them waits.

pub mod gates;
pub mod locks;

pub use gates::*;
