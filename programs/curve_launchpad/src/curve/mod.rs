//! # Pricing Module
//!
//! Deterministic, side-effect free pricing for every listing.
//!
//! ```text
//!   price ▲
//!         │                          ╱ quadratic
//!         │                       ╱
//!         │                   ╱      ╱ linear
//!         │              ╱      ╱
//!         │         ╱      ╱
//!         │    ╱      ╱
//!         │╱─────╱──────────────── flat
//!         └──────────────────────────▶ issued supply
//! ```
//!
//! The mutating trade path and the read-only previews call the same
//! functions, so a quote is always exactly what a trade in the same state
//! charges.

pub mod bonding_curve;

pub use bonding_curve::*;
