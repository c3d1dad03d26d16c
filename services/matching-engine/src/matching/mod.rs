//! Matching logic module
//!
//! Crossing predicates and the per-book trade executor used by the
//! price-time priority match loop.

pub mod crossing;
pub mod executor;

pub use crossing::can_match;
pub use executor::MatchExecutor;
