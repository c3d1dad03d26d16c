//! Identifier types for engine entities
//!
//! Order ids are plain 64-bit integers issued by a lock-free [`IdGenerator`]
//! owned by the engine. Instruments are addressed by a fixed index into the
//! engine's book table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Unique identifier for an order
///
/// Issued by [`IdGenerator`]; ordering follows issuance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of an instrument within the engine's fixed universe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(usize);

impl InstrumentId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(&self) -> usize {
        self.0
    }

    /// Display ticker for the instrument (`STOCK1` for index 0)
    pub fn ticker(&self) -> String {
        format!("STOCK{}", self.0 + 1)
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STOCK{}", self.0 + 1)
    }
}

/// The order identifier space has been used up
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("order id space exhausted")]
pub struct IdExhausted;

/// Lock-free issuer of order identifiers
///
/// Ids are unique for the lifetime of the generator and strictly increasing
/// in issuance order. `u64::MAX` is never issued: it marks the exhausted
/// state, after which every call fails with [`IdExhausted`].
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Generator whose first id is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Generator whose first id is `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Issue the next id
    pub fn next(&self) -> Result<OrderId, IdExhausted> {
        // Only this counter is published, so Relaxed ordering is sufficient
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                if current == u64::MAX {
                    None
                } else {
                    Some(current + 1)
                }
            })
            .map(OrderId)
            .map_err(|_| IdExhausted)
    }

    /// Whether the generator can no longer issue ids
    pub fn is_exhausted(&self) -> bool {
        self.next.load(Ordering::Relaxed) == u64::MAX
    }

    /// The id the next successful call would return
    pub fn peek(&self) -> Option<OrderId> {
        match self.next.load(Ordering::Relaxed) {
            u64::MAX => None,
            value => Some(OrderId(value)),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
