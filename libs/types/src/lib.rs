//! Types library for the matching engine
//!
//! Value types shared by the order book, the engine front-end and the
//! simulation harness.
//!
//! # Modules
//! - `ids`: Identifiers (OrderId, InstrumentId) and the lock-free IdGenerator
//! - `numeric`: Integral price and quantity newtypes
//! - `order`: Side and the resting Order record
//! - `trade`: Trade records emitted by matching
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::errors::*;
}
