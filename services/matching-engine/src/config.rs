//! Engine configuration

use serde::{Deserialize, Serialize};

/// Default instrument universe size
pub const DEFAULT_INSTRUMENT_CAPACITY: usize = 1024;

/// Configuration for the matching engine.
///
/// Fixed at construction; the book table is never resized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of instruments; valid indices are `0..instrument_capacity`.
    pub instrument_capacity: usize,
    /// First order id the engine issues.
    pub first_order_id: u64,
}

impl EngineConfig {
    pub fn new(instrument_capacity: usize) -> Self {
        Self {
            instrument_capacity,
            ..Self::default()
        }
    }

    pub fn with_first_order_id(mut self, first_order_id: u64) -> Self {
        self.first_order_id = first_order_id;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instrument_capacity: DEFAULT_INSTRUMENT_CAPACITY,
            first_order_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.instrument_capacity, 1024);
        assert_eq!(config.first_order_id, 1);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new(8).with_first_order_id(500);
        assert_eq!(config.instrument_capacity, 8);
        assert_eq!(config.first_order_id, 500);
    }
}
