//! Random broker
//!
//! Generates limit orders with a deterministic seeded RNG: uniform side,
//! instrument, quantity and price within the configured ranges.

use matching_engine::MatchingEngine;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use types::errors::EngineError;
use types::ids::OrderId;
use types::order::Side;

/// Configuration for a random broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Smallest order size (inclusive)
    pub min_quantity: u64,
    /// Largest order size (inclusive)
    pub max_quantity: u64,
    /// Lowest limit price (inclusive)
    pub min_price: u64,
    /// Highest limit price (inclusive)
    pub max_price: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            min_quantity: 1,
            max_quantity: 100,
            min_price: 10,
            max_price: 509,
        }
    }
}

/// A generated order, not yet submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub side: Side,
    pub instrument: usize,
    pub quantity: u64,
    pub price: u64,
}

/// Random broker with deterministic seeded RNG.
pub struct Broker {
    pub broker_id: usize,
    pub config: BrokerConfig,
    pub orders_generated: usize,
    /// Instruments are drawn from `0..instruments`
    instruments: usize,
    rng: ChaCha8Rng,
}

impl Broker {
    /// Create a new broker with a deterministic seed.
    pub fn new(broker_id: usize, config: BrokerConfig, instruments: usize, seed: u64) -> Self {
        Self {
            broker_id,
            config,
            orders_generated: 0,
            instruments,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate the next order.
    ///
    /// Inverted ranges are read low to high. With an empty instrument
    /// universe the intent targets index 0, which the engine rejects.
    pub fn next_intent(&mut self) -> OrderIntent {
        let side = if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };

        let instrument = if self.instruments == 0 {
            0
        } else {
            self.rng.gen_range(0..self.instruments)
        };

        let quantity = draw(&mut self.rng, self.config.min_quantity, self.config.max_quantity);
        let price = draw(&mut self.rng, self.config.min_price, self.config.max_price);

        self.orders_generated += 1;
        OrderIntent { side, instrument, quantity, price }
    }

    /// Generate an order and submit it to the engine.
    pub fn submit_next(&mut self, engine: &MatchingEngine) -> (OrderIntent, Result<OrderId, EngineError>) {
        let intent = self.next_intent();
        let result = engine.submit(intent.side, intent.instrument, intent.quantity, intent.price);
        (intent, result)
    }
}

fn draw(rng: &mut ChaCha8Rng, a: u64, b: u64) -> u64 {
    rng.gen_range(a.min(b)..=a.max(b))
}
