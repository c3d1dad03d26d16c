//! Performance metrics for simulation
//!
//! Tracks accepted and rejected orders, trades, traded volume, submit
//! latency histograms and throughput.

use serde::{Deserialize, Serialize};
use types::trade::Trade;

/// Latency histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBucket {
    pub label: String,
    pub lower_ns: u64,
    pub upper_ns: u64,
    pub count: u64,
}

/// Aggregated simulation metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_orders: u64,
    pub total_rejections: u64,
    pub total_trades: u64,
    /// Sum of traded quantity
    pub total_volume: u64,
    /// Sum of price * quantity over all trades
    pub total_notional: u128,
    pub latency_buckets: Vec<LatencyBucket>,
    pub elapsed_ns: u64,
}

impl SimMetrics {
    /// Create empty metrics with default latency buckets.
    pub fn new() -> Self {
        Self {
            total_orders: 0,
            total_rejections: 0,
            total_trades: 0,
            total_volume: 0,
            total_notional: 0,
            latency_buckets: default_buckets(),
            elapsed_ns: 0,
        }
    }

    /// Count an order the engine accepted.
    pub fn record_order(&mut self) {
        self.total_orders += 1;
    }

    /// Count an order the engine rejected.
    pub fn record_rejection(&mut self) {
        self.total_rejections += 1;
    }

    /// Record a single trade into metrics.
    pub fn record_trade(&mut self, trade: &Trade) {
        self.total_trades += 1;
        self.total_volume = self.total_volume.saturating_add(trade.quantity.as_u64());
        self.total_notional += trade.trade_value();
    }

    /// Process a batch of trades.
    pub fn ingest_trades(&mut self, trades: &[Trade]) {
        for trade in trades {
            self.record_trade(trade);
        }
    }

    /// Record latency in nanoseconds.
    pub fn record_latency(&mut self, latency_ns: u64) {
        for bucket in &mut self.latency_buckets {
            if latency_ns >= bucket.lower_ns && latency_ns < bucket.upper_ns {
                bucket.count += 1;
                return;
            }
        }
        // Overflow bucket (last)
        if let Some(last) = self.latency_buckets.last_mut() {
            last.count += 1;
        }
    }

    /// Fold another thread's metrics into this one.
    ///
    /// Elapsed time is kept as the maximum; buckets are matched by position.
    pub fn merge(&mut self, other: &SimMetrics) {
        self.total_orders += other.total_orders;
        self.total_rejections += other.total_rejections;
        self.total_trades += other.total_trades;
        self.total_volume = self.total_volume.saturating_add(other.total_volume);
        self.total_notional += other.total_notional;
        for (bucket, theirs) in self.latency_buckets.iter_mut().zip(&other.latency_buckets) {
            bucket.count += theirs.count;
        }
        self.elapsed_ns = self.elapsed_ns.max(other.elapsed_ns);
    }

    /// Total submissions that reached a latency bucket.
    pub fn latency_samples(&self) -> u64 {
        self.latency_buckets.iter().map(|b| b.count).sum()
    }

    /// Set elapsed time.
    pub fn set_elapsed(&mut self, ns: u64) {
        self.elapsed_ns = ns;
    }

    /// Throughput: orders per second.
    pub fn orders_per_second(&self) -> f64 {
        if self.elapsed_ns == 0 {
            return 0.0;
        }
        self.total_orders as f64 / (self.elapsed_ns as f64 / 1_000_000_000.0)
    }

    /// Throughput: trades per second.
    pub fn trades_per_second(&self) -> f64 {
        if self.elapsed_ns == 0 {
            return 0.0;
        }
        self.total_trades as f64 / (self.elapsed_ns as f64 / 1_000_000_000.0)
    }

    /// Build a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Orders: {} | Rejected: {} | Trades: {} | Volume: {} | Notional: {} | Throughput: {:.0} orders/s",
            self.total_orders,
            self.total_rejections,
            self.total_trades,
            self.total_volume,
            self.total_notional,
            self.orders_per_second(),
        )
    }
}

impl Default for SimMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Default latency histogram buckets.
fn default_buckets() -> Vec<LatencyBucket> {
    vec![
        LatencyBucket { label: "<1μs".into(), lower_ns: 0, upper_ns: 1_000, count: 0 },
        LatencyBucket { label: "1-10μs".into(), lower_ns: 1_000, upper_ns: 10_000, count: 0 },
        LatencyBucket { label: "10-100μs".into(), lower_ns: 10_000, upper_ns: 100_000, count: 0 },
        LatencyBucket { label: "100-500μs".into(), lower_ns: 100_000, upper_ns: 500_000, count: 0 },
        LatencyBucket { label: "500μs-1ms".into(), lower_ns: 500_000, upper_ns: 1_000_000, count: 0 },
        LatencyBucket { label: "1-10ms".into(), lower_ns: 1_000_000, upper_ns: 10_000_000, count: 0 },
        LatencyBucket { label: ">10ms".into(), lower_ns: 10_000_000, upper_ns: u64::MAX, count: 0 },
    ]
}
