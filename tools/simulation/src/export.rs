//! Metrics and report export
//!
//! Serializes SimMetrics, the audit result and book snapshots to JSON for
//! external consumption.

use matching_engine::{MatchingEngine, OrderBookSnapshot};
use serde::{Deserialize, Serialize};

use crate::audit::AuditSummary;
use crate::harness::SimulationReport;
use crate::metrics::SimMetrics;

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub metrics: SimMetrics,
    pub audit: Option<AuditSummary>,
    /// Rendered audit violation, when the audit failed
    pub audit_error: Option<String>,
    /// Books that still hold resting orders
    pub books: Vec<OrderBookSnapshot>,
    pub order_count: usize,
    pub rejection_count: usize,
}

/// Snapshot every non-empty book down to `depth` levels per side.
pub fn book_snapshots(engine: &MatchingEngine, depth: usize) -> Vec<OrderBookSnapshot> {
    (0..engine.instrument_capacity())
        .filter_map(|instrument| {
            engine
                .with_book(instrument, |book| (book.order_count() > 0).then(|| book.snapshot(depth)))
                .ok()
                .flatten()
        })
        .collect()
}

/// Build a complete simulation export.
pub fn build_export<E: ToString>(
    report: &SimulationReport,
    audit: Result<&AuditSummary, E>,
    books: Vec<OrderBookSnapshot>,
) -> SimulationExport {
    let (audit, audit_error) = match audit {
        Ok(summary) => (Some(summary.clone()), None),
        Err(err) => (None, Some(err.to_string())),
    };

    SimulationExport {
        version: crate::VERSION.to_string(),
        metrics: report.metrics.clone(),
        audit,
        audit_error,
        books,
        order_count: report.submitted.len(),
        rejection_count: report.rejections.len(),
    }
}

/// Export complete simulation data as JSON.
pub fn export_json(export: &SimulationExport) -> String {
    serde_json::to_string_pretty(export).unwrap_or_default()
}

/// Write export to a file path.
pub fn write_to_file(export: &SimulationExport, path: &str) -> std::io::Result<()> {
    let json = export_json(export);
    std::fs::write(path, json)
}
