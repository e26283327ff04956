//! Batch progress event payloads.

use crate::types::Callsign;

/// Events emitted by the batch coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Detection finished for a station.
    StationDetected {
        /// Station call.
        call: Callsign,
        /// Periods found, possibly zero.
        periods: usize,
    },
    /// Detection failed for a station.
    StationFailed {
        /// Station call.
        call: Callsign,
        /// Rendered error.
        error: String,
    },
    /// All submitted stations are done.
    BatchFinished {
        /// Stations processed.
        stations: usize,
        /// Periods across all stations.
        periods: usize,
        /// Stations that failed.
        failures: usize,
    },
}
