use serde::{Deserialize, Serialize};

use crate::{
    qso::QsoRecord,
    types::{CountyCode, SeqIndex, Timestamp},
};

use super::trace::Trace;

/// A span of one station's log classified as county-line operation.
///
/// Serialized field order and names are what the animation and QC
/// reporters read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyLinePeriod {
    /// Timestamp of the first record in the span.
    pub start_time: Timestamp,
    /// Timestamp of the last record in the span.
    pub end_time: Timestamp,
    /// The two counties, lexicographically sorted.
    pub counties: [CountyCode; 2],
    /// Number of records in the span.
    pub qso_count: usize,
    /// Alternations counted by the tracer.
    pub alternations: usize,
    /// Index of the first record.
    pub start_idx: SeqIndex,
    /// Index of the last record, inclusive.
    pub end_idx: SeqIndex,
}

impl CountyLinePeriod {
    /// Builds the period for `trace` started at `start_idx` over the pair `a`/`b`.
    pub(crate) fn assemble(
        qsos: &[QsoRecord],
        start_idx: SeqIndex,
        trace: Trace,
        a: &str,
        b: &str,
    ) -> Self {
        let counties = if a <= b {
            [a.to_string(), b.to_string()]
        } else {
            [b.to_string(), a.to_string()]
        };
        let end_idx = trace.last_valid_idx;
        Self {
            start_time: qsos[start_idx].timestamp,
            end_time: qsos[end_idx].timestamp,
            counties,
            qso_count: end_idx - start_idx + 1,
            alternations: trace.alternations,
            start_idx,
            end_idx,
        }
    }

    /// Minutes between the first and last record.
    pub fn duration_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 60.0
    }

    /// True when `county` is one of the pair.
    pub fn involves(&self, county: &str) -> bool {
        self.counties.iter().any(|c| c == county)
    }
}
