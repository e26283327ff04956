//! QSO input record as supplied by a log loader.

use serde::{Deserialize, Serialize};

use crate::types::{CountyCode, QsoId, SeqIndex, Timestamp};

/// One logged contact, reduced to what county-line detection needs.
///
/// Records for a station are ordered by `timestamp`, ties broken by
/// `sequence_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QsoRecord {
    /// Contact time.
    pub timestamp: Timestamp,
    /// County the station transmitted from.
    pub tx_county: CountyCode,
    /// Position in the station's ordered log.
    pub sequence_index: SeqIndex,
    /// Row id in the source log.
    pub qso_id: QsoId,
}

impl QsoRecord {
    /// Builds a record with `qso_id` equal to the sequence position.
    pub fn new(
        timestamp: Timestamp,
        tx_county: impl Into<CountyCode>,
        sequence_index: SeqIndex,
    ) -> Self {
        Self {
            timestamp,
            tx_county: tx_county.into(),
            sequence_index,
            qso_id: sequence_index as QsoId,
        }
    }

    /// Replaces the source row id.
    pub fn with_qso_id(mut self, qso_id: QsoId) -> Self {
        self.qso_id = qso_id;
        self
    }
}
