//! Shared primitive aliases used across the log, detector and table.

use chrono::NaiveDateTime;

/// Loader row identifier for a QSO.
pub type QsoId = u64;
/// Position of a record within one station's ordered sequence.
pub type SeqIndex = usize;
/// Transmitting station callsign.
pub type Callsign = String;
/// Short uppercase county code, e.g. `"ALB"`.
pub type CountyCode = String;
/// Contest-local wall-clock timestamp, second resolution.
pub type Timestamp = NaiveDateTime;

/// Text format of the `datetime` column in contest logs.
pub const LOG_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
