//! County-line detection over one station's ordered QSO sequence.
//!
//! Detection runs in three steps at each cursor position: find a candidate
//! county pair inside a short lookahead window ([`pair`]), trace how far the
//! alternation between that pair extends ([`trace`]), and emit a
//! [`CountyLinePeriod`] when the trace holds enough alternations
//! ([`detector`]).
//!
//! ```
//! use chrono::NaiveDate;
//! use countyline::detect::{detect_periods, DetectorConfig};
//! use countyline::qso::QsoRecord;
//!
//! let t0 = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap().and_hms_opt(14, 0, 0).unwrap();
//! let qsos: Vec<QsoRecord> = ["ALB", "REN", "ALB", "REN", "ALB"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, c)| QsoRecord::new(t0 + chrono::Duration::minutes(i as i64), *c, i))
//!     .collect();
//!
//! let periods = detect_periods(&qsos, &DetectorConfig::default()).expect("ordered input");
//! assert_eq!(periods.len(), 1);
//! assert_eq!(periods[0].counties, ["ALB".to_string(), "REN".to_string()]);
//! assert_eq!(periods[0].alternations, 4);
//! ```

/// Detector thresholds.
pub mod config;
/// Driving loop and ordering check.
pub mod detector;
/// Lookahead pair finder.
pub mod pair;
/// Immutable period record.
pub mod period;
/// Alternation tracer.
pub mod trace;

pub use config::DetectorConfig;
pub use detector::{CountyLineDetector, detect_periods};
pub use pair::find_alternating_pair;
pub use period::CountyLinePeriod;
pub use trace::{Trace, trace_pattern};
