//! County-line operation detection for contest QSO logs.
//!
//! A mobile station parked on a county boundary can alternate its
//! transmissions between the two counties to hand out both as multipliers.
//! This crate finds those periods in each station's time-ordered log.
//!
//! # Examples
//!
//! Single station with [`detect::CountyLineDetector`]:
//! ```
//! use chrono::{Duration, NaiveDate};
//! use countyline::{
//!     detect::{CountyLineDetector, DetectorConfig},
//!     qso::QsoRecord,
//! };
//!
//! let t0 = NaiveDate::from_ymd_opt(2025, 10, 18).unwrap().and_hms_opt(14, 0, 0).unwrap();
//! let log: Vec<QsoRecord> = ["SCH", "ALB", "SCH", "ALB", "ALB", "SCH", "GRE"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, c)| QsoRecord::new(t0 + Duration::minutes(2 * i as i64), *c, i))
//!     .collect();
//!
//! let detector = CountyLineDetector::new(DetectorConfig::default()).expect("config");
//! let periods = detector.detect(&log).expect("ordered log");
//! assert_eq!(periods.len(), 1);
//! assert_eq!((periods[0].start_idx, periods[0].end_idx), (0, 5));
//! ```
//!
//! Batch over a SQLite contest log:
//! ```no_run
//! use countyline::runtime::batch::{detect_sqlite_log, BatchConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let outcome = detect_sqlite_log("contest_qsos.db", BatchConfig::default())
//!     .await
//!     .expect("batch");
//! outcome.table.save("outputs/county_line_periods.json").expect("save");
//! # }
//! ```
#![deny(missing_docs)]

/// Pair finder, tracer and period assembly.
pub mod detect;
/// Error enums for each layer.
pub mod error;
/// Log source and period sink abstractions with a SQLite implementation.
pub mod persist;
/// QSO input records.
pub mod qso;
/// Multi-station batch runner and events.
pub mod runtime;
/// Per-station period table and JSON output.
pub mod table;
/// Shared primitive types.
pub mod types;
