use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use countyline::{
    detect::{CountyLineDetector, DetectorConfig, find_alternating_pair, trace_pattern},
    qso::QsoRecord,
};

const COUNTIES: [&str; 4] = ["ALB", "REN", "SCH", "GRE"];

fn log_from(idx: &[u8]) -> Vec<QsoRecord> {
    let t0 = NaiveDate::from_ymd_opt(2025, 10, 18)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap();
    idx.iter()
        .enumerate()
        .map(|(i, c)| {
            let ts = t0 + Duration::seconds(45 * i as i64);
            QsoRecord::new(ts, COUNTIES[usize::from(*c)], i)
        })
        .collect()
}

// Two-county runs with occasional strays look like real mobile logs more
// than uniform noise does.
fn sequence_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(0u8..4, 0..120),
        prop::collection::vec(prop_oneof![9 => 0u8..2, 1 => 2u8..4], 0..120),
    ]
}

fn config_strategy() -> impl Strategy<Value = DetectorConfig> {
    (1usize..6, 0usize..5, 3usize..14).prop_map(|(min, noise, window)| {
        DetectorConfig::default()
            .minimum_alternations(min)
            .max_consecutive_noise(noise)
            .lookahead_window_size(window)
    })
}

proptest! {
    #[test]
    fn periods_are_ordered_disjoint_and_well_formed(
        seq in sequence_strategy(),
        cfg in config_strategy(),
    ) {
        let log = log_from(&seq);
        let detector = CountyLineDetector::new(cfg).expect("valid config");
        let periods = detector.detect(&log).expect("ordered log");

        for p in &periods {
            prop_assert!(p.end_idx < log.len());
            prop_assert!(p.start_idx <= p.end_idx);
            prop_assert_eq!(p.qso_count, p.end_idx - p.start_idx + 1);
            prop_assert!(p.alternations >= cfg.minimum_alternations);
            prop_assert!(p.qso_count > p.alternations);
            prop_assert!(p.counties[0] < p.counties[1]);
            prop_assert!(p.involves(&log[p.start_idx].tx_county));
            prop_assert!(p.involves(&log[p.end_idx].tx_county));
            prop_assert_eq!(p.start_time, log[p.start_idx].timestamp);
            prop_assert_eq!(p.end_time, log[p.end_idx].timestamp);
        }
        for w in periods.windows(2) {
            prop_assert!(w[0].end_idx < w[1].start_idx);
        }
    }

    #[test]
    fn detection_is_idempotent(seq in sequence_strategy(), cfg in config_strategy()) {
        let log = log_from(&seq);
        let detector = CountyLineDetector::new(cfg).expect("valid config");
        let first = detector.detect(&log).expect("ordered log");
        let second = detector.detect(&log).expect("ordered log");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn looser_noise_tolerance_never_shortens_a_trace(
        seq in sequence_strategy(),
        start in 0usize..120,
        noise in 0usize..5,
    ) {
        let symbols: Vec<&str> = seq.iter().map(|c| COUNTIES[usize::from(*c)]).collect();
        prop_assume!(start < symbols.len());
        let Some((a, b)) = find_alternating_pair(&symbols[start..]) else {
            return Ok(());
        };

        let tight = trace_pattern(&symbols, start, a, b, noise);
        let loose = trace_pattern(&symbols, start, a, b, noise + 1);
        prop_assert!(loose.last_valid_idx >= tight.last_valid_idx);
        prop_assert!(loose.alternations >= tight.alternations);
    }
}

#[test]
fn fewer_records_than_minimum_plus_one_is_empty() {
    let cfg = DetectorConfig::default().minimum_alternations(5);
    let log = log_from(&[0, 1, 0, 1, 0]);
    let periods = CountyLineDetector::new(cfg).unwrap().detect(&log).unwrap();
    assert!(periods.is_empty());
}
