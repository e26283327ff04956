use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use countyline::{
    detect::DetectorConfig,
    error::{DetectError, RuntimeError},
    persist::sqlite::SqliteLog,
    qso::QsoRecord,
    runtime::{
        batch::{BatchConfig, detect_sqlite_log, spawn_batch},
        events::BatchEvent,
    },
    table::PeriodsTable,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 18)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

fn records(counties: &[&str]) -> Vec<QsoRecord> {
    counties
        .iter()
        .enumerate()
        .map(|(i, c)| QsoRecord::new(t0() + Duration::minutes(i as i64), *c, i))
        .collect()
}

#[tokio::test]
async fn batch_collects_every_station_and_isolates_failures() {
    init_logging();
    let handle = spawn_batch(BatchConfig {
        workers: 2,
        ..BatchConfig::default()
    })
    .expect("spawn");
    let mut sub = handle.subscribe();

    let mut disordered = records(&["ALB", "REN", "ALB", "REN", "ALB"]);
    disordered[2].timestamp = t0() - Duration::minutes(30);

    handle
        .submit("N2CL", records(&["ALB", "REN", "ALB", "REN", "ALB"]))
        .await
        .expect("submit");
    handle
        .submit("W2FIX", records(&["ALB", "ALB", "ALB", "ALB"]))
        .await
        .expect("submit");
    handle.submit("K2BAD", disordered).await.expect("submit");
    handle
        .submit(
            "N2TWO",
            records(&["SAR", "WAS", "SAR", "WAS", "ONE", "ERI", "NIA", "ERI", "NIA", "ERI"]),
        )
        .await
        .expect("submit");

    let outcome = handle.finish().await.expect("finish");
    assert_eq!(outcome.stations, 4);
    assert_eq!(outcome.table.stations(), vec!["N2CL", "N2TWO"]);
    assert_eq!(outcome.table.get("N2TWO").map(<[_]>::len), Some(2));
    assert_eq!(outcome.table.get("W2FIX"), None);

    assert_eq!(outcome.failures.len(), 1);
    let (call, err) = &outcome.failures[0];
    assert_eq!(call, "K2BAD");
    assert!(matches!(err, RuntimeError::Detect(DetectError::OutOfOrder { index: 2, .. })));

    let mut detected = 0;
    let mut failed = 0;
    loop {
        let evt = tokio::time::timeout(StdDuration::from_secs(1), sub.recv())
            .await
            .expect("event before timeout")
            .expect("event");
        match evt {
            BatchEvent::StationDetected { .. } => detected += 1,
            BatchEvent::StationFailed { call, .. } => {
                assert_eq!(call, "K2BAD");
                failed += 1;
            }
            BatchEvent::BatchFinished {
                stations,
                periods,
                failures,
            } => {
                assert_eq!((stations, periods, failures), (4, 3, 1));
                break;
            }
        }
    }
    assert_eq!((detected, failed), (3, 1));
}

#[tokio::test]
async fn empty_batch_finishes_with_empty_table() {
    let handle = spawn_batch(BatchConfig::default()).expect("spawn");
    let outcome = handle.finish().await.expect("finish");
    assert_eq!(outcome.stations, 0);
    assert!(outcome.table.is_empty());
    assert!(outcome.failures.is_empty());
}

#[tokio::test]
async fn invalid_detector_config_is_rejected_at_spawn() {
    let cfg = BatchConfig {
        detector: DetectorConfig::default().lookahead_window_size(1),
        ..BatchConfig::default()
    };
    let err = spawn_batch(cfg).err().expect("should fail");
    assert!(matches!(err, RuntimeError::Detect(DetectError::InvalidConfig(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submits_racing_finish_are_counted_or_rejected() {
    init_logging();
    let handle = spawn_batch(BatchConfig {
        queue_bound: 4,
        ..BatchConfig::default()
    })
    .expect("spawn");
    let late = handle.clone();

    handle
        .submit("N2CL", records(&["ALB", "REN", "ALB", "REN", "ALB"]))
        .await
        .expect("submit");
    let finishing = tokio::spawn(handle.finish());

    let mut accepted = 0;
    for n in 0..10_000 {
        match late.submit(format!("LATE{n}"), records(&["ALB", "REN", "ALB", "REN"])).await {
            Ok(()) => accepted += 1,
            Err(RuntimeError::ChannelClosed) => break,
            Err(other) => panic!("unexpected submit error: {other}"),
        }
        tokio::task::yield_now().await;
    }

    let outcome = finishing.await.expect("join").expect("finish");
    assert_eq!(outcome.stations, 1 + accepted);
    assert_eq!(outcome.table.len(), 1 + accepted);
    assert!(outcome.failures.is_empty());

    let err = late.submit("W2LATE", records(&["ALB", "REN"])).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ChannelClosed));
}

#[tokio::test]
async fn sqlite_log_batch_round_trips_through_json_and_period_table() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("contest_qsos.db");

    {
        let mut log = SqliteLog::open(&db_path).expect("open");
        log.append_qsos("N2CL", &records(&["ALB", "REN", "ALB", "REN", "ALB", "REN"]))
            .expect("append");
        log.append_qsos("W2FIX", &records(&["MON", "MON", "MON", "MON"]))
            .expect("append");
        log.append_qsos("K2ROV", &records(&["SCH", "GRE", "ULS", "DUT", "PUT"]))
            .expect("append");
    }

    // Spawned so the future has to be Send.
    let outcome = tokio::spawn(detect_sqlite_log(db_path.clone(), BatchConfig::default()))
        .await
        .expect("join")
        .expect("batch");
    // W2FIX never changed county so it is not a candidate at all.
    assert_eq!(outcome.stations, 2);
    assert_eq!(outcome.table.stations(), vec!["N2CL"]);

    let json_path = tmp.path().join("outputs").join("county_line_periods.json");
    outcome.table.save(&json_path).expect("save json");
    let reloaded = PeriodsTable::load(&json_path).expect("load json");
    assert_eq!(reloaded, outcome.table);

    let mut sink = SqliteLog::open(&db_path).expect("reopen");
    outcome.write_to(&mut sink).expect("write periods");
    let stored = sink.load_periods("N2CL").expect("load periods");
    assert_eq!(stored, outcome.table.get("N2CL").unwrap());
    assert_eq!(stored[0].alternations, 5);
}
