use std::{path::PathBuf, sync::Arc};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{Semaphore, broadcast, mpsc, oneshot},
    task::JoinSet,
};

use crate::{
    detect::{CountyLineDetector, CountyLinePeriod, DetectorConfig},
    error::{PersistResult, RuntimeError},
    persist::{PeriodSink, QsoSource, sqlite::SqliteLog},
    qso::QsoRecord,
    table::PeriodsTable,
    types::Callsign,
};

use super::events::BatchEvent;

/// Batch runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Detections allowed to run at once.
    pub workers: usize,
    /// Submissions buffered before `submit` waits.
    pub queue_bound: usize,
    /// Detector thresholds shared by every station.
    pub detector: DetectorConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_bound: 64,
            detector: DetectorConfig::default(),
        }
    }
}

/// Result of a finished batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Periods per station, stations without periods omitted.
    pub table: PeriodsTable,
    /// Stations whose detection failed, in completion order.
    pub failures: Vec<(Callsign, RuntimeError)>,
    /// Stations processed, failed ones included.
    pub stations: usize,
}

impl BatchOutcome {
    /// Writes every station's periods to `sink`, then flushes it.
    pub fn write_to(&self, sink: &mut dyn PeriodSink) -> PersistResult<()> {
        for call in self.table.stations() {
            if let Some(periods) = self.table.get(call) {
                sink.write_periods(call, periods)?;
            }
        }
        sink.flush()
    }
}

/// Cloneable handle to a running batch.
#[derive(Clone)]
pub struct BatchHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<BatchEvent>,
}

enum Command {
    Submit {
        call: Callsign,
        qsos: Vec<QsoRecord>,
    },
    Finish {
        resp: oneshot::Sender<BatchOutcome>,
    },
}

type StationResult = (Callsign, Result<Vec<CountyLinePeriod>, RuntimeError>);

/// Starts a batch coordinator on the current tokio runtime.
///
/// Fails only when `config.detector` is invalid.
pub fn spawn_batch(config: BatchConfig) -> Result<BatchHandle, RuntimeError> {
    let detector = CountyLineDetector::new(config.detector)?;
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<BatchEvent>(1024);
    let permits = Arc::new(Semaphore::new(config.workers.max(1)));

    info!(
        "county-line batch started: {} workers, min alternations {}, noise tolerance {}",
        config.workers.max(1),
        config.detector.minimum_alternations,
        config.detector.max_consecutive_noise
    );

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut tasks: JoinSet<StationResult> = JoinSet::new();
        let mut outcome = BatchOutcome::default();
        let mut finish: Option<oneshot::Sender<BatchOutcome>> = None;
        let mut accepting = true;

        loop {
            if !accepting && tasks.is_empty() {
                break;
            }

            tokio::select! {
                cmd = cmd_rx.recv(), if accepting => {
                    match cmd {
                        Some(Command::Submit { call, qsos }) => {
                            spawn_station(&mut tasks, Arc::clone(&permits), detector, call, qsos);
                        }
                        Some(Command::Finish { resp }) => {
                            // Later submits fail; ones already queued still run.
                            cmd_rx.close();
                            if finish.is_none() {
                                finish = Some(resp);
                            }
                        }
                        None => accepting = false,
                    }
                }
                joined = tasks.join_next(), if !tasks.is_empty() => {
                    match joined {
                        Some(Ok((call, result))) => {
                            record(&mut outcome, &events_tx_loop, call, result)
                        }
                        Some(Err(err)) => warn!("station task lost: {err}"),
                        None => {}
                    }
                }
            }
        }

        let _ = events_tx_loop.send(BatchEvent::BatchFinished {
            stations: outcome.stations,
            periods: outcome.table.total_periods(),
            failures: outcome.failures.len(),
        });
        info!(
            "county-line batch finished: {} stations, {} with periods, {} periods, {} failed",
            outcome.stations,
            outcome.table.len(),
            outcome.table.total_periods(),
            outcome.failures.len()
        );

        if let Some(resp) = finish {
            let _ = resp.send(outcome);
        }
    });

    Ok(BatchHandle { cmd_tx, events_tx })
}

impl BatchHandle {
    /// Subscribes to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.events_tx.subscribe()
    }

    /// Queues one station's ordered log for detection.
    ///
    /// Fails with [`RuntimeError::ChannelClosed`] once the batch is finishing.
    pub async fn submit(
        &self,
        call: impl Into<Callsign>,
        qsos: Vec<QsoRecord>,
    ) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(Command::Submit {
                call: call.into(),
                qsos,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Queues preloaded station logs, as returned by
    /// [`QsoSource::load_mobile_logs`]. Returns the number queued.
    pub async fn submit_all(
        &self,
        stations: Vec<(Callsign, Vec<QsoRecord>)>,
    ) -> Result<usize, RuntimeError> {
        let count = stations.len();
        for (call, qsos) in stations {
            self.submit(call, qsos).await?;
        }
        Ok(count)
    }

    /// Stops accepting work, waits for queued stations, and returns the outcome.
    pub async fn finish(self) -> Result<BatchOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Finish { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

/// Runs detection over every multi-county station in the SQLite log at `path`.
///
/// The log is read on the blocking pool.
pub async fn detect_sqlite_log(
    path: impl Into<PathBuf>,
    config: BatchConfig,
) -> Result<BatchOutcome, RuntimeError> {
    let path = path.into();
    let handle = spawn_batch(config)?;

    let stations = tokio::task::spawn_blocking(move || {
        let log = SqliteLog::open(&path)?;
        log.load_mobile_logs(2)
    })
    .await
    .map_err(|e| RuntimeError::Join(e.to_string()))??;

    handle.submit_all(stations).await?;
    handle.finish().await
}

fn spawn_station(
    tasks: &mut JoinSet<StationResult>,
    permits: Arc<Semaphore>,
    detector: CountyLineDetector,
    call: Callsign,
    qsos: Vec<QsoRecord>,
) {
    tasks.spawn(async move {
        let Ok(_permit) = permits.acquire_owned().await else {
            return (call, Err(RuntimeError::ChannelClosed));
        };
        let detected = tokio::task::spawn_blocking(move || detector.detect(&qsos)).await;
        let result = match detected {
            Ok(inner) => inner.map_err(RuntimeError::from),
            Err(e) => Err(RuntimeError::Join(e.to_string())),
        };
        (call, result)
    });
}

fn record(
    outcome: &mut BatchOutcome,
    events_tx: &broadcast::Sender<BatchEvent>,
    call: Callsign,
    result: Result<Vec<CountyLinePeriod>, RuntimeError>,
) {
    outcome.stations += 1;
    match result {
        Ok(periods) => {
            debug!("{call}: {} county-line periods", periods.len());
            let _ = events_tx.send(BatchEvent::StationDetected {
                call: call.clone(),
                periods: periods.len(),
            });
            outcome.table.insert(call, periods);
        }
        Err(err) => {
            warn!("{call}: detection failed: {err}");
            let _ = events_tx.send(BatchEvent::StationFailed {
                call: call.clone(),
                error: err.to_string(),
            });
            outcome.failures.push((call, err));
        }
    }
}
