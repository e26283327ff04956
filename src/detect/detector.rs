use log::{debug, warn};

use crate::{error::DetectError, qso::QsoRecord};

use super::{
    config::DetectorConfig,
    pair::find_alternating_pair,
    period::CountyLinePeriod,
    trace::trace_pattern,
};

/// County-line detector bound to a validated [`DetectorConfig`].
#[derive(Debug, Clone, Copy)]
pub struct CountyLineDetector {
    config: DetectorConfig,
}

impl CountyLineDetector {
    /// Validates `config` and builds a detector.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Thresholds in use.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Finds all county-line periods in one station's ordered log.
    ///
    /// Periods are returned by ascending `start_idx` and never overlap. An
    /// empty list means no county-line operation was found; the only error is
    /// a timestamp that goes backwards.
    pub fn detect(&self, qsos: &[QsoRecord]) -> Result<Vec<CountyLinePeriod>, DetectError> {
        check_order(qsos)?;

        let min_alt = self.config.minimum_alternations;
        if qsos.len() < min_alt + 1 {
            return Ok(Vec::new());
        }

        let counties: Vec<&str> = qsos.iter().map(|q| q.tx_county.as_str()).collect();
        let mut periods = Vec::new();
        let mut i = 0usize;

        while i < counties.len() - min_alt {
            match self.period_at(qsos, &counties, i) {
                Some(period) => {
                    debug!(
                        "county-line period {}/{} at [{}, {}] with {} alternations",
                        period.counties[0],
                        period.counties[1],
                        period.start_idx,
                        period.end_idx,
                        period.alternations
                    );
                    i = period.end_idx + 1;
                    periods.push(period);
                }
                None => i += 1,
            }
        }

        Ok(periods)
    }

    fn period_at(
        &self,
        qsos: &[QsoRecord],
        counties: &[&str],
        start_idx: usize,
    ) -> Option<CountyLinePeriod> {
        let window_end = (start_idx + self.config.lookahead_window_size).min(counties.len());
        let (a, b) = find_alternating_pair(&counties[start_idx..window_end])?;

        let trace = trace_pattern(counties, start_idx, a, b, self.config.max_consecutive_noise);
        (trace.alternations >= self.config.minimum_alternations)
            .then(|| CountyLinePeriod::assemble(qsos, start_idx, trace, a, b))
    }
}

/// One-shot detection with `config`.
pub fn detect_periods(
    qsos: &[QsoRecord],
    config: &DetectorConfig,
) -> Result<Vec<CountyLinePeriod>, DetectError> {
    CountyLineDetector::new(*config)?.detect(qsos)
}

fn check_order(qsos: &[QsoRecord]) -> Result<(), DetectError> {
    for (offset, pair) in qsos.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            let index = offset + 1;
            warn!(
                "qso {} at index {index} is earlier than its predecessor",
                pair[1].qso_id
            );
            return Err(DetectError::OutOfOrder {
                index,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }
    Ok(())
}
