pub mod sqlite;

use log::debug;

use crate::{
    detect::CountyLinePeriod,
    error::PersistResult,
    qso::QsoRecord,
    types::Callsign,
};

pub use crate::error::PersistError;

/// Supplies ordered per-station QSO sequences to the detector.
pub trait QsoSource {
    /// Stations that transmitted from at least `min_counties` distinct counties.
    fn mobile_stations(&self, min_counties: usize) -> PersistResult<Vec<Callsign>>;
    /// One station's log ordered by time, with `sequence_index` assigned.
    fn load_station_qsos(&self, call: &str) -> PersistResult<Vec<QsoRecord>>;

    /// Every station with at least `min_counties` transmit counties, paired
    /// with its ordered log.
    fn load_mobile_logs(
        &self,
        min_counties: usize,
    ) -> PersistResult<Vec<(Callsign, Vec<QsoRecord>)>> {
        let calls = self.mobile_stations(min_counties)?;
        let mut out = Vec::with_capacity(calls.len());
        for call in calls {
            let qsos = self.load_station_qsos(&call)?;
            debug!("loaded {} qsos for {call}", qsos.len());
            out.push((call, qsos));
        }
        Ok(out)
    }
}

/// Receives detected periods.
pub trait PeriodSink {
    /// Replaces whatever was stored for `call` with `periods`.
    fn write_periods(&mut self, call: &str, periods: &[CountyLinePeriod]) -> PersistResult<()>;
    /// Makes prior writes durable.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
