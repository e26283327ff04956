//! Per-station table of detected periods, as consumed by the reporters.

use std::{collections::BTreeMap, fs, path::Path};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    detect::CountyLinePeriod,
    error::PersistResult,
    types::Callsign,
};

/// Totals for one station's periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    /// Number of periods.
    pub periods: usize,
    /// QSOs made inside periods.
    pub qsos: usize,
    /// Sum of period durations in minutes.
    pub minutes: f64,
}

/// Station call to period list. Stations without periods are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodsTable {
    by_station: HashMap<Callsign, Vec<CountyLinePeriod>>,
}

impl PeriodsTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `periods` for `call`, replacing any previous entry.
    ///
    /// An empty list removes the station.
    pub fn insert(&mut self, call: impl Into<Callsign>, periods: Vec<CountyLinePeriod>) {
        let call = call.into();
        if periods.is_empty() {
            self.by_station.remove(&call);
        } else {
            self.by_station.insert(call, periods);
        }
    }

    /// Periods for `call`, if any were found.
    pub fn get(&self, call: &str) -> Option<&[CountyLinePeriod]> {
        self.by_station.get(call).map(Vec::as_slice)
    }

    /// Stations with at least one period, sorted by call.
    pub fn stations(&self) -> Vec<&str> {
        let mut calls: Vec<&str> = self.by_station.keys().map(String::as_str).collect();
        calls.sort_unstable();
        calls
    }

    /// Number of stations with periods.
    pub fn len(&self) -> usize {
        self.by_station.len()
    }

    /// True when no station has periods.
    pub fn is_empty(&self) -> bool {
        self.by_station.is_empty()
    }

    /// Periods across all stations.
    pub fn total_periods(&self) -> usize {
        self.by_station.values().map(Vec::len).sum()
    }

    /// Totals for `call`, if it has periods.
    pub fn summary(&self, call: &str) -> Option<StationSummary> {
        let periods = self.by_station.get(call)?;
        Some(StationSummary {
            periods: periods.len(),
            qsos: periods.iter().map(|p| p.qso_count).sum(),
            minutes: periods.iter().map(CountyLinePeriod::duration_minutes).sum(),
        })
    }

    /// JSON object keyed by call in sorted order.
    pub fn to_json_pretty(&self) -> PersistResult<String> {
        let ordered: BTreeMap<&str, &Vec<CountyLinePeriod>> = self
            .by_station
            .iter()
            .map(|(call, periods)| (call.as_str(), periods))
            .collect();
        Ok(serde_json::to_string_pretty(&ordered)?)
    }

    /// Parses the JSON produced by [`Self::to_json_pretty`].
    pub fn from_json(json: &str) -> PersistResult<Self> {
        let raw: BTreeMap<Callsign, Vec<CountyLinePeriod>> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (call, periods) in raw {
            table.insert(call, periods);
        }
        Ok(table)
    }

    /// Writes the JSON table to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> PersistResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Reads a JSON table from `path`.
    pub fn load(path: impl AsRef<Path>) -> PersistResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
