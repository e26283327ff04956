//! SQLite contest log reader and period table writer.

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

use crate::{
    detect::CountyLinePeriod,
    error::{PersistError, PersistResult},
    qso::QsoRecord,
    types::{Callsign, LOG_DATETIME_FORMAT, QsoId},
};

use super::{PeriodSink, QsoSource};

/// Contest log stored in SQLite, with a `county_line_periods` output table.
pub struct SqliteLog {
    conn: Connection,
}

impl SqliteLog {
    /// Opens or creates a log database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory log.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Appends `records` to the `qsos` table as transmissions by `call`.
    ///
    /// Returns the row ids assigned, in input order.
    pub fn append_qsos(&mut self, call: &str, records: &[QsoRecord]) -> PersistResult<Vec<QsoId>> {
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO qsos(datetime, tx_call, tx_county) VALUES (?1, ?2, ?3)",
            )?;
            for rec in records {
                stmt.execute(params![
                    rec.timestamp.format(LOG_DATETIME_FORMAT).to_string(),
                    call,
                    rec.tx_county,
                ])?;
                ids.push(tx.last_insert_rowid() as QsoId);
            }
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Reads back the periods stored for `call`, in period order.
    pub fn load_periods(&self, call: &str) -> PersistResult<Vec<CountyLinePeriod>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_time, end_time, county_a, county_b,
                    qso_count, alternations, start_idx, end_idx
             FROM county_line_periods WHERE tx_call = ?1 ORDER BY period_no ASC",
        )?;

        let rows = stmt.query_map(params![call], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, i64>(7)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (start, end, county_a, county_b, qso_count, alternations, start_idx, end_idx) =
                row?;
            out.push(CountyLinePeriod {
                start_time: parse_log_datetime(&start)?,
                end_time: parse_log_datetime(&end)?,
                counties: [county_a, county_b],
                qso_count: qso_count as usize,
                alternations: alternations as usize,
                start_idx: start_idx as usize,
                end_idx: end_idx as usize,
            });
        }
        Ok(out)
    }
}

impl QsoSource for SqliteLog {
    fn mobile_stations(&self, min_counties: usize) -> PersistResult<Vec<Callsign>> {
        let mut stmt = self.conn.prepare(
            "SELECT tx_call FROM qsos
             GROUP BY tx_call
             HAVING COUNT(DISTINCT tx_county) >= ?1
             ORDER BY tx_call ASC",
        )?;
        let rows = stmt.query_map(params![min_counties as i64], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn load_station_qsos(&self, call: &str) -> PersistResult<Vec<QsoRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, datetime, tx_county FROM qsos
             WHERE tx_call = ?1 ORDER BY datetime ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![call], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for (sequence_index, row) in rows.enumerate() {
            let (id, datetime, tx_county) = row?;
            out.push(QsoRecord {
                timestamp: parse_log_datetime(&datetime)?,
                tx_county,
                sequence_index,
                qso_id: id as QsoId,
            });
        }
        Ok(out)
    }
}

impl PeriodSink for SqliteLog {
    fn write_periods(&mut self, call: &str, periods: &[CountyLinePeriod]) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM county_line_periods WHERE tx_call = ?1", params![call])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO county_line_periods(
                    tx_call, period_no, start_time, end_time, county_a, county_b,
                    qso_count, alternations, start_idx, end_idx)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (period_no, p) in periods.iter().enumerate() {
                stmt.execute(params![
                    call,
                    period_no as i64 + 1,
                    p.start_time.format(LOG_DATETIME_FORMAT).to_string(),
                    p.end_time.format(LOG_DATETIME_FORMAT).to_string(),
                    p.counties[0],
                    p.counties[1],
                    p.qso_count as i64,
                    p.alternations as i64,
                    p.start_idx as i64,
                    p.end_idx as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

/// Parses a log `datetime` column value.
pub fn parse_log_datetime(value: &str) -> PersistResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LOG_DATETIME_FORMAT).map_err(|source| {
        PersistError::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}
