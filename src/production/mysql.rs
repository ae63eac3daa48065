use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use super::{normalize_process, EventFilter, ProductionEvent, ProductionSource, SourceError};
use crate::database::{DatabaseError, DatabaseManager};

#[derive(Debug, FromRow)]
struct EventRow {
    machine: String,
    machine_name: Option<String>,
    process: Option<String>,
    start_time: NaiveTime,
    end_time: NaiveTime,
    total: f64,
    ok: f64,
    ng: f64,
    target_per_hour: Option<f64>,
    item_name: Option<String>,
}

impl From<EventRow> for ProductionEvent {
    fn from(row: EventRow) -> Self {
        Self {
            machine: row.machine,
            machine_name: row.machine_name.filter(|n| !n.trim().is_empty()),
            process: row.process.unwrap_or_default(),
            start: row.start_time,
            end: row.end_time,
            total: row.total,
            ok: row.ok,
            ng: row.ng,
            target_per_hour: row.target_per_hour,
            item_name: row.item_name.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Production events from the factory MySQL database: the event table
/// LEFT JOINed with the standard-lot table on mold code.
pub struct MySqlProductionSource {
    pool: Option<MySqlPool>,
    event_table: String,
    standard_lot_table: String,
    query_timeout: Duration,
}

impl MySqlProductionSource {
    /// `pool` is `None` when the startup connection failed.
    pub fn new(
        pool: Option<MySqlPool>,
        event_table: &str,
        standard_lot_table: &str,
        query_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            pool,
            event_table: DatabaseManager::quote_identifier(event_table)?,
            standard_lot_table: DatabaseManager::quote_identifier(standard_lot_table)?,
            query_timeout,
        })
    }

    fn pool(&self) -> Result<&MySqlPool, SourceError> {
        match &self.pool {
            Some(pool) if !pool.is_closed() => Ok(pool),
            Some(_) => Err(SourceError::Unavailable("connection pool closed".to_string())),
            None => Err(SourceError::Unavailable("not connected".to_string())),
        }
    }

    fn events_query(&self, date: NaiveDate, filter: &EventFilter) -> QueryBuilder<'static, MySql> {
        // COLLATE keeps the join working when the two tables disagree on collation
        let mut query = QueryBuilder::new(format!(
            r#"
            SELECT
                TRIM(COALESCE(t.moldcode, '')) AS machine,
                s.moldName AS machine_name,
                COALESCE(t.proses, '') AS process,
                t.jam_mulai AS start_time,
                t.jam_selesai AS end_time,
                CAST(COALESCE(t.Total, 0) AS DOUBLE) AS total,
                CAST(COALESCE(t.OK, 0) AS DOUBLE) AS ok,
                CAST(COALESCE(t.NG, 0) AS DOUBLE) AS ng,
                CAST(s.tgtQtyPJam AS DOUBLE) AS target_per_hour,
                s.itemName AS item_name
            FROM {} t
            LEFT JOIN {} s ON t.moldcode = s.moldCode COLLATE utf8mb4_unicode_ci
            WHERE "#,
            self.event_table, self.standard_lot_table
        ));
        push_day(&mut query, date);
        // Intervals still running have no end time yet
        query.push(" AND t.jam_mulai IS NOT NULL AND t.jam_selesai IS NOT NULL");

        if let Some(process) = &filter.process {
            query.push(" AND UPPER(TRIM(t.proses)) = ");
            query.push_bind(normalize_process(process));
        }
        if let Some(machine) = &filter.machine {
            query.push(" AND TRIM(t.moldcode) = ");
            query.push_bind(machine.trim().to_string());
        }
        query.push(" ORDER BY t.moldcode, t.jam_mulai");
        query
    }

    fn machines_query(&self, date: NaiveDate) -> QueryBuilder<'static, MySql> {
        let mut query = QueryBuilder::new(format!(
            "SELECT DISTINCT TRIM(t.moldcode) AS machine FROM {} t WHERE ",
            self.event_table
        ));
        push_day(&mut query, date);
        query.push(" AND t.moldcode IS NOT NULL AND TRIM(t.moldcode) <> '' ORDER BY machine");
        query
    }

    async fn timed<T, F>(&self, fut: F) -> Result<T, SourceError>
    where
        F: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| SourceError::Timeout(self.query_timeout.as_secs()))?
            .map_err(SourceError::from)
    }
}

fn push_day(query: &mut QueryBuilder<'static, MySql>, date: NaiveDate) {
    query.push("t.thn = ");
    query.push_bind(date.year());
    query.push(" AND t.bln = ");
    query.push_bind(date.month());
    query.push(" AND t.tgl = ");
    query.push_bind(date.day());
}

#[async_trait]
impl ProductionSource for MySqlProductionSource {
    async fn ensure_available(&self) -> Result<(), SourceError> {
        self.pool().map(|_| ())
    }

    async fn events_on(&self, date: NaiveDate, filter: &EventFilter) -> Result<Vec<ProductionEvent>, SourceError> {
        let pool = self.pool()?;
        let mut query = self.events_query(date, filter);
        let rows = self.timed(query.build_query_as::<EventRow>().fetch_all(pool)).await?;

        debug!("Loaded {} production events for {} ({:?})", rows.len(), date, filter);
        Ok(rows.into_iter().map(ProductionEvent::from).collect())
    }

    async fn machines_on(&self, date: NaiveDate) -> Result<Vec<String>, SourceError> {
        let pool = self.pool()?;
        let mut query = self.machines_query(date);
        let machines = self.timed(query.build_query_scalar::<String>().fetch_all(pool)).await?;

        debug!("{} machines active on {}", machines.len(), date);
        Ok(machines)
    }
}
