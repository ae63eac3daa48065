//! Read-only access to the factory production database.
//!
//! The chart service only sees the [`ProductionSource`] trait; the MySQL
//! implementation lives in [`mysql`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod mysql;

pub use mysql::MySqlProductionSource;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("production database unavailable: {0}")]
    Unavailable(String),

    #[error("production query failed: {0}")]
    Query(String),

    #[error("production query timed out after {0}s")]
    Timeout(u64),
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => SourceError::Unavailable(err.to_string()),
            other => SourceError::Query(other.to_string()),
        }
    }
}

/// One logged production interval joined with its standard-lot reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEvent {
    pub machine: String,
    /// Mold name from the standard-lot table, when the join matched
    pub machine_name: Option<String>,
    pub process: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub total: f64,
    pub ok: f64,
    pub ng: f64,
    pub target_per_hour: Option<f64>,
    pub item_name: Option<String>,
}

impl ProductionEvent {
    pub fn start_secs(&self) -> u32 {
        self.start.num_seconds_from_midnight()
    }

    /// End in seconds from the start of the event's day; an end before the
    /// start means the event ran past midnight.
    pub fn end_secs(&self) -> u32 {
        let end = self.end.num_seconds_from_midnight();
        if end < self.start_secs() {
            end + SECONDS_PER_DAY
        } else {
            end
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.end_secs() - self.start_secs()
    }

    /// Expected output for the event: hours run times the hourly target.
    /// Missing standard-lot data contributes nothing.
    pub fn target(&self) -> f64 {
        let hours = f64::from(self.duration_secs()) / 3600.0;
        hours * self.target_per_hour.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub process: Option<String>,
    pub machine: Option<String>,
}

impl EventFilter {
    pub fn process(process: impl Into<String>) -> Self {
        Self { process: Some(process.into()), machine: None }
    }

    pub fn machine(machine: impl Into<String>) -> Self {
        Self { process: None, machine: Some(machine.into()) }
    }

    pub fn matches(&self, event: &ProductionEvent) -> bool {
        self.process
            .as_deref()
            .map_or(true, |p| normalize_process(&event.process) == normalize_process(p))
            && self.machine.as_deref().map_or(true, |m| event.machine.trim() == m.trim())
    }
}

/// Process names are compared trimmed and uppercased everywhere.
pub fn normalize_process(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Trimmed, non-empty machine codes in ascending order
pub fn distinct_machines(events: &[ProductionEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.machine.trim())
        .filter(|m| !m.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[async_trait]
pub trait ProductionSource: Send + Sync {
    /// Fails fast with [`SourceError::Unavailable`] when no query can run.
    async fn ensure_available(&self) -> Result<(), SourceError>;

    async fn events_on(&self, date: NaiveDate, filter: &EventFilter) -> Result<Vec<ProductionEvent>, SourceError>;

    /// Machines with at least one event on `date`, sorted.
    async fn machines_on(&self, date: NaiveDate) -> Result<Vec<String>, SourceError> {
        let events = self.events_on(date, &EventFilter::default()).await?;
        Ok(distinct_machines(&events))
    }
}
