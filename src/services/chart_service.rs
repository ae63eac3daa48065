use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::production::{normalize_process, EventFilter, ProductionEvent, ProductionSource, SourceError};
use crate::services::allocation::bucket_by_hour;

/// Departments the plant overview always reports, in display order.
pub const DEPARTMENTS: [&str; 4] = ["MIXING", "CUTTING", "PRESSING", "FINISHING"];

/// One bar of a chart: target vs. actual for a department, machine or hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub target: f64,
    pub actual: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_ok: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_ng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
}

impl ChartPoint {
    fn new(label: impl Into<String>, target: f64, actual: f64) -> Self {
        Self {
            label: label.into(),
            target: round2(target),
            actual: round2(actual),
            actual_ok: None,
            actual_ng: None,
            extra_info: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Granularity {
    /// Per department for the whole plant
    Plant,
    /// Per machine, optionally within one process
    Process { process: Option<String> },
    /// Per hour for one machine
    Hourly { machine: String },
}

#[derive(Clone)]
pub struct ChartService {
    source: Arc<dyn ProductionSource>,
}

impl ChartService {
    pub fn new(source: Arc<dyn ProductionSource>) -> Self {
        Self { source }
    }

    pub async fn ensure_available(&self) -> Result<(), SourceError> {
        self.source.ensure_available().await
    }

    pub async fn aggregate(&self, granularity: &Granularity, date: NaiveDate) -> Result<Vec<ChartPoint>, SourceError> {
        self.source.ensure_available().await?;

        let points = match granularity {
            Granularity::Plant => {
                let events = self.source.events_on(date, &EventFilter::default()).await?;
                plant_overview(&events)
            }
            Granularity::Process { process } => {
                let filter = EventFilter { process: process.clone(), machine: None };
                let events = self.source.events_on(date, &filter).await?;
                process_view(&events)
            }
            Granularity::Hourly { machine } => {
                let events = self.source.events_on(date, &EventFilter::machine(machine.clone())).await?;
                hourly_detail(&events)
            }
        };
        Ok(points)
    }

    /// Machines with at least one event on `date`
    pub async fn machine_list(&self, date: NaiveDate) -> Result<Vec<String>, SourceError> {
        self.source.ensure_available().await?;
        self.source.machines_on(date).await
    }
}

pub fn plant_overview(events: &[ProductionEvent]) -> Vec<ChartPoint> {
    let mut totals: BTreeMap<&str, (f64, f64)> = DEPARTMENTS.iter().map(|d| (*d, (0.0, 0.0))).collect();

    for event in events {
        let department = normalize_process(&event.process);
        if let Some((target, actual)) = totals.get_mut(department.as_str()) {
            *target += event.target();
            *actual += event.total;
        }
    }

    DEPARTMENTS
        .iter()
        .map(|d| {
            let (target, actual) = totals[d];
            ChartPoint::new(*d, target, actual)
        })
        .collect()
}

pub fn process_view(events: &[ProductionEvent]) -> Vec<ChartPoint> {
    #[derive(Default)]
    struct Machine<'a> {
        name: Option<&'a str>,
        target: f64,
        actual: f64,
        ng: f64,
    }

    let mut machines: BTreeMap<&str, Machine> = BTreeMap::new();
    for event in events {
        let code = event.machine.trim();
        if code.is_empty() {
            continue;
        }
        let entry = machines.entry(code).or_default();
        if entry.name.is_none() {
            entry.name = event.machine_name.as_deref();
        }
        entry.target += event.target();
        entry.actual += event.total;
        entry.ng += event.ng;
    }

    let mut points: Vec<ChartPoint> = machines
        .into_iter()
        .map(|(code, m)| ChartPoint {
            actual_ng: Some(round2(m.ng)),
            ..ChartPoint::new(m.name.unwrap_or(code), m.target, m.actual)
        })
        .collect();
    points.sort_by(|a, b| a.label.cmp(&b.label));
    points
}

pub fn hourly_detail(events: &[ProductionEvent]) -> Vec<ChartPoint> {
    bucket_by_hour(events)
        .into_iter()
        .map(|bucket| ChartPoint {
            actual_ok: Some(round2(bucket.ok)),
            actual_ng: Some(round2(bucket.ng)),
            extra_info: Some(bucket.item_name.clone().unwrap_or_else(|| "-".to_string())),
            ..ChartPoint::new(bucket.label(), bucket.target, bucket.total)
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
