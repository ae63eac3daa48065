#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Response;

use besq_chart_api::auth::{Claims, JwtKeys, Role};
use besq_chart_api::config::{self, AppConfig};
use besq_chart_api::database::{seed_users, DatabaseManager, UserRepository};
use besq_chart_api::production::{EventFilter, ProductionEvent, ProductionSource, SourceError};
use besq_chart_api::AppState;

pub const SECRET: &[u8] = b"integration-test-secret";
pub const PASSWORD: &str = "123456";

pub fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
}

/// In-memory stand-in for the factory database
pub struct FixtureSource {
    available: bool,
    events: Vec<(NaiveDate, ProductionEvent)>,
    delay: Option<Duration>,
}

impl FixtureSource {
    pub fn offline() -> Self {
        Self { available: false, events: Vec::new(), delay: None }
    }

    pub fn with_events(events: Vec<(NaiveDate, ProductionEvent)>) -> Self {
        Self { available: true, events, delay: None }
    }

    /// Every query sleeps for `delay` before answering.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// A day on the pressing and mixing lines:
    /// - M-101 (Mold Alpha, 120/h) 09:45-10:15, 100 pcs, plus a zero-length entry at 11:00
    /// - M-102 (no standard lot) 08:00-09:00, 50 pcs
    /// - MX-1 (80/h) 13:00-15:00 on MIXING, 200 pcs
    pub fn factory_day() -> Self {
        let day = fixture_date();
        Self::with_events(vec![
            (day, event("M-101", Some("Mold Alpha"), "PRESSING", (9, 45), (10, 15), (100.0, 90.0, 10.0), Some(120.0), Some("PAD-A"))),
            (day, event("M-101", Some("Mold Alpha"), "PRESSING", (11, 0), (11, 0), (5.0, 5.0, 0.0), Some(120.0), Some("PAD-A"))),
            (day, event("M-102", None, "PRESSING", (8, 0), (9, 0), (50.0, 48.0, 2.0), None, None)),
            (day, event("MX-1", None, "MIXING", (13, 0), (15, 0), (200.0, 200.0, 0.0), Some(80.0), Some("COMPOUND"))),
        ])
    }
}

#[allow(clippy::too_many_arguments)]
pub fn event(
    machine: &str,
    machine_name: Option<&str>,
    process: &str,
    start: (u32, u32),
    end: (u32, u32),
    (total, ok, ng): (f64, f64, f64),
    target_per_hour: Option<f64>,
    item_name: Option<&str>,
) -> ProductionEvent {
    ProductionEvent {
        machine: machine.to_string(),
        machine_name: machine_name.map(str::to_string),
        process: process.to_string(),
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        total,
        ok,
        ng,
        target_per_hour,
        item_name: item_name.map(str::to_string),
    }
}

#[async_trait]
impl ProductionSource for FixtureSource {
    async fn ensure_available(&self) -> Result<(), SourceError> {
        if self.available {
            Ok(())
        } else {
            Err(SourceError::Unavailable("fixture offline".to_string()))
        }
    }

    async fn events_on(&self, date: NaiveDate, filter: &EventFilter) -> Result<Vec<ProductionEvent>, SourceError> {
        self.ensure_available().await?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .events
            .iter()
            .filter(|(d, e)| *d == date && filter.matches(e))
            .map(|(_, e)| e.clone())
            .collect())
    }
}

pub struct TestServer {
    pub base_url: String,
    pub keys: Arc<JwtKeys>,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the real router on a free port with a freshly seeded credential store.
    pub async fn start(source: FixtureSource) -> Result<Self> {
        Self::start_with(source, config::config()).await
    }

    pub async fn start_with(source: FixtureSource, config: &AppConfig) -> Result<Self> {
        let db_path = std::env::temp_dir().join(format!("besq-it-{}.db", uuid::Uuid::new_v4().simple()));
        let pool = DatabaseManager::credentials_pool(&format!("sqlite://{}", db_path.display()), 2).await?;
        let users = UserRepository::new(pool);
        seed_users(&users, PASSWORD).await?;

        let keys = Arc::new(JwtKeys::from_secret(SECRET));
        let state = AppState::new(users, Arc::new(source), keys.clone());
        let router = besq_chart_api::app(state, config);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            keys,
            client: reqwest::Client::new(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    /// Sign a token directly, bypassing login.
    pub fn token_for(&self, role: Role) -> String {
        self.keys
            .sign(&Claims::new(1, role, Some("PRESSING".to_string()), format!("{}-user", role)))
            .expect("sign token")
    }

    pub async fn get(&self, path_and_query: &str, token: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path_and_query));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }
}
