#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use unloading_api::{
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    events::{Event, EventSender},
    services::unloading::{NewStage, NewUnloading, StockReadings, UnloadingService},
    AppState,
};
use uuid::Uuid;

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps the in-memory database alive for the
/// lifetime of the pool.
pub async fn memory_pool() -> Arc<DbPool> {
    let pool = db::establish_connection_with_config(&DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    })
    .await
    .expect("failed to open sqlite database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    Arc::new(pool)
}

/// Service under test plus the receiving end of its event channel.
pub struct TestService {
    pub service: UnloadingService,
    pub events: mpsc::Receiver<Event>,
    pub pool: Arc<DbPool>,
}

impl TestService {
    pub async fn new() -> Self {
        let pool = memory_pool().await;
        let (tx, rx) = mpsc::channel(256);
        let service = UnloadingService::new(pool.clone(), Arc::new(EventSender::new(tx)));
        Self {
            service,
            events: rx,
            pool,
        }
    }

    /// Everything emitted so far, without waiting.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut seen = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            seen.push(event);
        }
        seen
    }
}

/// Helper harness for driving the HTTP router against an in-memory database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = memory_pool().await;
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let (tx, rx) = mpsc::channel(256);
        let event_task = tokio::spawn(unloading_api::events::process_events(rx));
        let state = AppState::new(pool, cfg, Arc::new(EventSender::new(tx)));
        let router = unloading_api::app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, day).expect("valid date")
}

pub fn new_unloading(total: Decimal, discharged: Option<Decimal>) -> NewUnloading {
    NewUnloading {
        freight_id: Uuid::new_v4(),
        load_date: date(20),
        unload_date: date(21),
        total_volume: total,
        discharged_volume: discharged,
        readings: StockReadings::default(),
        refuel_during_unload: None,
        temperature: None,
        density: None,
        notes: None,
    }
}

pub fn new_stage(day: u32, volume: Decimal) -> NewStage {
    NewStage {
        stage_date: date(day),
        stage_volume: Some(volume),
        readings: StockReadings::default(),
        refuel_during_stage: None,
        notes: None,
    }
}
