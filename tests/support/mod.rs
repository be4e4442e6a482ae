//! Shared test harness: a cleaning-service booking resource plus a manually
//! gated transport for deterministic ordering tests.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod support;
//! use support::*;
//! ```

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use vista::prelude::*;

// ---------------------------------------------------------------------------
// Booking — the canonical test resource
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Resource for Booking {
    fn resource_name() -> &'static str {
        "bookings"
    }

    fn resource_name_singular() -> &'static str {
        "booking"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn value(&self) -> Option<f64> {
        Some(self.amount)
    }
}

pub fn booking(client_name: &str, status: &str, amount: f64) -> Booking {
    let now = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        client_name: client_name.to_string(),
        status: status.to_string(),
        amount,
        created_at: now,
        updated_at: now,
    }
}

/// Six bookings, two of them pending
pub fn seed_bookings() -> Vec<Booking> {
    vec![
        booking("Ana Souza", "pending", 120.0),
        booking("Bruno Lima", "completed", 200.0),
        booking("Carla Dias", "pending", 80.0),
        booking("Diego Alves", "cancelled", 150.0),
        booking("Elisa Prado", "completed", 90.0),
        booking("Fabio Rocha", "confirmed", 60.0),
    ]
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// ManualTransport — list calls block until the test resolves them, making
// overlapping-fetch ordering fully deterministic
// ---------------------------------------------------------------------------

type PendingList = (Filter, oneshot::Sender<Result<Paged<Booking>, VistaError>>);

#[derive(Clone, Default)]
pub struct ManualTransport {
    pending: Arc<Mutex<Vec<PendingList>>>,
}

impl ManualTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until at least `count` list calls are parked
    pub async fn wait_for_pending(&self, count: usize) {
        loop {
            if self.pending.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// The filter a parked call was issued with
    pub fn pending_filter(&self, index: usize) -> Filter {
        self.pending.lock().unwrap()[index].0.clone()
    }

    /// Settle a parked call, removing it from the queue
    pub fn resolve(&self, index: usize, response: Result<Paged<Booking>, VistaError>) {
        let (_, tx) = self.pending.lock().unwrap().remove(index);
        let _ = tx.send(response);
    }
}

#[async_trait]
impl Transport<Booking> for ManualTransport {
    async fn list(&self, filter: &Filter) -> Result<Paged<Booking>, VistaError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((filter.clone(), tx));
        rx.await
            .unwrap_or_else(|_| Err(VistaError::Internal("response channel dropped".into())))
    }

    async fn get(&self, id: &Uuid) -> Result<Booking, VistaError> {
        Err(NotFoundError::new("booking", *id).into())
    }

    async fn create(&self, _data: &Value) -> Result<Booking, VistaError> {
        Err(VistaError::Internal("not supported by ManualTransport".into()))
    }

    async fn update(&self, _id: &Uuid, _patch: &Value) -> Result<Booking, VistaError> {
        Err(VistaError::Internal("not supported by ManualTransport".into()))
    }

    async fn delete(&self, _id: &Uuid) -> Result<(), VistaError> {
        Err(VistaError::Internal("not supported by ManualTransport".into()))
    }
}
