//! In-memory transport for testing and development
//!
//! Behaves like a small backend: applies filter criteria and pagination
//! locally, assigns ids and timestamps on create, and can simulate failures
//! and latency so ordering properties are deterministically testable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::core::error::{NotFoundError, TransportError, ValidationError, VistaError};
use crate::core::filter::{Filter, FilterValue};
use crate::core::page::{PageMeta, Paged};
use crate::core::resource::Resource;
use crate::core::stats::{CollectionStats, ResourceStats};
use crate::transport::Transport;

/// In-memory transport implementation
///
/// Useful for tests and development. Uses RwLock for thread-safe access;
/// records keep insertion order so listings are stable.
pub struct InMemoryTransport<T: Resource> {
    records: Arc<RwLock<IndexMap<Uuid, T>>>,
    failure: Arc<RwLock<Option<(u16, String)>>>,
    latency: Arc<RwLock<Option<Duration>>>,
    list_calls: Arc<AtomicUsize>,
    serve_stats: bool,
}

impl<T: Resource> Clone for InMemoryTransport<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            failure: self.failure.clone(),
            latency: self.latency.clone(),
            list_calls: self.list_calls.clone(),
            serve_stats: self.serve_stats,
        }
    }
}

impl<T: Resource> InMemoryTransport<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
            failure: Arc::new(RwLock::new(None)),
            latency: Arc::new(RwLock::new(None)),
            list_calls: Arc::new(AtomicUsize::new(0)),
            serve_stats: false,
        }
    }

    /// Create a transport pre-populated with records
    pub fn seeded(items: Vec<T>) -> Self {
        let transport = Self::new();
        {
            let mut records = transport.records.write().expect("fresh lock");
            for item in items {
                records.insert(item.id(), item);
            }
        }
        transport
    }

    /// Enable the aggregate stats endpoint
    pub fn with_stats_endpoint(mut self) -> Self {
        self.serve_stats = true;
        self
    }

    /// Make every subsequent request fail with the given status until
    /// [`clear_failure`](Self::clear_failure) is called
    pub fn set_failure(&self, status: u16, message: &str) {
        *self.failure.write().unwrap_or_else(|e| e.into_inner()) =
            Some((status, message.to_string()));
    }

    pub fn clear_failure(&self) {
        *self.failure.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Delay every subsequent request, simulating a slow network
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write().unwrap_or_else(|e| e.into_inner()) = Some(latency);
    }

    pub fn clear_latency(&self) {
        *self.latency.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Number of `list` calls served so far (including failed ones)
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let latency = *self.latency.read().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_failure(&self) -> Result<(), VistaError> {
        let failure = self.failure.read().unwrap_or_else(|e| e.into_inner());
        match &*failure {
            Some((status, message)) => {
                Err(TransportError::status(*status, message.clone()).into())
            }
            None => Ok(()),
        }
    }

    fn read_all(&self) -> Result<Vec<T>, VistaError> {
        let records = self
            .records
            .read()
            .map_err(|e| VistaError::Internal(format!("failed to acquire read lock: {e}")))?;
        Ok(records.values().cloned().collect())
    }

    fn filtered(&self, filter: &Filter) -> Result<Vec<T>, VistaError> {
        filter.query_pairs()?; // reject blank keys before serving anything
        let mut items = self.read_all()?;
        items.retain(|item| {
            let value = match serde_json::to_value(item) {
                Ok(value) => value,
                Err(_) => return false,
            };
            filter
                .criteria()
                .all(|(key, criterion)| criterion.is_blank() || field_matches(&value, key, criterion))
        });
        Ok(items)
    }
}

impl<T: Resource> Default for InMemoryTransport<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn field_matches(record: &Value, key: &str, criterion: &FilterValue) -> bool {
    let Some(field) = record.get(key) else {
        return false;
    };
    match criterion {
        FilterValue::String(s) => field.as_str() == Some(s.as_str()),
        FilterValue::Integer(i) => field.as_i64() == Some(*i),
        FilterValue::Float(v) => field.as_f64() == Some(*v),
        FilterValue::Boolean(b) => field.as_bool() == Some(*b),
        FilterValue::DateRange { from, to } => field
            .as_str()
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
            .is_some_and(|date| date >= *from && date <= *to),
    }
}

#[async_trait]
impl<T: Resource> Transport<T> for InMemoryTransport<T> {
    async fn list(&self, filter: &Filter) -> Result<Paged<T>, VistaError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check_failure()?;

        let filtered = self.filtered(filter)?;
        let total_items = filtered.len();
        let items_per_page = filter.per_page().max(1);
        let total_pages = if total_items == 0 {
            0
        } else {
            total_items.div_ceil(items_per_page)
        };
        // The server clamps out-of-range page requests.
        let current_page = filter.page().clamp(1, total_pages.max(1));
        let items = filtered
            .into_iter()
            .skip((current_page - 1) * items_per_page)
            .take(items_per_page)
            .collect();

        Ok(Paged {
            items,
            meta: PageMeta {
                current_page,
                total_pages,
                total_items,
                items_per_page,
            },
        })
    }

    async fn get(&self, id: &Uuid) -> Result<T, VistaError> {
        self.pause().await;
        self.check_failure()?;
        let records = self
            .records
            .read()
            .map_err(|e| VistaError::Internal(format!("failed to acquire read lock: {e}")))?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| NotFoundError::new(T::resource_name_singular(), *id).into())
    }

    async fn create(&self, data: &Value) -> Result<T, VistaError> {
        self.pause().await;
        self.check_failure()?;

        let mut object = data
            .as_object()
            .cloned()
            .ok_or(ValidationError::PayloadNotObject {
                operation: "create",
            })?;
        let id = Uuid::new_v4();
        let now = Utc::now();
        object.insert("id".to_string(), json!(id));
        object.entry("created_at").or_insert_with(|| json!(now));
        object.entry("updated_at").or_insert_with(|| json!(now));

        let record: T =
            serde_json::from_value(Value::Object(object)).map_err(|e| ValidationError::Payload {
                operation: "create",
                message: e.to_string(),
            })?;

        let mut records = self
            .records
            .write()
            .map_err(|e| VistaError::Internal(format!("failed to acquire write lock: {e}")))?;
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: &Uuid, patch: &Value) -> Result<T, VistaError> {
        self.pause().await;
        self.check_failure()?;

        let patch_object = patch
            .as_object()
            .ok_or(ValidationError::PayloadNotObject {
                operation: "update",
            })?;

        let mut records = self
            .records
            .write()
            .map_err(|e| VistaError::Internal(format!("failed to acquire write lock: {e}")))?;
        let existing = records
            .get(id)
            .ok_or_else(|| NotFoundError::new(T::resource_name_singular(), *id))?;

        let mut object = serde_json::to_value(existing)
            .map_err(|e| VistaError::Internal(e.to_string()))?
            .as_object()
            .cloned()
            .ok_or_else(|| VistaError::Internal("record did not serialize to an object".into()))?;
        for (key, value) in patch_object {
            object.insert(key.clone(), value.clone());
        }
        object.insert("updated_at".to_string(), json!(Utc::now()));

        let updated: T =
            serde_json::from_value(Value::Object(object)).map_err(|e| ValidationError::Payload {
                operation: "update",
                message: e.to_string(),
            })?;
        records.insert(*id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), VistaError> {
        self.pause().await;
        self.check_failure()?;
        let mut records = self
            .records
            .write()
            .map_err(|e| VistaError::Internal(format!("failed to acquire write lock: {e}")))?;
        records
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| NotFoundError::new(T::resource_name_singular(), *id).into())
    }

    async fn stats(&self, filter: &Filter) -> Result<Option<ResourceStats>, VistaError> {
        if !self.serve_stats {
            return Ok(None);
        }
        self.check_failure()?;
        // Aggregates cover the whole filtered collection, not just one page.
        let filtered = self.filtered(filter)?;
        Ok(Some(
            CollectionStats::approximate_from(&filtered).aggregate,
        ))
    }
}
