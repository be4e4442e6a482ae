//! Transport adapters translating domain calls to HTTP requests and back
//!
//! A transport owns no state: exactly one network call per invocation, no
//! retries, no caching. Consistency after mutations is re-established by the
//! controller's full reload, never by merging partial server state here.

pub mod http;
pub mod in_memory;

pub use http::HttpTransport;
pub use in_memory::InMemoryTransport;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::core::error::VistaError;
use crate::core::filter::Filter;
use crate::core::page::Paged;
use crate::core::resource::Resource;
use crate::core::stats::ResourceStats;

/// Boundary trait between the collection controller and a remote resource
///
/// Implementations convert a [`Filter`] into a request and the response body
/// into typed records. Mutation payloads are JSON partials — the server owns
/// id assignment and timestamps.
#[async_trait]
pub trait Transport<T: Resource>: Send + Sync {
    /// Fetch one page of the collection matching the filter
    async fn list(&self, filter: &Filter) -> Result<Paged<T>, VistaError>;

    /// Fetch a single record, failing with `NotFound` when absent
    async fn get(&self, id: &Uuid) -> Result<T, VistaError>;

    /// Create a record from a JSON object without id or timestamps
    async fn create(&self, data: &Value) -> Result<T, VistaError>;

    /// Apply a partial JSON update to an existing record
    async fn update(&self, id: &Uuid, patch: &Value) -> Result<T, VistaError>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<(), VistaError>;

    /// Fetch authoritative aggregates for the filtered collection.
    ///
    /// Returns `Ok(None)` when the backend does not expose a stats endpoint;
    /// the controller then falls back to its page-local approximation.
    async fn stats(&self, _filter: &Filter) -> Result<Option<ResourceStats>, VistaError> {
        Ok(None)
    }
}
