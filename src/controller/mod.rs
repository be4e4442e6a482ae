//! Collection controller: the stateful heart of the view-state pattern
//!
//! A controller mediates between a remote resource and a UI surface. It owns
//! the current [`Filter`], drives fetches through a [`Transport`], and
//! publishes [`CollectionSnapshot`]s over a watch channel for push-based
//! binding.
//!
//! Overlapping fetches follow **last-write-wins**: each dispatch bumps a
//! generation counter, and a result is applied only when its generation still
//! matches at settle time. Superseded results are discarded, never applied
//! out of order. In-flight transport calls are not aborted — ignoring the
//! result is sufficient for correctness.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value, json};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{ValidationError, VistaError};
use crate::core::filter::{Filter, FilterPatch};
use crate::core::resource::Resource;
use crate::core::snapshot::{CollectionSnapshot, SnapshotEvent, reduce};
use crate::transport::Transport;

/// Cloneable handle to one collection's view-state
///
/// All clones share the same snapshot; multiple controllers over different
/// resources are fully independent. Read-path failures (list) never surface
/// as returned errors — they land in the snapshot's `error` field and the
/// `Failed` phase. Mutation failures do both: the typed error is returned to
/// the caller (for immediate feedback, e.g. a toast) and mirrored into the
/// ambient `error` field.
pub struct CollectionController<T: Resource> {
    inner: Arc<Inner<T>>,
}

impl<T: Resource> Clone for CollectionController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<T: Resource> {
    transport: Arc<dyn Transport<T>>,
    state: Mutex<FetchState>,
    tx: watch::Sender<CollectionSnapshot<T>>,
}

struct FetchState {
    filter: Filter,
    generation: u64,
    has_loaded: bool,
}

impl<T: Resource> CollectionController<T> {
    /// Create a controller with an initial filter.
    ///
    /// Nothing is fetched until the first `refresh`, `set_filters` or
    /// `set_page` call; the initial snapshot is `Idle`.
    pub fn new(transport: Arc<dyn Transport<T>>, filter: Filter) -> Self {
        let (tx, _rx) = watch::channel(CollectionSnapshot::initial(filter.per_page()));
        Self {
            inner: Arc::new(Inner {
                transport,
                state: Mutex::new(FetchState {
                    filter,
                    generation: 0,
                    has_loaded: false,
                }),
                tx,
            }),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> CollectionSnapshot<T> {
        self.inner.tx.borrow().clone()
    }

    /// The current filter, including a pending one whose fetch has not
    /// settled yet
    pub fn filter(&self) -> Filter {
        self.lock_state().filter.clone()
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot<T>> {
        self.inner.tx.subscribe()
    }

    /// Snapshot changes as a stream; yields the current snapshot first
    pub fn snapshots(&self) -> WatchStream<CollectionSnapshot<T>> {
        WatchStream::new(self.subscribe())
    }

    /// Merge a partial filter update and re-fetch.
    ///
    /// Any change other than the page number resets the page to 1. The filter
    /// mutation is visible through [`filter`](Self::filter) immediately, before
    /// the fetch settles.
    pub async fn set_filters(&self, patch: FilterPatch) {
        let (generation, filter) = {
            let mut state = self.lock_state();
            if state.filter.apply(&patch) {
                state.filter.set_page(1);
            }
            state.generation += 1;
            self.apply(SnapshotEvent::FetchStarted);
            (state.generation, state.filter.clone())
        };
        self.fetch(generation, filter).await;
    }

    /// Move to another page, preserving all other filter fields.
    ///
    /// A no-op when `page` is 0, or when the page count is known and `page`
    /// exceeds it. Before the first successful fetch any positive page is
    /// accepted and corrected by the server's reported metadata.
    pub async fn set_page(&self, page: usize) {
        if page == 0 {
            return;
        }
        let total_pages = self.inner.tx.borrow().page.total_pages;
        let (generation, filter) = {
            let mut state = self.lock_state();
            if state.has_loaded && page > total_pages.max(1) {
                return;
            }
            state.filter.set_page(page);
            state.generation += 1;
            self.apply(SnapshotEvent::FetchStarted);
            (state.generation, state.filter.clone())
        };
        self.fetch(generation, filter).await;
    }

    /// Re-fetch the current filter unchanged; the recovery path after a
    /// failure
    pub async fn refresh(&self) {
        let (generation, filter) = {
            let mut state = self.lock_state();
            state.generation += 1;
            self.apply(SnapshotEvent::FetchStarted);
            (state.generation, state.filter.clone())
        };
        self.fetch(generation, filter).await;
    }

    /// Create a record, then reload the full collection
    pub async fn create(&self, data: Value) -> Result<T, VistaError> {
        if !data.is_object() {
            return self.mutation_failed(
                ValidationError::PayloadNotObject {
                    operation: "create",
                }
                .into(),
            );
        }
        match self.inner.transport.create(&data).await {
            Ok(created) => {
                self.refresh().await;
                Ok(created)
            }
            Err(e) => self.mutation_failed(e),
        }
    }

    /// Apply a partial update to a record, then reload the full collection
    pub async fn update(&self, id: &Uuid, patch: Value) -> Result<T, VistaError> {
        if !patch.is_object() {
            return self.mutation_failed(
                ValidationError::PayloadNotObject {
                    operation: "update",
                }
                .into(),
            );
        }
        match self.inner.transport.update(id, &patch).await {
            Ok(updated) => {
                self.refresh().await;
                Ok(updated)
            }
            Err(e) => self.mutation_failed(e),
        }
    }

    /// Delete a record, then reload the full collection
    pub async fn delete(&self, id: &Uuid) -> Result<(), VistaError> {
        match self.inner.transport.delete(id).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => self.mutation_failed(e),
        }
    }

    /// Move a record to a new status, optionally carrying side data such as a
    /// refund amount on a cancellation approval
    pub async fn transition(
        &self,
        id: &Uuid,
        status: &str,
        side_data: Option<Value>,
    ) -> Result<T, VistaError> {
        if status.trim().is_empty() {
            return self.mutation_failed(ValidationError::EmptyStatus.into());
        }
        let mut payload = Map::new();
        payload.insert("status".to_string(), json!(status));
        match side_data {
            Some(Value::Object(extra)) => {
                for (key, value) in extra {
                    payload.insert(key, value);
                }
            }
            Some(_) => {
                return self.mutation_failed(
                    ValidationError::PayloadNotObject {
                        operation: "transition",
                    }
                    .into(),
                );
            }
            None => {}
        }
        self.update(id, Value::Object(payload)).await
    }

    // --- internals ---

    fn lock_state(&self) -> MutexGuard<'_, FetchState> {
        // A poisoned lock only means a fetch task panicked mid-update; the
        // state itself is still a valid filter and counter.
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn apply(&self, event: SnapshotEvent<T>) {
        // Read-reduce-write happens under the channel's own lock, so events
        // from concurrent clones cannot interleave with each other.
        self.inner.tx.send_modify(|snapshot| {
            let next = reduce(snapshot, event);
            *snapshot = next;
        });
    }

    fn mutation_failed<R>(&self, error: VistaError) -> Result<R, VistaError> {
        warn!(
            resource = T::resource_name(),
            error = %error,
            "mutation failed"
        );
        self.apply(SnapshotEvent::MutationFailed {
            message: error.to_string(),
        });
        Err(error)
    }

    /// Run a dispatched fetch to completion. `FetchStarted` has already been
    /// applied by the caller, inside the same critical section that bumped
    /// the generation, so a superseded dispatch can never re-enter `Loading`
    /// after a later fetch has settled.
    async fn fetch(&self, generation: u64, filter: Filter) {
        debug!(
            resource = T::resource_name(),
            generation,
            page = filter.page(),
            "dispatching fetch"
        );

        let result = self.inner.transport.list(&filter).await;
        let stats = match &result {
            Ok(_) => match self.inner.transport.stats(&filter).await {
                Ok(stats) => stats,
                Err(e) => {
                    warn!(resource = T::resource_name(), error = %e, "stats fetch failed");
                    None
                }
            },
            Err(_) => None,
        };

        let mut state = self.lock_state();
        if state.generation != generation {
            debug!(
                resource = T::resource_name(),
                generation, "discarding superseded fetch result"
            );
            return;
        }
        match result {
            Ok(paged) => {
                state.has_loaded = true;
                // The server may have clamped an out-of-range page request.
                state.filter.set_page(paged.meta.current_page);
                self.apply(SnapshotEvent::FetchSettled {
                    items: paged.items,
                    meta: paged.meta,
                });
                if let Some(stats) = stats {
                    self.apply(SnapshotEvent::ServerStats { stats });
                }
            }
            Err(e) => {
                warn!(resource = T::resource_name(), error = %e, "fetch failed");
                self.apply(SnapshotEvent::FetchFailed {
                    message: e.to_string(),
                });
            }
        }
    }
}
