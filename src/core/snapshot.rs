//! Collection snapshot and its pure transition function
//!
//! Every state change flows through [`reduce`], a pure function over a
//! tagged event type. The controller owns the event loop; this module owns
//! the semantics, which keeps the stale-items-on-error policy and the phase
//! machine directly testable without any transport.

use crate::core::page::PageMeta;
use crate::core::resource::Resource;
use crate::core::stats::{CollectionStats, ResourceStats};

/// Lifecycle phase of a collection snapshot
///
/// `Idle → Loading → {Ready, Failed}`; any filter or page change and any
/// refresh re-enters `Loading`. There is no terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, nothing fetched yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// Last fetch succeeded
    Ready,
    /// Last fetch failed; prior items stay visible
    Failed,
}

/// The complete current view-state of a fetched, filtered, paginated list.
///
/// `error` and `items` are not mutually exclusive: stale items remain visible
/// alongside an error from a later failed refresh. That is deliberate — a
/// failed refresh should not blank a list the user is looking at.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    pub page: PageMeta,
    pub phase: Phase,
    pub error: Option<String>,
    pub stats: CollectionStats,
}

impl<T> CollectionSnapshot<T> {
    /// The snapshot a controller starts from, before its first fetch
    pub fn initial(items_per_page: usize) -> Self {
        Self {
            items: Vec::new(),
            page: PageMeta::initial(items_per_page),
            phase: Phase::Idle,
            error: None,
            stats: CollectionStats::empty(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn has_failed(&self) -> bool {
        self.phase == Phase::Failed
    }
}

/// A state-changing event, applied through [`reduce`]
#[derive(Debug, Clone)]
pub enum SnapshotEvent<T> {
    /// A fetch was dispatched
    FetchStarted,
    /// A fetch settled successfully with a page of records
    FetchSettled { items: Vec<T>, meta: PageMeta },
    /// A fetch settled with a failure
    FetchFailed { message: String },
    /// A mutation failed before any reload was triggered
    MutationFailed { message: String },
    /// The backend stats endpoint reported authoritative aggregates
    ServerStats { stats: ResourceStats },
}

/// Pure transition function producing the next snapshot
pub fn reduce<T: Resource>(
    current: &CollectionSnapshot<T>,
    event: SnapshotEvent<T>,
) -> CollectionSnapshot<T> {
    match event {
        SnapshotEvent::FetchStarted => CollectionSnapshot {
            phase: Phase::Loading,
            ..current.clone()
        },
        SnapshotEvent::FetchSettled { items, meta } => CollectionSnapshot {
            stats: CollectionStats::approximate_from(&items),
            items,
            page: meta,
            phase: Phase::Ready,
            error: None,
        },
        SnapshotEvent::FetchFailed { message } => CollectionSnapshot {
            phase: Phase::Failed,
            error: Some(message),
            ..current.clone()
        },
        SnapshotEvent::MutationFailed { message } => CollectionSnapshot {
            error: Some(message),
            ..current.clone()
        },
        SnapshotEvent::ServerStats { stats } => CollectionSnapshot {
            stats: CollectionStats::authoritative(stats),
            ..current.clone()
        },
    }
}
