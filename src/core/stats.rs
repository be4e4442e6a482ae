//! Derived collection statistics
//!
//! Client-side aggregates are computed from the loaded page only, which is a
//! subset of the full collection under pagination. They are therefore tagged
//! as an approximation; when the backend exposes a stats endpoint, the server
//! figures are authoritative and replace them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::resource::Resource;

/// Aggregate figures for a resource collection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStats {
    /// Sum of the records' monetary values
    #[serde(default)]
    pub total_value: f64,

    /// Record count per status
    #[serde(default)]
    pub count_by_status: HashMap<String, u64>,
}

impl ResourceStats {
    pub fn count_for(&self, status: &str) -> u64 {
        self.count_by_status.get(status).copied().unwrap_or(0)
    }
}

/// Where the aggregate figures came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    /// Computed from the loaded page only — a subset of the collection
    ClientApproximation,
    /// Reported by the backend stats endpoint — covers the whole collection
    Server,
}

/// Aggregate figures plus their provenance
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub aggregate: ResourceStats,
    pub source: StatsSource,
}

impl CollectionStats {
    pub fn empty() -> Self {
        Self {
            aggregate: ResourceStats::default(),
            source: StatsSource::ClientApproximation,
        }
    }

    /// Compute page-local aggregates from the loaded items
    pub fn approximate_from<T: Resource>(items: &[T]) -> Self {
        let mut aggregate = ResourceStats::default();
        for item in items {
            if let Some(value) = item.value() {
                aggregate.total_value += value;
            }
            *aggregate
                .count_by_status
                .entry(item.status().to_string())
                .or_insert(0) += 1;
        }
        Self {
            aggregate,
            source: StatsSource::ClientApproximation,
        }
    }

    /// Wrap server-reported aggregates
    pub fn authoritative(aggregate: ResourceStats) -> Self {
        Self {
            aggregate,
            source: StatsSource::Server,
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.source == StatsSource::Server
    }
}

impl Default for CollectionStats {
    fn default() -> Self {
        Self::empty()
    }
}
