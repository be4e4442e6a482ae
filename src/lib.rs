//! # Vista
//!
//! A collection view-state framework for paginated, filterable REST
//! resources: fetch a filtered collection from a remote API, cache it in
//! local view-state, and expose CRUD mutations that keep the cache
//! consistent.
//!
//! ## Features
//!
//! - **Typed transport boundary**: one [`transport::Transport`] trait,
//!   implemented over HTTP (reqwest) and in memory for tests
//! - **Collection controller**: filters, pagination, loading/error phases,
//!   mutation-then-reload, and last-write-wins ordering under overlapping
//!   fetches
//! - **Push-based binding**: snapshots re-offered over a watch channel after
//!   every state change
//! - **Pure formatting**: status, date and currency display mappings with
//!   soft fallbacks
//! - **Scoped sharing**: an explicit controller registry instead of ambient
//!   globals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vista::prelude::*;
//!
//! let config = ClientConfig::from_yaml_file("client.yaml")?;
//! let transport = Arc::new(HttpTransport::<Booking>::new(&config)?);
//! let controller = CollectionController::new(transport, config.initial_filter());
//!
//! controller.refresh().await;
//! controller
//!     .set_filters(FilterPatch::new().set("status", "pending"))
//!     .await;
//!
//! let snapshot = controller.snapshot();
//! for booking in &snapshot.items {
//!     println!("{} [{}]", booking.client_name, status_label(booking.status()));
//! }
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod format;
pub mod registry;
pub mod transport;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core types ===
    pub use crate::core::{
        error::{ConfigError, NotFoundError, TransportError, ValidationError, VistaError},
        filter::{DEFAULT_PAGE_SIZE, Filter, FilterPatch, FilterValue},
        page::{PageMeta, Paged},
        resource::Resource,
        snapshot::{CollectionSnapshot, Phase, SnapshotEvent, reduce},
        stats::{CollectionStats, ResourceStats, StatsSource},
    };

    // === Controller & registry ===
    pub use crate::controller::CollectionController;
    pub use crate::registry::ControllerRegistry;

    // === Transport ===
    pub use crate::transport::{HttpTransport, InMemoryTransport, Transport};

    // === Config ===
    pub use crate::config::ClientConfig;

    // === Formatting ===
    pub use crate::format::{
        StatusStyle, format_currency, format_date, format_datetime, humanize, status_color,
        status_label, status_style,
    };

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use uuid::Uuid;
}
