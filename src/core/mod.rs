//! Core module containing the fundamental types of the view-state pattern

pub mod error;
pub mod filter;
pub mod page;
pub mod resource;
pub mod snapshot;
pub mod stats;

pub use error::{ConfigError, NotFoundError, TransportError, ValidationError, VistaError};
pub use filter::{DEFAULT_PAGE_SIZE, Filter, FilterPatch, FilterValue};
pub use page::{PageMeta, Paged};
pub use resource::Resource;
pub use snapshot::{CollectionSnapshot, Phase, SnapshotEvent, reduce};
pub use stats::{CollectionStats, ResourceStats, StatsSource};
