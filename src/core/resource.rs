//! Resource trait: the contract a remote collection item must satisfy

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// A record belonging to a remote, paginated collection.
///
/// Implementations describe how the record is addressed over HTTP
/// (`resource_name` is the URL path segment) and expose the fields the
/// framework needs for cache bookkeeping and derived statistics.
///
/// # Example
/// ```rust,ignore
/// impl Resource for Booking {
///     fn resource_name() -> &'static str { "bookings" }
///     fn resource_name_singular() -> &'static str { "booking" }
///     fn id(&self) -> Uuid { self.id }
///     fn status(&self) -> &str { &self.status }
///     fn value(&self) -> Option<f64> { Some(self.amount) }
/// }
/// ```
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The plural resource name used in URLs (e.g., "bookings", "materials")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "booking", "material")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the record's status (e.g., "pending", "completed")
    fn status(&self) -> &str;

    /// Monetary value used by derived statistics, if the record carries one.
    ///
    /// Returns None by default for resources without a monetary dimension.
    fn value(&self) -> Option<f64> {
        None
    }
}
