//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the wizard and the outside world. Adapters implement these ports.
//!
//! - `StoreTransport` - request/response exchange with the remote store
//! - `Navigator` - page navigation
//! - `Notifier` - transient notifications
//! - `LocalCache` - non-authoritative client-side key/value storage

mod local_cache;
mod navigator;
mod notifier;
mod store_transport;

pub use local_cache::{keys as cache_keys, CacheError, LocalCache};
pub use navigator::Navigator;
pub use notifier::{Notification, NotificationLevel, Notifier};
pub use store_transport::{RawResponse, StoreError, StoreTransport, TransportError};
