//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the wizard to external systems:
//! - `store` - HTTP transport to the remote preference store (reqwest)
//! - `cache` - JSON file local cache
//! - `memory` - in-memory store, cache and recording collaborators

pub mod cache;
pub mod memory;
pub mod store;

pub use cache::JsonFileCache;
pub use memory::{
    InMemoryCache, InMemoryStore, RecordedCall, RecordingNavigator, RecordingNotifier,
    ScriptedTransport,
};
pub use store::{HttpStoreConfig, ReqwestStoreTransport};
