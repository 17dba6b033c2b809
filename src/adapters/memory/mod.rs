//! In-memory adapters for tests and offline development.

mod cache;
mod navigator;
mod notifier;
mod scripted_transport;
mod store;

pub use cache::InMemoryCache;
pub use navigator::RecordingNavigator;
pub use notifier::RecordingNotifier;
pub use scripted_transport::{RecordedCall, ScriptedTransport};
pub use store::InMemoryStore;
