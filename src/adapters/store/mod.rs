//! Remote store adapters.

mod reqwest_transport;

pub use reqwest_transport::{HttpStoreConfig, ReqwestStoreTransport};
