//! Selection module - what the user has picked on the current step.

mod store;

pub use store::{SelectionSnapshot, SelectionStore};
