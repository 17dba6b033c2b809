//! Domain layer - pure wizard state, no I/O.

pub mod catalog;
pub mod favorites;
pub mod foundation;
pub mod gate;
pub mod profile;
pub mod recommendation;
pub mod selection;
pub mod suggestions;
pub mod wizard;
