//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the wizard domain.

mod errors;
mod ids;
mod percentage;
mod state_machine;
mod step;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{GroupId, ItemId, OptionId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use step::{SelectionMode, StepName};
pub use timestamp::Timestamp;
