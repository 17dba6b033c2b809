//! Wizard module - step controller lifecycle and group paging.

mod group_cursor;
mod status;

pub use group_cursor::GroupCursor;
pub use status::WizardStatus;
