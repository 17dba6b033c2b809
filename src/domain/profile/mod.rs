//! Profile module - demographic profile, profile-step draft and theme.

mod demographics;
mod theme;

pub use demographics::{AgeRange, DemographicProfile, Gender, ProfileDraft};
pub use theme::Theme;
