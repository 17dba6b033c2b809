//! Application layer - controllers and clients that drive the wizard.
//!
//! This layer wires domain rules to the ports: selection changes flow through
//! the gate, saves go through the store transport, and navigation fires only
//! after an acknowledgment.

pub mod favorites;
pub mod persistence;
pub mod profile;
pub mod recommendations;
mod responses;
pub mod session;
pub mod suggestions;
pub mod theme;
pub mod wizard;

pub use favorites::{FavoriteError, FavoritesService};
pub use persistence::{step_payload, PersistenceClient};
pub use profile::{ProfileController, ProfileError};
pub use recommendations::{RecommendationsError, RecommendationsView};
pub use responses::Ack;
pub use session::{SessionHydrator, SessionView};
pub use suggestions::SuggestionReader;
pub use theme::ThemePreference;
pub use wizard::{ContinueOutcome, WizardController, WizardError};
