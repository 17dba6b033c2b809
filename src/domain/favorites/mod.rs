//! Favorites module - the user's liked recommendation items.

mod set;

pub use set::{FavoriteOp, FavoritesSet, PendingToggle, ToggleInFlight};
