//! Navigator port - hands control to another page.
//!
//! Navigation is the only externally visible effect of a successful step save.

/// Opens a page route such as `/budget`.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
