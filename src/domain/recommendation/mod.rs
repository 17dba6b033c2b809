//! Recommendation module - result items and their card projection.

mod card;
mod item;
mod price;

pub use card::{
    CardDetails, CardViewModel, FavoriteAction, RecommendationRenderer, ScoreBadge,
    VISIBLE_FEATURES,
};
pub use item::RecommendationItem;
pub use price::PriceFormat;
