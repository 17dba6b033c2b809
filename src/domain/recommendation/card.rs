//! RecommendationRenderer - projects results and favorites into card view models.
//!
//! `project` is a pure function of `(results, favorites)`: order is preserved as
//! received (the service already ranks by relevance) and no field depends on
//! anything else.

use crate::domain::favorites::FavoritesSet;
use crate::domain::foundation::{ItemId, Percentage};

use super::item::RecommendationItem;
use super::price::PriceFormat;

/// Number of features shown on a card before the "+N more" marker.
pub const VISIBLE_FEATURES: usize = 5;

const NOT_SPECIFIED: &str = "Not specified";

/// What the card's favorite button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteAction {
    Add,
    Remove,
}

impl FavoriteAction {
    pub fn label(self) -> &'static str {
        match self {
            FavoriteAction::Add => "Add to favorites",
            FavoriteAction::Remove => "Remove from favorites",
        }
    }
}

/// Similarity badge shown when the service returned a non-zero score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBadge {
    pub percent: Percentage,
    pub demographic_bonus: Option<String>,
}

/// Vehicle attributes listed on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub vehicle_type: String,
    pub fuel: String,
    pub transmission: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardViewModel {
    pub item_id: ItemId,
    pub name: String,
    pub brand: String,
    pub price_label: String,
    pub image: Option<String>,
    pub details: CardDetails,
    pub features: Vec<String>,
    pub more_features: Option<String>,
    pub score: Option<ScoreBadge>,
    pub is_favorite: bool,
    /// A toggle for this item awaits its acknowledgment; the button is disabled.
    pub favorite_busy: bool,
    pub favorite_action: FavoriteAction,
}

impl CardViewModel {
    pub fn favorite_label(&self) -> &'static str {
        self.favorite_action.label()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationRenderer {
    price_format: PriceFormat,
}

impl RecommendationRenderer {
    pub fn new(price_format: PriceFormat) -> Self {
        Self { price_format }
    }

    /// Projects every result into a card, in the order received.
    pub fn project(
        &self,
        results: &[RecommendationItem],
        favorites: &FavoritesSet,
    ) -> Vec<CardViewModel> {
        results
            .iter()
            .map(|item| self.card(item, favorites))
            .collect()
    }

    fn card(&self, item: &RecommendationItem, favorites: &FavoritesSet) -> CardViewModel {
        let is_favorite = favorites.contains(&item.id);
        let hidden = item.features.len().saturating_sub(VISIBLE_FEATURES);

        CardViewModel {
            item_id: item.id.clone(),
            name: or_fallback(&item.name, "Name not available"),
            brand: or_fallback(&item.brand, "Brand not available"),
            price_label: self.price_format.format(item.price),
            image: item.image.clone().filter(|src| !src.is_empty()),
            details: CardDetails {
                vehicle_type: or_fallback(&item.vehicle_type, NOT_SPECIFIED),
                fuel: or_fallback(&item.fuel, NOT_SPECIFIED),
                transmission: or_fallback(&item.transmission, NOT_SPECIFIED),
                year: item
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            },
            features: item.features.iter().take(VISIBLE_FEATURES).cloned().collect(),
            more_features: (hidden > 0).then(|| format!("+{} more features", hidden)),
            score: score_badge(item),
            is_favorite,
            favorite_busy: favorites.is_pending(&item.id),
            favorite_action: if is_favorite {
                FavoriteAction::Remove
            } else {
                FavoriteAction::Add
            },
        }
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn score_badge(item: &RecommendationItem) -> Option<ScoreBadge> {
    let score = item.similarity_score.filter(|s| *s != 0.0 && !s.is_nan())?;
    Some(ScoreBadge {
        percent: Percentage::from_score(score),
        demographic_bonus: item
            .demographic_bonus
            .filter(|b| *b != 0.0 && b.is_finite())
            .map(|b| format!("+{} demographic", trim_number(b))),
    })
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
