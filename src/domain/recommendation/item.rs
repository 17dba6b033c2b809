//! RecommendationItem - one scored result from the recommendation service.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::ItemId;

/// A recommended vehicle as delivered by the remote store.
///
/// Immutable for the current render cycle. Fields the client does not
/// interpret are kept in `extra` so the snapshot sent with add-favorite is
/// the item exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fuel: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transmission: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub vehicle_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_bonus: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RecommendationItem {
    /// Creates an item with only an id and a name; handy for fixtures.
    pub fn named(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            brand: String::new(),
            price: None,
            year: None,
            fuel: String::new(),
            transmission: String::new(),
            vehicle_type: String::new(),
            image: None,
            features: Vec::new(),
            similarity_score: None,
            demographic_bonus: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_store_payload() {
        let item: RecommendationItem = serde_json::from_value(json!({
            "id": "sample_1",
            "name": "Toyota Corolla 2024",
            "model": "Corolla",
            "brand": "Toyota",
            "year": 2024,
            "price": 25000,
            "type": "Sedan",
            "fuel": "Gasolina",
            "transmission": "Automatic",
            "features": ["Bluetooth"],
            "similarity_score": 85.0,
            "image": null
        }))
        .unwrap();

        assert_eq!(item.id.as_str(), "sample_1");
        assert_eq!(item.price, Some(25000.0));
        assert_eq!(item.vehicle_type, "Sedan");
        assert_eq!(item.image, None);
        assert_eq!(item.extra.get("model"), Some(&json!("Corolla")));
    }

    #[test]
    fn missing_optional_fields_default() {
        let item: RecommendationItem = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert!(item.features.is_empty());
        assert_eq!(item.similarity_score, None);
        assert_eq!(item.name, "");
    }

    #[test]
    fn null_text_fields_read_as_missing() {
        let item: RecommendationItem = serde_json::from_value(json!({
            "id": "car_1",
            "name": "Kia Rio",
            "brand": null,
            "fuel": null,
            "transmission": null,
            "type": null,
            "features": null
        }))
        .unwrap();

        assert_eq!(item.name, "Kia Rio");
        assert_eq!(item.fuel, "");
        assert_eq!(item.vehicle_type, "");
        assert!(item.features.is_empty());
    }

    #[test]
    fn serialized_snapshot_keeps_unknown_fields() {
        let mut item = RecommendationItem::named(ItemId::new("x").unwrap(), "Car");
        item.extra.insert("model".to_string(), json!("M3"));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["model"], json!("M3"));
        assert_eq!(value["type"], json!(""));
        assert!(value.get("similarity_score").is_none());
    }
}
