// ── Guest-facing content: activities, dining, streaming, backgrounds, info ──
//
// Everything here is scoped to a property and (except backgrounds) carries
// an `is_active` flag and a dense `display_order`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::de;
use super::entity_id::EntityId;

/// Implemented by every list entity that the console can reorder.
pub trait Ordered {
    fn id(&self) -> &EntityId;
    fn display_order(&self) -> u32;
    fn set_display_order(&mut self, order: u32);
}

/// Implemented by every list entity with an active toggle.
pub trait Toggleable {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

macro_rules! impl_ordered_toggleable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Ordered for $ty {
                fn id(&self) -> &EntityId {
                    &self.id
                }
                fn display_order(&self) -> u32 {
                    self.display_order
                }
                fn set_display_order(&mut self, order: u32) {
                    self.display_order = order;
                }
            }

            impl Toggleable for $ty {
                fn is_active(&self) -> bool {
                    self.is_active
                }
                fn set_active(&mut self, active: bool) {
                    self.is_active = active;
                }
            }
        )+
    };
}

// ── Activities ──────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActivityType {
    Outdoor,
    Indoor,
    Sightseeing,
    Sport,
    Wellness,
    Culture,
    Family,
    Nightlife,
    Shopping,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    pub title: String,
    #[serde(default)]
    pub title_de: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_de: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub activity_type: ActivityType,
    #[serde(default, deserialize_with = "de::string_list")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub weather_suitability: Vec<String>,
    #[serde(default)]
    pub season_start: Option<String>,
    #[serde(default)]
    pub season_end: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub display_order: u32,
    #[serde(default = "default_true", deserialize_with = "de::nullable")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_de: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_de: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_suitability: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ── Dining ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningPlace {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_de: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,

    // Feature flags
    #[serde(default, deserialize_with = "de::nullable")]
    pub parking: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub vegetarian: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub vegan: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub outdoor_seating: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub wheelchair_accessible: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub reservations_required: bool,

    #[serde(default, deserialize_with = "de::nullable")]
    pub display_order: u32,
    #[serde(default = "default_true", deserialize_with = "de::nullable")]
    pub is_active: bool,
}

impl DiningPlace {
    /// English name, falling back to the German one.
    pub fn display_name(&self) -> &str {
        self.name_en
            .as_deref()
            .or(self.name_de.as_deref())
            .unwrap_or_default()
    }

    /// Set feature flags, in a fixed order, for compact listing.
    pub fn features(&self) -> Vec<&'static str> {
        [
            (self.parking, "parking"),
            (self.vegetarian, "vegetarian"),
            (self.vegan, "vegan"),
            (self.outdoor_seating, "outdoor"),
            (self.wheelchair_accessible, "accessible"),
            (self.reservations_required, "reservations"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_de: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdoor_seating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations_required: Option<bool>,
}

// ── Streaming services ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingService {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    pub service_name: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub app_url_scheme: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub requires_login: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub display_order: u32,
    #[serde(default = "default_true", deserialize_with = "de::nullable")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamingInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_url_scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_login: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ── Background images ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, alias = "image_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, alias = "uploadedAt", alias = "created_at")]
    pub uploaded_at: Option<String>,
}

// ── Property information ────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InfoCategory {
    #[default]
    Amenity,
    Guide,
    Service,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfoItem {
    pub id: EntityId,
    #[serde(default)]
    pub property_id: Option<EntityId>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub category: InfoCategory,
    #[serde(default, alias = "type")]
    pub info_type: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub display_order: u32,
    #[serde(default = "default_true", deserialize_with = "de::nullable")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyInfoInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<InfoCategory>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub info_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl_ordered_toggleable!(Activity, DiningPlace, StreamingService, PropertyInfoItem);

/// One row of a full-set `PUT /reorder` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: EntityId,
    pub display_order: u32,
}

impl OrderEntry {
    pub fn from_items<T: Ordered>(items: &[T]) -> Vec<Self> {
        items
            .iter()
            .map(|item| Self {
                id: item.id().clone(),
                display_order: item.display_order(),
            })
            .collect()
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn activity_defaults_to_active() {
        let a: Activity = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Lake swim",
            "activity_type": "outdoor",
            "labels": "summer,kids",
            "display_order": null
        }))
        .unwrap();
        assert!(a.is_active);
        assert_eq!(a.display_order, 0);
        assert_eq!(a.activity_type, ActivityType::Outdoor);
        assert_eq!(a.labels, vec!["summer", "kids"]);
    }

    #[test]
    fn info_item_accepts_type_alias() {
        let item: PropertyInfoItem = serde_json::from_value(serde_json::json!({
            "id": 3,
            "category": "guide",
            "type": "wifi",
            "title": "Wi-Fi",
            "is_active": false
        }))
        .unwrap();
        assert_eq!(item.category, InfoCategory::Guide);
        assert_eq!(item.info_type.as_deref(), Some("wifi"));
        assert!(!item.is_active);

        let input = PropertyInfoInput {
            info_type: Some("wifi".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "wifi" }));
    }

    #[test]
    fn dining_features_listed_in_fixed_order() {
        let d: DiningPlace = serde_json::from_value(serde_json::json!({
            "id": 9,
            "name_de": "Zum Hirschen",
            "vegan": true,
            "parking": true
        }))
        .unwrap();
        assert_eq!(d.display_name(), "Zum Hirschen");
        assert_eq!(d.features(), vec!["parking", "vegan"]);
    }
}
