//! District and town reference data.
//!
//! Both tables are seeded by migrations and read-only to the application.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrative district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct District {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Colombo")]
    pub name: String,
}

impl District {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Town belonging to exactly one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Town {
    #[schema(example = 504)]
    pub id: i32,
    #[schema(example = "Nugegoda")]
    pub name: String,
    #[schema(example = 5)]
    pub district_id: i32,
}

impl Town {
    pub fn new(id: i32, name: impl Into<String>, district_id: i32) -> Self {
        Self {
            id,
            name: name.into(),
            district_id,
        }
    }

    /// Whether this town sits inside `district_id`.
    #[must_use]
    pub fn belongs_to(&self, district_id: i32) -> bool {
        self.district_id == district_id
    }
}

/// Town flattened with its district's name, as served by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TownWithDistrict {
    #[schema(example = 504)]
    pub town_id: i32,
    #[schema(example = "Nugegoda")]
    pub town_name: String,
    #[schema(example = 5)]
    pub district_id: i32,
    #[schema(example = "Colombo")]
    pub district_name: String,
}

impl TownWithDistrict {
    /// Split back into the town half.
    #[must_use]
    pub fn town(&self) -> Town {
        Town::new(self.town_id, self.town_name.clone(), self.district_id)
    }

    /// Whether `name` refers to the owning district, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn district_named(&self, name: &str) -> bool {
        self.district_name.eq_ignore_ascii_case(name.trim())
    }

    /// Whether `name` refers to this town, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn town_named(&self, name: &str) -> bool {
        self.town_name.eq_ignore_ascii_case(name.trim())
    }
}
