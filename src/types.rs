use crate::constants;
use crate::error::{MapError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase words joined by `_`, tags separated by `;`
static CUISINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]+(?:_[a-z]+)*(?:;[a-z]+(?:_[a-z]+)*)*$").expect("valid cuisine pattern")
});

/// Top-level cuisine grouping used for marker colour and layer toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Asian")]
    Asian,
    #[serde(rename = "European")]
    European,
    #[serde(rename = "Vegan/Vegetarian")]
    VeganVegetarian,
    #[serde(rename = "Latin American/Mexican")]
    LatinAmericanMexican,
    #[serde(rename = "Middle Eastern")]
    MiddleEastern,
    #[serde(rename = "International")]
    International,
}

impl Category {
    /// Every category, in colour-table order. Legend and layer control follow this order.
    pub const ALL: [Category; 6] = [
        Category::Asian,
        Category::European,
        Category::VeganVegetarian,
        Category::LatinAmericanMexican,
        Category::MiddleEastern,
        Category::International,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Asian => constants::ASIAN,
            Category::European => constants::EUROPEAN,
            Category::VeganVegetarian => constants::VEGAN_VEGETARIAN,
            Category::LatinAmericanMexican => constants::LATIN_AMERICAN_MEXICAN,
            Category::MiddleEastern => constants::MIDDLE_EASTERN,
            Category::International => constants::INTERNATIONAL,
        }
    }

    /// Marker fill colour. Total over the enumeration.
    pub fn color(self) -> &'static str {
        match self {
            Category::Asian => constants::ASIAN_COLOR,
            Category::European => constants::EUROPEAN_COLOR,
            Category::VeganVegetarian => constants::VEGAN_VEGETARIAN_COLOR,
            Category::LatinAmericanMexican => constants::LATIN_AMERICAN_MEXICAN_COLOR,
            Category::MiddleEastern => constants::MIDDLE_EASTERN_COLOR,
            Category::International => constants::INTERNATIONAL_COLOR,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

impl FromStr for Category {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.display_name() == s)
            .ok_or_else(|| MapError::UnknownCategory(s.to_string()))
    }
}

/// Fixed mapping from category to display colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryColorMap;

impl CategoryColorMap {
    pub fn get(&self, category: Category) -> &'static str {
        category.color()
    }

    /// Entries in colour-table order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &'static str)> {
        Category::ALL.into_iter().map(|c| (c, c.color()))
    }
}

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Cuisine keywords stored as one delimiter-joined string, e.g. `indian;thai;international`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CuisineTags(String);

impl CuisineTags {
    /// Validate a raw cuisine string on behalf of the restaurant `name`.
    pub fn parse(name: &str, raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(MapError::EmptyCuisine {
                name: name.to_string(),
            });
        }
        if !CUISINE_PATTERN.is_match(raw) {
            return Err(MapError::InvalidCuisineTag {
                name: name.to_string(),
                cuisine: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive substring match over the whole joined string, ignoring tag boundaries.
    pub fn contains_substring(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.split(constants::TAG_SEPARATOR)
    }

    /// Exact membership of one tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }
}

impl fmt::Display for CuisineTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Load-order index of a record within its dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

/// A restaurant on the map. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantRecord {
    pub id: RecordId,
    pub position: Coordinates,
    pub name: String,
    pub cuisine: CuisineTags,
    pub category: Category,
    pub is_vegetarian: bool,
}

/// Restaurant entry as authored in the dining guide data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRestaurant {
    pub coordinates: [f64; 2],
    pub name: String,
    pub cuisine: String,
    pub category: String,
    pub veg: String,
}

impl RawRestaurant {
    /// Validate and convert into a record with the given load-order id.
    pub fn into_record(self, id: RecordId) -> Result<RestaurantRecord> {
        let category: Category = self.category.parse()?;
        let cuisine = CuisineTags::parse(&self.name, &self.cuisine)?;
        let is_vegetarian = match self.veg.as_str() {
            "yes" => true,
            "no" => false,
            other => {
                return Err(MapError::InvalidVegFlag {
                    name: self.name,
                    value: other.to_string(),
                })
            }
        };

        Ok(RestaurantRecord {
            id,
            position: Coordinates::new(self.coordinates[0], self.coordinates[1]),
            name: self.name,
            cuisine,
            category,
            is_vegetarian,
        })
    }
}
