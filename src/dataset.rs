//! Restaurant dataset loading.
//!
//! The dining guide ships with a fixed set of Salzburg restaurants. A
//! different set can be supplied as a JSON array of [`RawRestaurant`]
//! entries; every entry is validated when the dataset is built, so an
//! unrecognized category fails here rather than at render time.

use crate::error::Result;
use crate::types::{RawRestaurant, RecordId, RestaurantRecord};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// (lat, lon, name, cuisine, category, veg)
type BuiltinEntry = (f64, f64, &'static str, &'static str, &'static str, &'static str);

const SALZBURG_RESTAURANTS: &[BuiltinEntry] = &[
    (47.8002674, 13.045302, "Spice Garden", "indian;thai;international", "Asian", "yes"),
    (47.8031766, 13.0467797, "Bamboo House", "asian", "Asian", "yes"),
    (47.8036863, 13.0449625, "Pasta e Basta", "italian_pizza", "European", "no"),
    (47.8034423, 13.045115, "Taco Fiesta", "mexican", "Latin American/Mexican", "no"),
    (47.7997381, 13.0392385, "Alpine Delight", "austrian", "European", "yes"),
    (47.8071885, 13.0015493, "Dragon Palace", "east_asian", "Asian", "no"),
    (47.7979803, 13.0488221, "Trattoria Romana", "italian", "European", "no"),
    (47.7980147, 13.0302833, "Aegean Breeze", "greek", "Middle Eastern", "yes"),
    (47.7731812, 13.0707202, "Golden Wok", "chinese", "Asian", "no"),
    (47.7889688, 13.0367412, "Thai Orchid", "thai", "Asian", "no"),
    (47.8114551, 13.0595557, "Pasta Pronto", "italian", "European", "yes"),
    (47.8032461, 13.0468322, "Sakura Sushi", "japanese", "Asian", "no"),
    (47.7748653, 13.0678221, "Pizza Napoli", "italian", "European", "yes"),
    (47.7974646, 13.0325585, "Ristorante Venezia", "italian", "European", "yes"),
    (47.8003489, 13.0423762, "Panda Express", "chinese", "Asian", "yes"),
    (47.8001529, 13.0429729, "Gelato Paradiso", "italian", "European", "yes"),
    (47.8009881, 13.0389575, "Pasta Amore", "italian", "European", "yes"),
    (47.8031478, 13.0465494, "Pizza Express", "italian;pizza", "European", "no"),
    (47.802277, 13.0666072, "Ocean Sushi", "asian;sushi;seafood", "Asian", "no"),
    (47.80382, 13.047351, "Global Bites", "burger;italian;chinese", "International", "no"),
];

/// Immutable list of validated restaurant records, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<RestaurantRecord>,
}

impl Dataset {
    /// The restaurants of the Salzburg dining guide.
    pub fn builtin() -> Result<Self> {
        let raw = SALZBURG_RESTAURANTS
            .iter()
            .map(|&(lat, lon, name, cuisine, category, veg)| RawRestaurant {
                coordinates: [lat, lon],
                name: name.to_string(),
                cuisine: cuisine.to_string(),
                category: category.to_string(),
                veg: veg.to_string(),
            })
            .collect();
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: Vec<RawRestaurant>) -> Result<Self> {
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_record(RecordId(index)))
            .collect::<Result<Vec<_>>>()?;
        debug!("Validated {} restaurant records", records.len());
        Ok(Self { records })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<RawRestaurant> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Load a JSON dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            "Loaded restaurant dataset"
        );
        Ok(dataset)
    }

    /// Load from `path` when given, otherwise use the built-in restaurants.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&RestaurantRecord> {
        self.records.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestaurantRecord> {
        self.records.iter()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RestaurantRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}
