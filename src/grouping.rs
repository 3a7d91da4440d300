//! Partition of the dataset into toggleable layers.
//!
//! Every colour-table key gets one layer. The `Vegan/Vegetarian` key is the
//! cross-cutting overlay: it holds every vegetarian-friendly restaurant in
//! addition to any record whose primary category is Vegan/Vegetarian, and it
//! starts hidden.

use crate::dataset::Dataset;
use crate::error::{MapError, Result};
use crate::types::{Category, RecordId};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named, independently toggleable group of markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    /// Primary category layer (never `Category::VeganVegetarian`)
    Category(Category),
    VegetarianOverlay,
}

impl LayerId {
    /// The layer that owns records of `category`.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::VeganVegetarian => LayerId::VegetarianOverlay,
            other => LayerId::Category(other),
        }
    }

    /// Layers in colour-table order
    pub fn all() -> impl Iterator<Item = LayerId> {
        Category::ALL.into_iter().map(LayerId::for_category)
    }

    pub fn category(self) -> Category {
        match self {
            LayerId::Category(category) => category,
            LayerId::VegetarianOverlay => Category::VeganVegetarian,
        }
    }

    pub fn name(self) -> &'static str {
        self.category().display_name()
    }

    pub fn color(self) -> &'static str {
        self.category().color()
    }

    /// Primary category layers start shown; the overlay starts hidden.
    pub fn shown_by_default(self) -> bool {
        !matches!(self, LayerId::VegetarianOverlay)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerId {
    type Err = MapError;

    /// Accepts a category display name, or `veg` for the overlay.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("veg") {
            return Ok(LayerId::VegetarianOverlay);
        }
        trimmed
            .parse::<Category>()
            .map(LayerId::for_category)
            .map_err(|_| MapError::UnknownLayer(trimmed.to_string()))
    }
}

/// Records per category plus the vegetarian group, computed once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroups {
    by_category: BTreeMap<Category, Vec<RecordId>>,
    vegetarian: Vec<RecordId>,
    overlay: Vec<RecordId>,
}

impl CategoryGroups {
    pub fn build(dataset: &Dataset) -> Self {
        let mut by_category: BTreeMap<Category, Vec<RecordId>> =
            Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
        let mut vegetarian = Vec::new();
        let mut overlay = Vec::new();

        for record in dataset.iter() {
            by_category
                .entry(record.category)
                .or_default()
                .push(record.id);
            if record.is_vegetarian {
                vegetarian.push(record.id);
            }
            if record.is_vegetarian || record.category == Category::VeganVegetarian {
                overlay.push(record.id);
            }
        }

        Self {
            by_category,
            vegetarian,
            overlay,
        }
    }

    pub fn category(&self, category: Category) -> &[RecordId] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exactly the records flagged vegetarian, regardless of category.
    pub fn vegetarian(&self) -> &[RecordId] {
        &self.vegetarian
    }

    pub fn layer(&self, layer: LayerId) -> &[RecordId] {
        match layer {
            LayerId::Category(category) => self.category(category),
            LayerId::VegetarianOverlay => &self.overlay,
        }
    }

    /// Category groups in colour-table order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[RecordId])> {
        Category::ALL.into_iter().map(|c| (c, self.category(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_groups_partition_dataset() {
        let dataset = Dataset::builtin().unwrap();
        let groups = CategoryGroups::build(&dataset);

        let mut seen = HashSet::new();
        let mut total = 0;
        for (category, ids) in groups.iter() {
            for id in ids {
                assert_eq!(dataset.get(*id).unwrap().category, category);
                assert!(seen.insert(*id), "record {:?} in two groups", id);
            }
            total += ids.len();
        }
        assert_eq!(total, dataset.len());
        assert_eq!(seen.len(), dataset.len());
    }

    #[test]
    fn test_groups_preserve_insertion_order() {
        let dataset = Dataset::builtin().unwrap();
        let groups = CategoryGroups::build(&dataset);
        let asian = groups.category(Category::Asian);
        assert!(asian.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dataset.get(asian[0]).unwrap().name, "Spice Garden");
    }

    #[test]
    fn test_vegetarian_group_matches_flag() {
        let dataset = Dataset::builtin().unwrap();
        let groups = CategoryGroups::build(&dataset);
        let expected: Vec<RecordId> = dataset
            .iter()
            .filter(|r| r.is_vegetarian)
            .map(|r| r.id)
            .collect();
        assert_eq!(groups.vegetarian(), expected.as_slice());
        assert_eq!(groups.vegetarian().len(), 10);
        assert_eq!(groups.layer(LayerId::VegetarianOverlay), expected.as_slice());
    }

    #[test]
    fn test_overlay_includes_primary_vegan_records() {
        let json = r#"[
            {"coordinates": [47.8, 13.04], "name": "Green Leaf", "cuisine": "vegan", "category": "Vegan/Vegetarian", "veg": "no"},
            {"coordinates": [47.8, 13.05], "name": "Curry Hut", "cuisine": "indian", "category": "Asian", "veg": "yes"}
        ]"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        let groups = CategoryGroups::build(&dataset);
        assert_eq!(groups.vegetarian(), &[RecordId(1)]);
        assert_eq!(groups.layer(LayerId::VegetarianOverlay), &[RecordId(0), RecordId(1)]);
    }

    #[test]
    fn test_empty_category_still_present() {
        let dataset = Dataset::builtin().unwrap();
        let groups = CategoryGroups::build(&dataset);
        assert!(groups.category(Category::VeganVegetarian).is_empty());
        assert_eq!(groups.iter().count(), 6);
    }

    #[test]
    fn test_layer_ids_parse() {
        assert_eq!("Asian".parse::<LayerId>().unwrap(), LayerId::Category(Category::Asian));
        assert_eq!("veg".parse::<LayerId>().unwrap(), LayerId::VegetarianOverlay);
        assert_eq!(
            "Vegan/Vegetarian".parse::<LayerId>().unwrap(),
            LayerId::VegetarianOverlay
        );
        assert!(matches!("Nordic".parse::<LayerId>(), Err(MapError::UnknownLayer(_))));
        // Only the overlay stands for the Vegan/Vegetarian key
        assert!(LayerId::all().all(|l| l != LayerId::Category(Category::VeganVegetarian)));
    }

    #[test]
    fn test_layer_order_and_defaults() {
        let layers: Vec<LayerId> = LayerId::all().collect();
        assert_eq!(layers.len(), 6);
        assert_eq!(layers[2], LayerId::VegetarianOverlay);
        assert!(LayerId::Category(Category::Asian).shown_by_default());
        assert!(!LayerId::VegetarianOverlay.shown_by_default());
    }
}
