//! Cuisine filter state machine.
//!
//! `Unfiltered` shows every record; `Filtered(tag)` shows records whose raw
//! cuisine string contains `tag` as a case-sensitive substring. Matching does
//! not respect tag boundaries, so `pizza` matches `italian_pizza`. A tag that
//! matches nothing is a valid filter that yields an empty result.

use crate::constants::FILTER_ALL;
use crate::types::RestaurantRecord;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "tag", rename_all = "snake_case")]
pub enum FilterState {
    #[default]
    Unfiltered,
    Filtered(String),
}

impl FilterState {
    pub fn tag(&self) -> Option<&str> {
        match self {
            FilterState::Unfiltered => None,
            FilterState::Filtered(tag) => Some(tag),
        }
    }

    /// The dropdown value that selects this state.
    pub fn selection(&self) -> &str {
        self.tag().unwrap_or(FILTER_ALL)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CuisineFilter {
    state: FilterState,
}

impl CuisineFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Switch to `Unfiltered` for `"all"`, otherwise to `Filtered(tag)`.
    pub fn apply(&mut self, tag: &str) {
        self.state = if tag == FILTER_ALL {
            FilterState::Unfiltered
        } else {
            FilterState::Filtered(tag.to_string())
        };
        debug!(state = ?self.state, "Cuisine filter changed");
    }

    pub fn reset(&mut self) {
        self.apply(FILTER_ALL);
    }

    pub fn matches(&self, record: &RestaurantRecord) -> bool {
        match &self.state {
            FilterState::Unfiltered => true,
            FilterState::Filtered(tag) => record.cuisine.contains_substring(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn matching_names(filter: &CuisineFilter, dataset: &Dataset) -> Vec<String> {
        dataset
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.name.clone())
            .collect()
    }

    #[test]
    fn test_initial_state_is_unfiltered() {
        let filter = CuisineFilter::new();
        assert_eq!(filter.state(), &FilterState::Unfiltered);
        assert_eq!(filter.state().selection(), "all");
    }

    #[test]
    fn test_apply_all_and_reset_are_equivalent() {
        let dataset = Dataset::builtin().unwrap();

        let mut applied = CuisineFilter::new();
        applied.apply("thai");
        applied.apply("all");

        let mut reset = CuisineFilter::new();
        reset.apply("thai");
        reset.reset();

        assert_eq!(applied.state(), reset.state());
        assert_eq!(matching_names(&applied, &dataset).len(), dataset.len());
        assert_eq!(matching_names(&reset, &dataset).len(), dataset.len());
    }

    #[test]
    fn test_spice_garden_example() {
        let dataset = Dataset::builtin().unwrap();
        let mut filter = CuisineFilter::new();

        filter.apply("thai");
        assert!(matching_names(&filter, &dataset).contains(&"Spice Garden".to_string()));

        filter.apply("mexican");
        assert!(!matching_names(&filter, &dataset).contains(&"Spice Garden".to_string()));

        filter.reset();
        assert!(matching_names(&filter, &dataset).contains(&"Spice Garden".to_string()));
    }

    #[test]
    fn test_pizza_uses_substring_semantics() {
        let dataset = Dataset::builtin().unwrap();
        let mut filter = CuisineFilter::new();
        filter.apply("pizza");
        assert_eq!(
            matching_names(&filter, &dataset),
            vec!["Pasta e Basta".to_string(), "Pizza Express".to_string()]
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let dataset = Dataset::builtin().unwrap();
        let mut filter = CuisineFilter::new();
        filter.apply("Thai");
        assert!(matching_names(&filter, &dataset).is_empty());
    }

    #[test]
    fn test_unknown_tag_yields_empty_set() {
        let dataset = Dataset::builtin().unwrap();
        let mut filter = CuisineFilter::new();
        filter.apply("ethiopian");
        assert_eq!(filter.state().tag(), Some("ethiopian"));
        assert!(matching_names(&filter, &dataset).is_empty());
    }

    #[test]
    fn test_filter_is_substring_predicate_for_every_option() {
        let dataset = Dataset::builtin().unwrap();
        let mut filter = CuisineFilter::new();
        for tag in crate::constants::get_filter_tags() {
            filter.apply(tag);
            for record in dataset.iter() {
                assert_eq!(filter.matches(record), record.cuisine.as_str().contains(tag));
            }
        }
    }
}
