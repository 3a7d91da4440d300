/// Display constants shared by the map page, the CLI and the HTTP API.
/// These mirror the legend and control layout of the published dining guide.

// Category display names (also used as layer names in the toggle control)
pub const ASIAN: &str = "Asian";
pub const EUROPEAN: &str = "European";
pub const VEGAN_VEGETARIAN: &str = "Vegan/Vegetarian";
pub const LATIN_AMERICAN_MEXICAN: &str = "Latin American/Mexican";
pub const MIDDLE_EASTERN: &str = "Middle Eastern";
pub const INTERNATIONAL: &str = "International";

// Marker fill colours per category
pub const ASIAN_COLOR: &str = "#FF6B6B";
pub const EUROPEAN_COLOR: &str = "#4ECDC4";
pub const VEGAN_VEGETARIAN_COLOR: &str = "#82C91E";
pub const LATIN_AMERICAN_MEXICAN_COLOR: &str = "#FF922B";
pub const MIDDLE_EASTERN_COLOR: &str = "#F06595";
pub const INTERNATIONAL_COLOR: &str = "#748FFC";

/// Filter value that clears the cuisine filter
pub const FILTER_ALL: &str = "all";

/// Dropdown options of the cuisine filter control: (value, label)
pub const FILTER_OPTIONS: &[(&str, &str)] = &[
    (FILTER_ALL, "All Cuisines"),
    ("indian", "Indian"),
    ("thai", "Thai"),
    ("italian", "Italian"),
    ("pizza", "Pizza"),
    ("mexican", "Mexican"),
    ("austrian", "Austrian"),
    ("chinese", "Chinese"),
    ("japanese", "Japanese"),
    ("sushi", "Sushi"),
    ("greek", "Greek"),
    ("burger", "Burger"),
    ("seafood", "Seafood"),
];

/// Separator between tags in a cuisine string
pub const TAG_SEPARATOR: char = ';';

/// Notice line shown in popups of vegetarian-friendly restaurants
pub const VEG_NOTICE: &str = "✓ Vegan/Vegetarian options";

// Marker icon geometry (pixels)
pub const ICON_SIZE: u32 = 24;
pub const ICON_ANCHOR: u32 = 12;

/// Get the cuisine values offered by the filter dropdown, excluding "all"
pub fn get_filter_tags() -> Vec<&'static str> {
    FILTER_OPTIONS
        .iter()
        .map(|(value, _)| *value)
        .filter(|value| *value != FILTER_ALL)
        .collect()
}
