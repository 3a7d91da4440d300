//! Marker, popup and legend presentation derived from a single record.

use crate::constants::{ICON_ANCHOR, ICON_SIZE, VEG_NOTICE};
use crate::error::Result;
use crate::types::{Category, CategoryColorMap, RestaurantRecord};
use askama::Template;
use serde::Serialize;

/// Circle marker filled with the category colour, with a `V` glyph for vegetarian places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Template)]
#[template(
    source = r##"<svg width="{{ size }}" height="{{ size }}" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><circle cx="12" cy="12" r="10" fill="{{ color }}" stroke="#000" stroke-width="1"/>{% if vegetarian %}<text x="12" y="15" font-size="10" text-anchor="middle" fill="white" font-weight="bold">V</text>{% endif %}</svg>"##,
    ext = "html"
)]
pub struct MarkerIcon {
    pub color: &'static str,
    pub vegetarian: bool,
    pub size: u32,
    pub anchor: u32,
}

impl MarkerIcon {
    pub fn new(color: &'static str, vegetarian: bool) -> Self {
        Self {
            color,
            vegetarian,
            size: ICON_SIZE,
            anchor: ICON_ANCHOR,
        }
    }

    pub fn for_record(record: &RestaurantRecord) -> Self {
        Self::new(CategoryColorMap.get(record.category), record.is_vegetarian)
    }

    pub fn svg(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

/// Popup payload shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Template)]
#[template(
    source = r#"<div class='restaurant-info'>{{ name }}</div>
<div class='restaurant-info'>Cuisine: {{ cuisine }}</div>
<div class='cuisine-type'>Category: {{ category|safe }}</div>
{%- if let Some(notice) = veg_notice %}
<div class="veg-info">{{ notice|safe }}</div>
{%- endif %}"#,
    ext = "html"
)]
pub struct PopupContent {
    pub name: String,
    pub cuisine: String,
    pub category: &'static str,
    pub veg_notice: Option<&'static str>,
}

impl PopupContent {
    pub fn for_record(record: &RestaurantRecord) -> Self {
        Self {
            name: record.name.clone(),
            cuisine: record.cuisine.as_str().to_string(),
            category: record.category.display_name(),
            veg_notice: record.is_vegetarian.then_some(VEG_NOTICE),
        }
    }

    /// HTML fragment with all record text escaped.
    pub fn to_html(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub name: &'static str,
    pub color: &'static str,
    pub glyph: Option<&'static str>,
}

/// One legend row per colour-table key; the Vegan/Vegetarian row carries the `V` glyph.
pub fn legend() -> Vec<LegendEntry> {
    CategoryColorMap
        .iter()
        .map(|(category, color)| LegendEntry {
            name: category.display_name(),
            color,
            glyph: (category == Category::VeganVegetarian).then_some("V"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, CuisineTags, RecordId};

    fn record(name: &str, category: Category, veg: bool) -> RestaurantRecord {
        RestaurantRecord {
            id: RecordId(0),
            position: Coordinates::new(47.8, 13.04),
            name: name.to_string(),
            cuisine: CuisineTags::parse(name, "indian;thai").unwrap(),
            category,
            is_vegetarian: veg,
        }
    }

    #[test]
    fn test_icon_uses_category_color_and_glyph() {
        let icon = MarkerIcon::for_record(&record("Spice Garden", Category::Asian, true));
        assert_eq!(icon.color, "#FF6B6B");
        let svg = icon.svg().unwrap();
        assert!(svg.contains(r##"fill="#FF6B6B""##));
        assert!(svg.contains(">V</text>"));

        let plain = MarkerIcon::for_record(&record("Golden Wok", Category::European, false));
        let svg = plain.svg().unwrap();
        assert!(svg.contains(r##"fill="#4ECDC4""##));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_popup_includes_veg_notice_only_when_vegetarian() {
        let veg = PopupContent::for_record(&record("Spice Garden", Category::Asian, true))
            .to_html()
            .unwrap();
        assert!(veg.contains("Spice Garden"));
        assert!(veg.contains("Cuisine: indian;thai"));
        assert!(veg.contains("Category: Asian"));
        assert!(veg.contains("Vegan/Vegetarian options"));

        let plain = PopupContent::for_record(&record("Thai Orchid", Category::Asian, false))
            .to_html()
            .unwrap();
        assert!(!plain.contains("veg-info"));
    }

    #[test]
    fn test_popup_escapes_names() {
        let html = PopupContent::for_record(&record("<b>Bistro</b>", Category::European, false))
            .to_html()
            .unwrap();
        assert!(!html.contains("<b>Bistro</b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_legend_follows_color_table() {
        let entries = legend();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].name, "Asian");
        assert_eq!(entries[2].glyph, Some("V"));
        assert!(entries.iter().filter(|e| e.glyph.is_some()).count() == 1);
    }
}
