//! Leaflet adapter: records renderer calls as JavaScript and renders the standalone map page.

use crate::app::ports::{LayerHandle, MapRenderer, MarkerHandle};
use crate::config::MapConfig;
use crate::constants::{FILTER_ALL, FILTER_OPTIONS};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::presentation::{legend, LegendEntry, MarkerIcon};
use crate::types::Coordinates;
use crate::view::MapView;
use askama::Template;
use std::collections::BTreeMap;
use std::sync::Arc;

/// JSON string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn marker_var(handle: MarkerHandle) -> String {
    format!("m{}", handle.0)
}

fn layer_var(handle: LayerHandle) -> String {
    format!("g{}", handle.0)
}

/// Renderer that emits the equivalent Leaflet calls, one statement per call.
#[derive(Debug, Default)]
pub struct LeafletScript {
    statements: Vec<String>,
    marker_count: usize,
    layer_count: usize,
    /// Every layer each marker has been placed in
    owners: BTreeMap<MarkerHandle, Vec<LayerHandle>>,
}

impl LeafletScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn script(&self) -> String {
        self.statements.join("\n")
    }

    pub fn owners_of(&self, marker: MarkerHandle) -> &[LayerHandle] {
        self.owners.get(&marker).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl MapRenderer for LeafletScript {
    fn add_marker(&mut self, position: Coordinates, icon: &MarkerIcon, svg: &str) -> MarkerHandle {
        let handle = MarkerHandle(self.marker_count);
        self.marker_count += 1;
        self.statements.push(format!(
            "const {} = L.marker([{}, {}], {{icon: L.divIcon({{html: {}, className: 'custom-icon', iconSize: [{}, {}], iconAnchor: [{}, {}]}})}});",
            marker_var(handle),
            position.lat,
            position.lon,
            js_string(svg),
            icon.size,
            icon.size,
            icon.anchor,
            icon.anchor,
        ));
        handle
    }

    fn bind_popup(&mut self, marker: MarkerHandle, html: &str) {
        self.statements
            .push(format!("{}.bindPopup({});", marker_var(marker), js_string(html)));
    }

    fn group_layers(&mut self, _name: &str) -> LayerHandle {
        let handle = LayerHandle(self.layer_count);
        self.layer_count += 1;
        self.statements
            .push(format!("const {} = L.layerGroup();", layer_var(handle)));
        handle
    }

    fn add_marker_to_layer(&mut self, layer: LayerHandle, marker: MarkerHandle) {
        let owners = self.owners.entry(marker).or_default();
        if !owners.contains(&layer) {
            owners.push(layer);
        }
        self.statements.push(format!(
            "{}.addLayer({});",
            layer_var(layer),
            marker_var(marker)
        ));
    }

    fn remove_marker_from_layer(&mut self, layer: LayerHandle, marker: MarkerHandle) {
        self.statements.push(format!(
            "{}.removeLayer({});",
            layer_var(layer),
            marker_var(marker)
        ));
    }

    fn add_layer_to_view(&mut self, layer: LayerHandle) {
        self.statements
            .push(format!("map.addLayer({});", layer_var(layer)));
    }

    fn remove_layer_from_view(&mut self, layer: LayerHandle) {
        self.statements
            .push(format!("map.removeLayer({});", layer_var(layer)));
    }

    fn add_marker_to_view(&mut self, marker: MarkerHandle) {
        self.statements
            .push(format!("map.addLayer({});", marker_var(marker)));
    }

    fn remove_marker_from_view(&mut self, marker: MarkerHandle) {
        self.statements
            .push(format!("map.removeLayer({});", marker_var(marker)));
    }

    fn register_layer_toggle_control(&mut self, layers: &[(String, LayerHandle)]) {
        let entries: Vec<String> = layers
            .iter()
            .map(|(name, handle)| format!("{}: {}", js_string(name), layer_var(*handle)))
            .collect();
        self.statements.push(format!(
            "L.control.layers(null, {{{}}}, {{collapsed: false, position: 'topright'}}).addTo(map);",
            entries.join(", ")
        ));
    }

    fn clear(&mut self) {
        self.statements.clear();
        self.owners.clear();
        self.marker_count = 0;
        self.layer_count = 0;
    }
}

pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Template)]
#[template(path = "map.html")]
pub struct LeafletPage {
    pub title: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub init_script: String,
    pub filter_index: String,
    pub legend: Vec<LegendEntry>,
    pub filter_options: Vec<FilterOption>,
    pub filter_all: &'static str,
}

impl LeafletPage {
    /// Build the page by initializing a map view against a [`LeafletScript`].
    pub fn build(dataset: Arc<Dataset>, config: &MapConfig) -> Result<Self> {
        let view = MapView::init(dataset, LeafletScript::new())?;
        let script = view.renderer();

        let entries: Vec<String> = view
            .dataset()
            .iter()
            .filter_map(|record| {
                let marker = view.marker(record.id)?;
                let layers: Vec<String> = script
                    .owners_of(marker)
                    .iter()
                    .map(|h| layer_var(*h))
                    .collect();
                Some(format!(
                    "{{marker: {}, cuisine: {}, layers: [{}]}}",
                    marker_var(marker),
                    js_string(record.cuisine.as_str()),
                    layers.join(", ")
                ))
            })
            .collect();

        Ok(Self {
            title: config.title.clone(),
            center_lat: config.center[0],
            center_lon: config.center[1],
            zoom: config.zoom,
            tile_url: js_string(&config.tile_url),
            attribution: js_string(&config.attribution),
            init_script: script.script(),
            filter_index: format!("[\n{}\n]", entries.join(",\n")),
            legend: legend(),
            filter_options: FILTER_OPTIONS
                .iter()
                .map(|&(value, label)| FilterOption { value, label })
                .collect(),
            filter_all: FILTER_ALL,
        })
    }

    pub fn to_html(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

/// Render the standalone HTML page for `dataset`.
pub fn render_page(dataset: Arc<Dataset>, config: &MapConfig) -> Result<String> {
    LeafletPage::build(dataset, config)?.to_html()
}
