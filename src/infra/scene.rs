use crate::app::ports::{LayerHandle, MapRenderer, MarkerHandle};
use crate::presentation::MarkerIcon;
use crate::types::Coordinates;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SceneMarker {
    pub position: Coordinates,
    pub icon: MarkerIcon,
    pub svg: String,
    pub popup: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SceneLayer {
    pub name: String,
    pub markers: BTreeSet<MarkerHandle>,
    pub on_view: bool,
}

/// In-memory map scene used by the CLI and tests.
///
/// Layer groups behave like Leaflet's: showing a group draws its members,
/// hiding it erases them even when another shown group also holds them, and
/// editing a shown group draws or erases the marker at once.
#[derive(Debug, Default)]
pub struct SceneRenderer {
    markers: Vec<SceneMarker>,
    layers: Vec<SceneLayer>,
    drawn: BTreeSet<MarkerHandle>,
    toggle_control: Vec<(String, LayerHandle)>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&SceneMarker> {
        self.markers.get(handle.0)
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&SceneLayer> {
        self.layers.get(handle.0)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn toggle_control(&self) -> &[(String, LayerHandle)] {
        &self.toggle_control
    }

    /// Markers currently drawn on the view
    pub fn markers_on_view(&self) -> BTreeSet<MarkerHandle> {
        self.drawn.clone()
    }

}

impl MapRenderer for SceneRenderer {
    fn add_marker(&mut self, position: Coordinates, icon: &MarkerIcon, svg: &str) -> MarkerHandle {
        self.markers.push(SceneMarker {
            position,
            icon: icon.clone(),
            svg: svg.to_string(),
            popup: None,
        });
        MarkerHandle(self.markers.len() - 1)
    }

    fn bind_popup(&mut self, marker: MarkerHandle, html: &str) {
        if let Some(entry) = self.markers.get_mut(marker.0) {
            entry.popup = Some(html.to_string());
        }
    }

    fn group_layers(&mut self, name: &str) -> LayerHandle {
        self.layers.push(SceneLayer {
            name: name.to_string(),
            markers: BTreeSet::new(),
            on_view: false,
        });
        LayerHandle(self.layers.len() - 1)
    }

    fn add_marker_to_layer(&mut self, layer: LayerHandle, marker: MarkerHandle) {
        let Some(layer) = self.layers.get_mut(layer.0) else {
            return;
        };
        layer.markers.insert(marker);
        if layer.on_view {
            self.drawn.insert(marker);
        }
    }

    fn remove_marker_from_layer(&mut self, layer: LayerHandle, marker: MarkerHandle) {
        let Some(layer) = self.layers.get_mut(layer.0) else {
            return;
        };
        layer.markers.remove(&marker);
        if layer.on_view {
            self.drawn.remove(&marker);
        }
    }

    fn add_layer_to_view(&mut self, layer: LayerHandle) {
        let Some(layer) = self.layers.get_mut(layer.0) else {
            return;
        };
        layer.on_view = true;
        self.drawn.extend(layer.markers.iter().copied());
    }

    fn remove_layer_from_view(&mut self, layer: LayerHandle) {
        let Some(layer) = self.layers.get_mut(layer.0) else {
            return;
        };
        layer.on_view = false;
        for marker in &layer.markers {
            self.drawn.remove(marker);
        }
    }

    fn add_marker_to_view(&mut self, marker: MarkerHandle) {
        if marker.0 < self.markers.len() {
            self.drawn.insert(marker);
        }
    }

    fn remove_marker_from_view(&mut self, marker: MarkerHandle) {
        self.drawn.remove(&marker);
    }

    fn register_layer_toggle_control(&mut self, layers: &[(String, LayerHandle)]) {
        self.toggle_control = layers.to_vec();
    }

    fn clear(&mut self) {
        debug!(
            markers = self.markers.len(),
            layers = self.layers.len(),
            "Clearing scene"
        );
        self.markers.clear();
        self.layers.clear();
        self.drawn.clear();
        self.toggle_control.clear();
    }
}
