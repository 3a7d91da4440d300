//! The restaurant map view.
//!
//! `MapView` owns the dataset, its layer grouping, the layer visibility
//! state, the cuisine filter and the derived [`VisibleSet`]. Filtering and
//! layer visibility compose by logical AND: a record is visible iff it
//! passes the filter and at least one layer containing it is shown. The
//! filter works by editing layer-group membership, never by putting markers
//! on the map directly, so toggling a layer after filtering keeps the
//! filter and filtering never re-shows a hidden layer.

use crate::app::ports::{LayerHandle, MapRenderer, MarkerHandle};
use crate::dataset::Dataset;
use crate::error::{MapError, Result};
use crate::filter::{CuisineFilter, FilterState};
use crate::grouping::{CategoryGroups, LayerId};
use crate::metrics::MapMetrics;
use crate::presentation::{MarkerIcon, PopupContent};
use crate::types::{RecordId, RestaurantRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Records currently rendered, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibleSet(BTreeSet<RecordId>);

impl VisibleSet {
    pub fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<RecordId> for VisibleSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

struct Layer {
    handle: LayerHandle,
    shown: bool,
    /// Records of this layer that pass the current filter
    members: BTreeSet<RecordId>,
}

pub struct MapView<R: MapRenderer> {
    dataset: Arc<Dataset>,
    groups: CategoryGroups,
    renderer: R,
    markers: Vec<MarkerHandle>,
    layers: BTreeMap<LayerId, Layer>,
    filter: CuisineFilter,
    visible: VisibleSet,
}

impl<R: MapRenderer> MapView<R> {
    /// Create markers and layer groups, show the default layers and register the toggle control.
    pub fn init(dataset: Arc<Dataset>, mut renderer: R) -> Result<Self> {
        let groups = CategoryGroups::build(&dataset);

        let mut markers = Vec::with_capacity(dataset.len());
        for record in dataset.iter() {
            let icon = MarkerIcon::for_record(record);
            let handle = renderer.add_marker(record.position, &icon, &icon.svg()?);
            renderer.bind_popup(handle, &PopupContent::for_record(record).to_html()?);
            markers.push(handle);
        }

        let mut layers = BTreeMap::new();
        let mut control = Vec::new();
        for layer_id in LayerId::all() {
            let handle = renderer.group_layers(layer_id.name());
            let members: BTreeSet<RecordId> = groups.layer(layer_id).iter().copied().collect();
            for id in &members {
                renderer.add_marker_to_layer(handle, markers[id.0]);
            }
            let shown = layer_id.shown_by_default();
            if shown {
                renderer.add_layer_to_view(handle);
            }
            control.push((layer_id.name().to_string(), handle));
            layers.insert(
                layer_id,
                Layer {
                    handle,
                    shown,
                    members,
                },
            );
        }
        renderer.register_layer_toggle_control(&control);

        let mut view = Self {
            dataset,
            groups,
            renderer,
            markers,
            layers,
            filter: CuisineFilter::new(),
            visible: VisibleSet::default(),
        };
        view.recompute_visible();
        info!(
            records = view.dataset.len(),
            visible = view.visible.len(),
            "Map view initialized"
        );
        Ok(view)
    }

    /// Filter by cuisine substring; `"all"` clears the filter.
    pub fn apply_filter(&mut self, tag: &str) -> &VisibleSet {
        self.filter.apply(tag);
        self.sync_layer_members();
        self.recompute_visible();
        self.sync_markers_on_view();
        MapMetrics::record_filter_applied(self.visible.len());
        &self.visible
    }

    pub fn reset_filter(&mut self) -> &VisibleSet {
        self.apply_filter(crate::constants::FILTER_ALL)
    }

    /// Show or hide a layer. Setting the state it already has changes nothing.
    pub fn set_layer_visible(&mut self, layer_id: LayerId, shown: bool) -> Result<&VisibleSet> {
        let layer = self
            .layers
            .get_mut(&layer_id)
            .ok_or_else(|| MapError::UnknownLayer(format!("{:?}", layer_id)))?;
        if layer.shown == shown {
            return Ok(&self.visible);
        }

        layer.shown = shown;
        if shown {
            self.renderer.add_layer_to_view(layer.handle);
        } else {
            self.renderer.remove_layer_from_view(layer.handle);
        }
        self.recompute_visible();
        self.sync_markers_on_view();
        MapMetrics::record_layer_toggled(self.visible.len());
        Ok(&self.visible)
    }

    pub fn toggle_layer(&mut self, layer_id: LayerId) -> Result<&VisibleSet> {
        let shown = self.is_layer_shown(layer_id);
        self.set_layer_visible(layer_id, !shown)
    }

    pub fn is_layer_shown(&self, layer_id: LayerId) -> bool {
        self.layers.get(&layer_id).map(|l| l.shown).unwrap_or(false)
    }

    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &RestaurantRecord> + '_ {
        self.visible.iter().filter_map(|id| self.dataset.get(id))
    }

    pub fn groups(&self) -> &CategoryGroups {
        &self.groups
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn marker(&self, id: RecordId) -> Option<MarkerHandle> {
        self.markers.get(id.0).copied()
    }

    /// Remove every layer from the view and release the renderer.
    pub fn teardown(mut self) -> R {
        for layer in self.layers.values().filter(|l| l.shown) {
            self.renderer.remove_layer_from_view(layer.handle);
        }
        self.renderer.clear();
        info!("Map view torn down");
        self.renderer
    }

    /// Bring every layer group's membership in line with the filter.
    fn sync_layer_members(&mut self) {
        for (layer_id, layer) in self.layers.iter_mut() {
            for &id in self.groups.layer(*layer_id) {
                let Some(record) = self.dataset.get(id) else {
                    continue;
                };
                let wanted = self.filter.matches(record);
                let marker = self.markers[id.0];
                if wanted && layer.members.insert(id) {
                    self.renderer.add_marker_to_layer(layer.handle, marker);
                } else if !wanted && layer.members.remove(&id) {
                    self.renderer.remove_marker_from_layer(layer.handle, marker);
                }
            }
        }
    }

    /// Redraw every marker from the visible set. Hiding a layer group also
    /// erases markers that another shown group holds.
    fn sync_markers_on_view(&mut self) {
        for (index, &marker) in self.markers.iter().enumerate() {
            if self.visible.contains(RecordId(index)) {
                self.renderer.add_marker_to_view(marker);
            } else {
                self.renderer.remove_marker_from_view(marker);
            }
        }
    }

    fn recompute_visible(&mut self) {
        self.visible = self
            .layers
            .values()
            .filter(|layer| layer.shown)
            .flat_map(|layer| layer.members.iter().copied())
            .collect();
        debug!(
            filter = ?self.filter.state(),
            visible = self.visible.len(),
            "Visible set recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::leaflet::LeafletScript;
    use crate::infra::scene::SceneRenderer;
    use crate::types::Category;

    fn view() -> MapView<SceneRenderer> {
        let dataset = Arc::new(Dataset::builtin().unwrap());
        MapView::init(dataset, SceneRenderer::new()).unwrap()
    }

    fn names(view: &MapView<SceneRenderer>) -> Vec<String> {
        view.visible_records().map(|r| r.name.clone()).collect()
    }

    /// Markers on the scene must match the view's visible set.
    fn assert_scene_matches(view: &MapView<SceneRenderer>) {
        let expected: BTreeSet<MarkerHandle> =
            view.visible().iter().filter_map(|id| view.marker(id)).collect();
        assert_eq!(view.renderer().markers_on_view(), expected);
    }

    #[test]
    fn test_init_shows_every_record_with_overlay_hidden() {
        let view = view();
        assert_eq!(view.visible().len(), 20);
        assert!(!view.is_layer_shown(LayerId::VegetarianOverlay));
        assert!(view.is_layer_shown(LayerId::Category(Category::Asian)));
        assert_eq!(view.renderer().toggle_control().len(), 6);
        assert_eq!(view.renderer().marker_count(), 20);
        assert_scene_matches(&view);
    }

    #[test]
    fn test_popups_are_bound() {
        let view = view();
        let spice = view.dataset().find_by_name("Spice Garden").unwrap().id;
        let marker = view.renderer().marker(view.marker(spice).unwrap()).unwrap();
        assert!(marker.popup.as_deref().unwrap().contains("Spice Garden"));
        assert!(marker.icon.vegetarian);
    }

    #[test]
    fn test_apply_filter_is_idempotent() {
        let mut view = view();
        let once = view.apply_filter("italian").clone();
        let twice = view.apply_filter("italian").clone();
        assert_eq!(once, twice);
        assert_scene_matches(&view);
    }

    #[test]
    fn test_filter_respects_hidden_layer() {
        let mut view = view();
        view.set_layer_visible(LayerId::Category(Category::Asian), false).unwrap();
        view.apply_filter("thai");
        assert!(view.visible().is_empty());
        assert_scene_matches(&view);
    }

    #[test]
    fn test_layer_toggle_respects_filter() {
        let mut view = view();
        view.apply_filter("mexican");
        view.set_layer_visible(LayerId::Category(Category::Asian), false).unwrap();
        view.set_layer_visible(LayerId::Category(Category::Asian), true).unwrap();
        assert_eq!(names(&view), vec!["Taco Fiesta".to_string()]);
        assert_scene_matches(&view);
    }

    #[test]
    fn test_overlay_reveals_vegetarian_records_of_hidden_categories() {
        let mut view = view();
        view.set_layer_visible(LayerId::Category(Category::Asian), false).unwrap();
        assert!(!names(&view).contains(&"Spice Garden".to_string()));

        view.toggle_layer(LayerId::VegetarianOverlay).unwrap();
        assert!(names(&view).contains(&"Spice Garden".to_string()));
        assert!(!names(&view).contains(&"Golden Wok".to_string()));
        assert_scene_matches(&view);
    }

    #[test]
    fn test_teardown_clears_renderer() {
        let view = view();
        let scene = view.teardown();
        assert_eq!(scene.marker_count(), 0);
        assert!(scene.markers_on_view().is_empty());
    }

    #[test]
    fn test_hiding_category_keeps_overlay_markers_drawn() {
        let mut view = view();
        view.set_layer_visible(LayerId::VegetarianOverlay, true).unwrap();
        view.set_layer_visible(LayerId::Category(Category::Asian), false).unwrap();
        assert!(names(&view).contains(&"Spice Garden".to_string()));
        assert_scene_matches(&view);
    }

    #[test]
    fn test_hiding_overlay_keeps_category_markers_drawn() {
        let mut view = view();
        view.toggle_layer(LayerId::VegetarianOverlay).unwrap();
        view.toggle_layer(LayerId::VegetarianOverlay).unwrap();
        assert_eq!(view.visible().len(), 20);
        assert_eq!(view.renderer().markers_on_view().len(), 20);
        assert_scene_matches(&view);
    }

    #[test]
    fn test_unbacked_layer_id_is_rejected() {
        let mut view = view();
        let before = view.visible().clone();
        let result = view.set_layer_visible(LayerId::Category(Category::VeganVegetarian), true);
        assert!(matches!(result, Err(MapError::UnknownLayer(_))));
        assert_eq!(view.visible(), &before);
    }

    #[test]
    fn test_redundant_layer_change_is_a_no_op() {
        let dataset = Arc::new(Dataset::builtin().unwrap());
        let mut view = MapView::init(dataset, LeafletScript::new()).unwrap();
        let before = view.renderer().statements().len();
        view.set_layer_visible(LayerId::Category(Category::Asian), true).unwrap();
        view.set_layer_visible(LayerId::VegetarianOverlay, false).unwrap();
        assert_eq!(view.renderer().statements().len(), before);

        view.set_layer_visible(LayerId::Category(Category::Asian), false).unwrap();
        assert!(view.renderer().statements()[before..].contains(&"map.removeLayer(g0);".to_string()));
    }
}
