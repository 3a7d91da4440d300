use crate::presentation::MarkerIcon;
use crate::types::Coordinates;

/// Opaque handle to a marker created by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub usize);

/// Opaque handle to a layer group created by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerHandle(pub usize);

/// Mapping library seam. The map view decides what is shown; implementations only draw it.
pub trait MapRenderer {
    /// `svg` is the rendered `icon`, produced by the caller so template errors propagate.
    fn add_marker(&mut self, position: Coordinates, icon: &MarkerIcon, svg: &str) -> MarkerHandle;

    fn bind_popup(&mut self, marker: MarkerHandle, html: &str);

    fn group_layers(&mut self, name: &str) -> LayerHandle;

    fn add_marker_to_layer(&mut self, layer: LayerHandle, marker: MarkerHandle);

    fn remove_marker_from_layer(&mut self, layer: LayerHandle, marker: MarkerHandle);

    fn add_layer_to_view(&mut self, layer: LayerHandle);

    /// Hiding a layer takes all of its markers off the view, including ones
    /// another shown layer still holds.
    fn remove_layer_from_view(&mut self, layer: LayerHandle);

    fn add_marker_to_view(&mut self, marker: MarkerHandle);

    fn remove_marker_from_view(&mut self, marker: MarkerHandle);

    fn register_layer_toggle_control(&mut self, layers: &[(String, LayerHandle)]);

    /// Drop every marker and layer
    fn clear(&mut self) {}
}
