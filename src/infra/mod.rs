pub mod leaflet;
pub mod scene;
