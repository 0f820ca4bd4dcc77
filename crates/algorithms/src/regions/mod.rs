//! Region and distance extraction
//!
//! Turns a terminal binary or label field into microregions, and measures
//! every site against them with geodesic distance layers.

mod attributes;
mod distance;
mod features;
mod microregion;

pub use attributes::{site_attributes, SiteAttributes};
pub use distance::{
    distance_layer, distance_layer_within, inward_signed_layers, selected_signed_layers, signed_layers,
    DistanceLayer, LayerOrientation, LayerSelection, UNREACHABLE,
};
pub use features::{eccentricities, geodesic_centers, region_areas, roundness, ultimate_centers, RegionSummary};
pub use microregion::{extract_microregions, Microregion};
