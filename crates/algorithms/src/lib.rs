//! # SpatMorph Algorithms
//!
//! Morphology, aggregation and region analysis on spatial lattices.
//!
//! ## Available Algorithm Categories
//!
//! - **morphology**: Structuring elements, erosion, dilation, opening, closing,
//!   threshold, area opening/closing, labeling, reconstruction
//! - **aggregation**: Point events to per-site signal
//! - **pipeline**: Declarative chains of stages
//! - **regions**: Microregions, distance layers, shape features

pub mod aggregation;
pub mod morphology;
pub mod pipeline;
pub mod regions;

pub(crate) mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregation::{aggregate, Aggregate, AggregateParams, AggregationRule, Binning};
    pub use crate::morphology::{
        area_closing, area_opening, close_open, closing, connected_components, dilate, erode,
        geodesic_dilate, geodesic_erode, label, open_close, opening, reconstruct_by_dilation,
        reconstruct_by_erosion, threshold, Morphable, StructuringElement,
    };
    pub use crate::pipeline::{DataKind, Pipeline, PipelineInput, Stage};
    pub use crate::regions::{
        distance_layer, extract_microregions, geodesic_centers, inward_signed_layers, roundness,
        selected_signed_layers, signed_layers, site_attributes, ultimate_centers, DistanceLayer,
        LayerOrientation, LayerSelection, Microregion, RegionSummary, SiteAttributes, UNREACHABLE,
    };
    pub use spatmorph_core::prelude::*;
}
