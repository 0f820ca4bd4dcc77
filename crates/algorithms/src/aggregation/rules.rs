//! How point events become site values

use serde::{Deserialize, Serialize};

/// Combination of selected events at one site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationRule {
    /// Total count over all selected features
    #[default]
    Sum,
    /// Per-feature totals, then the largest of them
    Maximum,
    /// Number of selected events, ignoring their multiplicity
    Count,
}

/// Assignment of a point to sites
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    /// Every site whose center lies within the radius (inclusive)
    #[default]
    Radius,
    /// Only the nearest site center, and only if it lies within the radius
    Nearest,
}

impl AggregationRule {
    pub fn name(&self) -> &'static str {
        match self {
            AggregationRule::Sum => "sum",
            AggregationRule::Maximum => "maximum",
            AggregationRule::Count => "count",
        }
    }
}

impl Binning {
    pub fn name(&self) -> &'static str {
        match self {
            Binning::Radius => "radius",
            Binning::Nearest => "nearest",
        }
    }
}
