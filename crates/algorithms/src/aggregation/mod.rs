//! Point-to-lattice aggregation
//!
//! Bins raw point events (transcripts, detections) into a per-site real
//! field, the entry point of most pipelines.

mod aggregate;
mod rules;

pub use aggregate::{aggregate, Aggregate, AggregateParams};
pub use rules::{AggregationRule, Binning};
