//! # SpatMorph Core
//!
//! Core types, traits and I/O for the SpatMorph lattice morphology library.
//!
//! This crate provides:
//! - `Lattice`: sites with exact square or hexagonal adjacency
//! - `Neighborhood`: offsets resolved to per-site neighbor sets
//! - `Field<T>`: a real, binary or label value at every site
//! - `PointSet`: raw point events awaiting aggregation
//! - Algorithm traits for consistent API
//! - JSON I/O for sample documents

pub mod error;
pub mod field;
pub mod io;
pub mod lattice;
pub mod points;

pub use error::{Error, Result};
pub use field::{AnyField, Field, FieldElement, FieldKind};
pub use lattice::{Coord, CoordSystem, Lattice, Neighborhood, Topology};
pub use points::{PointEvent, PointSet};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{AnyField, Field, FieldElement, FieldKind};
    pub use crate::lattice::{Coord, CoordSystem, Lattice, Neighborhood, Topology};
    pub use crate::points::{PointEvent, PointSet};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in SpatMorph.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
