//! Lattice data structures: topologies, coordinates and adjacency

mod graph;
mod neighborhood;
mod topology;

pub use graph::Lattice;
pub use neighborhood::Neighborhood;
pub use topology::{Coord, CoordSystem, Topology};
