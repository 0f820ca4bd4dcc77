//! Lattice topologies and site coordinate systems

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Unit steps of the square lattice with edge (rook) connectivity
const SQUARE_EDGE_STEPS: [[i32; 2]; 4] = [[-1, 0], [0, -1], [0, 1], [1, 0]];

/// Unit steps of the square lattice with full (queen) connectivity
const SQUARE_FULL_STEPS: [[i32; 2]; 8] = [
    [-1, -1],
    [-1, 0],
    [-1, 1],
    [0, -1],
    [0, 1],
    [1, -1],
    [1, 0],
    [1, 1],
];

/// The six axial hex unit vectors `(dq, dr)`
const HEX_STEPS: [[i32; 2]; 6] = [[1, 0], [1, -1], [0, -1], [-1, 0], [-1, 1], [0, 1]];

/// Adjacency rule of a lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Square grid, 4 neighbors sharing an edge
    SquareEdge,
    /// Square grid, 8 neighbors sharing an edge or a corner
    SquareFull,
    /// Hexagonal grid in axial coordinates, 6 neighbors
    Hexagonal,
}

impl Topology {
    /// Canonical unit offsets; adjacency is exactly "differs by one of these".
    pub fn unit_steps(&self) -> &'static [[i32; 2]] {
        match self {
            Topology::SquareEdge => &SQUARE_EDGE_STEPS,
            Topology::SquareFull => &SQUARE_FULL_STEPS,
            Topology::Hexagonal => &HEX_STEPS,
        }
    }

    /// Neighbor count of an interior site
    pub fn degree(&self) -> usize {
        self.unit_steps().len()
    }

    pub fn is_square(&self) -> bool {
        matches!(self, Topology::SquareEdge | Topology::SquareFull)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Topology::SquareEdge => "square_edge",
            Topology::SquareFull => "square_full",
            Topology::Hexagonal => "hexagonal",
        }
    }

    /// Number of unit steps from the origin to `offset` on the unbounded lattice.
    ///
    /// Saturates at `u32::MAX` for offsets near the ends of the `i32` range.
    pub fn step_distance(&self, offset: [i32; 2]) -> u32 {
        let a = i64::from(offset[0]);
        let b = i64::from(offset[1]);
        let steps = match self {
            Topology::SquareEdge => a.abs() + b.abs(),
            Topology::SquareFull => a.abs().max(b.abs()),
            Topology::Hexagonal => (a.abs() + b.abs() + (a + b).abs()) / 2,
        };
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Physical position of a canonical coordinate for a site pitch `spacing`.
    ///
    /// Square sites use `(col, row)`; hex sites use pointy-top axial layout.
    pub fn center(&self, coord: [i32; 2], spacing: f64) -> (f64, f64) {
        let [a, b] = coord;
        if self.is_square() {
            (b as f64 * spacing, a as f64 * spacing)
        } else {
            let q = a as f64;
            let r = b as f64;
            (
                spacing * (q + r / 2.0),
                spacing * (r * 3f64.sqrt() / 2.0),
            )
        }
    }

    /// Inverse of [`Topology::center`]: the canonical coordinate whose center
    /// is nearest to `(x, y)`.
    pub fn nearest_coord(&self, x: f64, y: f64, spacing: f64) -> [i32; 2] {
        if self.is_square() {
            return [(y / spacing).round() as i32, (x / spacing).round() as i32];
        }

        let r = y / (spacing * 3f64.sqrt() / 2.0);
        let q = x / spacing - r / 2.0;
        let s = -q - r;

        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let dq = (rq - q).abs();
        let dr = (rr - r).abs();
        let ds = (rs - s).abs();

        // Cube rounding: repair the component with the largest error
        if dq > dr && dq > ds {
            rq = -rr - rs;
        } else if dr > ds {
            rr = -rq - rs;
        }

        [rq as i32, rr as i32]
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coordinate system a site coordinate is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordSystem {
    /// `(row, col)` on a square grid
    Offset,
    /// `(q, r)` axial hex coordinates
    Axial,
    /// `(x, y, z)` cube hex coordinates with `x + y + z == 0`
    Cube,
    /// `(row, col)` doubled-width hex coordinates with `row + col` even
    Doubled,
}

impl CoordSystem {
    /// Number of integer components per coordinate
    pub fn arity(&self) -> usize {
        match self {
            CoordSystem::Cube => 3,
            _ => 2,
        }
    }

    /// Build a coordinate from raw components, checking the arity.
    pub fn coord(&self, values: &[i32]) -> Result<Coord> {
        if values.len() != self.arity() {
            return Err(Error::InvalidTopology(format!(
                "{:?} coordinates need {} components, got {:?}",
                self,
                self.arity(),
                values
            )));
        }
        Ok(match self {
            CoordSystem::Offset => Coord::Offset {
                row: values[0],
                col: values[1],
            },
            CoordSystem::Axial => Coord::Axial {
                q: values[0],
                r: values[1],
            },
            CoordSystem::Cube => Coord::Cube {
                x: values[0],
                y: values[1],
                z: values[2],
            },
            CoordSystem::Doubled => Coord::Doubled {
                row: values[0],
                col: values[1],
            },
        })
    }
}

/// A site coordinate as supplied by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coord {
    Offset { row: i32, col: i32 },
    Axial { q: i32, r: i32 },
    Cube { x: i32, y: i32, z: i32 },
    Doubled { row: i32, col: i32 },
}

impl Coord {
    pub fn system(&self) -> CoordSystem {
        match self {
            Coord::Offset { .. } => CoordSystem::Offset,
            Coord::Axial { .. } => CoordSystem::Axial,
            Coord::Cube { .. } => CoordSystem::Cube,
            Coord::Doubled { .. } => CoordSystem::Doubled,
        }
    }

    /// Convert to the canonical 2-component form used by a [`Topology`].
    ///
    /// Square topologies take `[row, col]`; the hexagonal topology takes
    /// axial `[q, r]`.
    pub fn canonical(&self, topology: Topology) -> Result<[i32; 2]> {
        match (*self, topology.is_square()) {
            (Coord::Offset { row, col }, true) => Ok([row, col]),
            (Coord::Axial { q, r }, false) => Ok([q, r]),
            (Coord::Cube { x, y, z }, false) => {
                if i64::from(x) + i64::from(y) + i64::from(z) != 0 {
                    return Err(Error::InvalidTopology(format!(
                        "cube coordinate ({}, {}, {}) does not sum to zero",
                        x, y, z
                    )));
                }
                Ok([x, z])
            }
            (Coord::Doubled { row, col }, false) => {
                let (row64, col64) = (i64::from(row), i64::from(col));
                if (row64 + col64).rem_euclid(2) != 0 {
                    return Err(Error::InvalidTopology(format!(
                        "doubled coordinate ({}, {}) has odd parity",
                        row, col
                    )));
                }
                let q = i32::try_from((col64 - row64) / 2).map_err(|_| {
                    Error::InvalidTopology(format!(
                        "doubled coordinate ({}, {}) is out of range",
                        row, col
                    ))
                })?;
                Ok([q, row])
            }
            (coord, _) => Err(Error::InvalidTopology(format!(
                "{:?} coordinates do not match {} topology",
                coord.system(),
                topology
            ))),
        }
    }
}
