//! Main Lattice type

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lattice::{Coord, Topology};

/// A finite set of sites with exact topology-derived adjacency.
///
/// Sites are addressed by a dense index `0..len()`. Indices follow ascending
/// canonical coordinate order, independent of the order coordinates were
/// supplied in, so every algorithm iterating `sites()` is reproducible.
///
/// Adjacency is stored in compressed rows: the neighbors of site `i` are
/// `adjacency[starts[i]..starts[i + 1]]`. Coordinates are hashed only while
/// building; neighbor lookup afterwards is a slice borrow.
///
/// # Example
///
/// ```ignore
/// use spatmorph_core::lattice::{Lattice, Topology};
///
/// let lattice = Lattice::hexagon(2)?;
/// assert_eq!(lattice.len(), 19);
/// assert_eq!(lattice.neighbors(lattice.index_of([0, 0]).unwrap()).len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    topology: Topology,
    /// Physical distance between adjacent site centers
    spacing: f64,
    coords: Vec<[i32; 2]>,
    index: HashMap<[i32; 2], usize>,
    starts: Vec<usize>,
    adjacency: Vec<usize>,
}

/// `coord + offset`, or `None` when the step leaves the `i32` range.
pub(crate) fn shift(coord: [i32; 2], offset: [i32; 2]) -> Option<[i32; 2]> {
    Some([
        coord[0].checked_add(offset[0])?,
        coord[1].checked_add(offset[1])?,
    ])
}

impl Lattice {
    /// Build a lattice from site coordinates.
    ///
    /// Fails with [`Error::InvalidTopology`] if a coordinate is expressed in a
    /// system that does not match `topology`, if two coordinates name the same
    /// site, or if no coordinates are given.
    pub fn new<I>(topology: Topology, coords: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut canonical = coords
            .into_iter()
            .map(|c| c.canonical(topology))
            .collect::<Result<Vec<_>>>()?;

        if canonical.is_empty() {
            return Err(Error::InvalidTopology("lattice has no sites".to_string()));
        }

        canonical.sort_unstable();
        if let Some(pair) = canonical.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::InvalidTopology(format!(
                "two sites coincide at {:?}",
                pair[0]
            )));
        }

        Ok(Self::from_sorted(topology, canonical))
    }

    fn from_sorted(topology: Topology, coords: Vec<[i32; 2]>) -> Self {
        let index: HashMap<[i32; 2], usize> =
            coords.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let steps = topology.unit_steps();
        let mut starts = Vec::with_capacity(coords.len() + 1);
        let mut adjacency = Vec::with_capacity(coords.len() * steps.len());
        starts.push(0);

        for &[a, b] in &coords {
            for &step in steps {
                if let Some(j) = shift([a, b], step).and_then(|c| index.get(&c)) {
                    adjacency.push(*j);
                }
            }
            starts.push(adjacency.len());
        }

        Self {
            topology,
            spacing: 1.0,
            coords,
            index,
            starts,
            adjacency,
        }
    }

    /// A `rows x cols` block of a square topology.
    pub fn square_grid(rows: usize, cols: usize, topology: Topology) -> Result<Self> {
        if !topology.is_square() {
            return Err(Error::InvalidTopology(format!(
                "square_grid needs a square topology, got {}",
                topology
            )));
        }
        let coords = (0..rows as i32).flat_map(|row| {
            (0..cols as i32).map(move |col| Coord::Offset { row, col })
        });
        Self::new(topology, coords)
    }

    /// All hex sites within hex distance `radius` of the origin.
    pub fn hexagon(radius: u32) -> Result<Self> {
        let r = radius as i32;
        let coords = (-r..=r).flat_map(move |q| {
            let lo = (-r).max(-q - r);
            let hi = r.min(-q + r);
            (lo..=hi).map(move |s| Coord::Axial { q, r: s })
        });
        Self::new(Topology::Hexagonal, coords)
    }

    /// A `rows x cols` block of a hex array in doubled-width layout, where odd
    /// rows are shifted by half a site (the Visium arrangement).
    pub fn hex_rect(rows: usize, cols: usize) -> Result<Self> {
        let coords = (0..rows as i32).flat_map(|row| {
            (0..cols as i32).map(move |k| Coord::Doubled {
                row,
                col: 2 * k + row.rem_euclid(2),
            })
        });
        Self::new(Topology::Hexagonal, coords)
    }

    /// Set the physical site pitch used to place site centers.
    pub fn with_spacing(mut self, spacing: f64) -> Result<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(Error::InvalidParameter {
                name: "spacing",
                value: spacing.to_string(),
                reason: "site spacing must be positive and finite".to_string(),
            });
        }
        self.spacing = spacing;
        Ok(self)
    }

    // Dimensions

    /// Number of sites
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the lattice has no sites (never true for a constructed lattice)
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Site indices in canonical order
    pub fn sites(&self) -> std::ops::Range<usize> {
        0..self.coords.len()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    // Site access

    /// Canonical coordinate of a site (`[row, col]` square, `[q, r]` hex)
    ///
    /// # Panics
    /// Panics if `site >= self.len()`.
    pub fn coord(&self, site: usize) -> [i32; 2] {
        self.coords[site]
    }

    /// Site index of a canonical coordinate
    pub fn index_of(&self, coord: [i32; 2]) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    /// Site index of a caller coordinate, converting it to canonical form.
    pub fn locate(&self, coord: &Coord) -> Result<Option<usize>> {
        Ok(self.index_of(coord.canonical(self.topology)?))
    }

    /// The site reached from `site` by a relative canonical offset, if present
    pub fn offset_site(&self, site: usize, offset: [i32; 2]) -> Option<usize> {
        shift(self.coords[site], offset).and_then(|c| self.index_of(c))
    }

    /// Adjacent sites of `site`
    ///
    /// # Panics
    /// Panics if `site >= self.len()`.
    pub fn neighbors(&self, site: usize) -> &[usize] {
        &self.adjacency[self.starts[site]..self.starts[site + 1]]
    }

    /// Number of adjacent sites
    pub fn degree(&self, site: usize) -> usize {
        self.starts[site + 1] - self.starts[site]
    }

    /// Whether `site` has the topology's full neighbor count
    pub fn is_interior(&self, site: usize) -> bool {
        self.degree(site) == self.topology.degree()
    }

    /// Total number of undirected adjacency edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    /// Physical position of a site center
    pub fn center(&self, site: usize) -> (f64, f64) {
        self.topology.center(self.coords[site], self.spacing)
    }

    /// The site whose center is nearest to `(x, y)`, if that site exists
    pub fn nearest_site(&self, x: f64, y: f64) -> Option<usize> {
        self.index_of(self.topology.nearest_coord(x, y, self.spacing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_grid_degrees() {
        let lattice = Lattice::square_grid(5, 5, Topology::SquareEdge).unwrap();
        assert_eq!(lattice.len(), 25);
        let center = lattice.index_of([2, 2]).unwrap();
        let corner = lattice.index_of([0, 0]).unwrap();
        let edge = lattice.index_of([0, 2]).unwrap();
        assert_eq!(lattice.degree(center), 4);
        assert_eq!(lattice.degree(corner), 2);
        assert_eq!(lattice.degree(edge), 3);
        assert!(lattice.is_interior(center));
        assert!(!lattice.is_interior(edge));
        // 2 * 5 * 4 edges in a 5x5 rook grid
        assert_eq!(lattice.edge_count(), 40);

        let queen = Lattice::square_grid(3, 3, Topology::SquareFull).unwrap();
        assert_eq!(queen.degree(queen.index_of([1, 1]).unwrap()), 8);
        assert_eq!(queen.degree(queen.index_of([0, 0]).unwrap()), 3);
    }

    #[test]
    fn test_hexagon_interior_has_six_neighbors() {
        let lattice = Lattice::hexagon(2).unwrap();
        assert_eq!(lattice.len(), 19);
        for site in lattice.sites() {
            let [q, r] = lattice.coord(site);
            if Topology::Hexagonal.step_distance([q, r]) < 2 {
                assert_eq!(lattice.degree(site), 6, "site {:?}", [q, r]);
            } else {
                assert!(lattice.degree(site) < 6);
            }
        }
    }

    #[test]
    fn test_adjacency_symmetric() {
        for lattice in [
            Lattice::hexagon(3).unwrap(),
            Lattice::hex_rect(4, 5).unwrap(),
            Lattice::square_grid(4, 6, Topology::SquareFull).unwrap(),
        ] {
            for a in lattice.sites() {
                for &b in lattice.neighbors(a) {
                    assert!(lattice.neighbors(b).contains(&a));
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_order_independent_of_input() {
        let forward = Lattice::new(
            Topology::SquareEdge,
            [(0, 0), (0, 1), (1, 0)].map(|(row, col)| Coord::Offset { row, col }),
        )
        .unwrap();
        let backward = Lattice::new(
            Topology::SquareEdge,
            [(1, 0), (0, 1), (0, 0)].map(|(row, col)| Coord::Offset { row, col }),
        )
        .unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.coord(0), [0, 0]);
        assert_eq!(forward.coord(2), [1, 0]);
    }

    #[test]
    fn test_duplicate_sites_rejected() {
        let result = Lattice::new(
            Topology::Hexagonal,
            [Coord::Axial { q: 1, r: 0 }, Coord::Cube { x: 1, y: -1, z: 0 }],
        );
        assert!(matches!(result, Err(Error::InvalidTopology(_))));
    }

    #[test]
    fn test_mismatched_system_rejected() {
        let result = Lattice::new(Topology::SquareEdge, [Coord::Axial { q: 0, r: 0 }]);
        assert!(matches!(result, Err(Error::InvalidTopology(_))));
        assert!(Lattice::square_grid(2, 2, Topology::Hexagonal).is_err());
        assert!(Lattice::new(Topology::SquareEdge, std::iter::empty()).is_err());
    }

    #[test]
    fn test_no_adjacency_across_i32_range() {
        let lattice = Lattice::new(
            Topology::SquareEdge,
            [
                Coord::Offset { row: i32::MAX, col: 0 },
                Coord::Offset { row: i32::MIN, col: 0 },
            ],
        )
        .unwrap();
        assert_eq!(lattice.degree(0), 0);
        assert_eq!(lattice.degree(1), 0);
        assert_eq!(lattice.edge_count(), 0);

        let top = lattice.index_of([i32::MAX, 0]).unwrap();
        let bottom = lattice.index_of([i32::MIN, 0]).unwrap();
        assert_eq!(lattice.offset_site(top, [1, 0]), None);
        assert_eq!(lattice.offset_site(bottom, [-1, 0]), None);
        assert_eq!(lattice.offset_site(top, [0, 0]), Some(top));
    }

    #[test]
    fn test_hex_rect_matches_visium_neighbors() {
        let lattice = Lattice::hex_rect(3, 3).unwrap();
        // Doubled (1, 3) sits in the middle of the block
        let middle = lattice
            .locate(&Coord::Doubled { row: 1, col: 3 })
            .unwrap()
            .unwrap();
        assert_eq!(lattice.degree(middle), 6);
    }

    #[test]
    fn test_nearest_site() {
        let lattice = Lattice::hexagon(1).unwrap().with_spacing(10.0).unwrap();
        let site = lattice.index_of([1, 0]).unwrap();
        let (x, y) = lattice.center(site);
        assert_relative_eq!(x, 10.0);
        assert_relative_eq!(y, 0.0);
        let (x2, y2) = lattice.center(lattice.index_of([0, 1]).unwrap());
        assert_relative_eq!(x2, 5.0);
        assert_relative_eq!(y2, 5.0 * 3f64.sqrt(), epsilon = 1e-12);
        assert_eq!(lattice.nearest_site(x + 1.0, y + 1.0), Some(site));
        assert_eq!(lattice.nearest_site(500.0, 500.0), None);
        assert!(Lattice::hexagon(1).unwrap().with_spacing(0.0).is_err());
    }
}
