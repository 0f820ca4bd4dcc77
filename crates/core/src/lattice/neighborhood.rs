//! Per-site neighbor sets resolved from relative offsets

use super::Lattice;

/// A set of relative offsets materialized on a concrete lattice.
///
/// For every site, holds the indices of the sites reached by the offsets that
/// actually exist in the lattice. Offsets falling outside the lattice are
/// dropped: there is no wraparound and no synthetic padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    starts: Vec<usize>,
    members: Vec<usize>,
}

impl Neighborhood {
    /// Resolve `offsets` (canonical coordinate deltas) at every site of `lattice`.
    pub fn from_offsets(lattice: &Lattice, offsets: &[[i32; 2]]) -> Self {
        let mut starts = Vec::with_capacity(lattice.len() + 1);
        let mut members = Vec::with_capacity(lattice.len() * offsets.len());
        starts.push(0);

        for site in lattice.sites() {
            members.extend(
                offsets
                    .iter()
                    .filter_map(|&offset| lattice.offset_site(site, offset)),
            );
            starts.push(members.len());
        }

        Self { starts, members }
    }

    /// Sites covered by the neighborhood centered at `site`
    ///
    /// # Panics
    /// Panics if `site` is not a site of the resolving lattice.
    pub fn of(&self, site: usize) -> &[usize] {
        &self.members[self.starts[site]..self.starts[site + 1]]
    }

    /// Number of sites the neighborhood was resolved for
    pub fn len(&self) -> usize {
        self.starts.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every site resolved to an empty neighbor set
    pub fn is_vacant(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Topology;

    const CROSS: [[i32; 2]; 5] = [[0, 0], [-1, 0], [1, 0], [0, -1], [0, 1]];

    #[test]
    fn test_neighborhood_clipped_at_boundary() {
        let lattice = Lattice::square_grid(3, 3, Topology::SquareEdge).unwrap();
        let hood = Neighborhood::from_offsets(&lattice, &CROSS);
        assert_eq!(hood.len(), 9);

        let center = lattice.index_of([1, 1]).unwrap();
        assert_eq!(hood.of(center).len(), 5);

        // Corner keeps itself and its two in-lattice arms only
        let corner = lattice.index_of([0, 0]).unwrap();
        let mut found = hood.of(corner).to_vec();
        found.sort_unstable();
        let mut expected = vec![
            corner,
            lattice.index_of([1, 0]).unwrap(),
            lattice.index_of([0, 1]).unwrap(),
        ];
        expected.sort_unstable();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_vacant_neighborhood() {
        let lattice = Lattice::square_grid(1, 1, Topology::SquareEdge).unwrap();
        let hood = Neighborhood::from_offsets(&lattice, &[[0, 1], [1, 0]]);
        assert!(hood.is_vacant());
        assert!(hood.of(0).is_empty());
    }
}
