//! Microregion extraction from a terminal field

use std::collections::VecDeque;
use std::sync::Arc;

use spatmorph_core::{AnyField, Field, Lattice, Result};

use super::distance::{distance_layer, DistanceLayer};
use crate::morphology::label;

/// A maximal connected set of sites sharing one positive label
#[derive(Debug, Clone, PartialEq)]
pub struct Microregion {
    /// Region identifier, starting at 1
    pub id: u32,
    /// Member sites in site order
    pub sites: Vec<usize>,
    /// Members adjacent to at least one non-member, in site order
    pub boundary: Vec<usize>,
    lattice: Arc<Lattice>,
}

impl Microregion {
    fn new(id: u32, sites: Vec<usize>, lattice: Arc<Lattice>) -> Self {
        let boundary = sites
            .iter()
            .copied()
            .filter(|&s| {
                lattice
                    .neighbors(s)
                    .iter()
                    .any(|n| sites.binary_search(n).is_err())
            })
            .collect();
        Self {
            id,
            sites,
            boundary,
            lattice,
        }
    }

    /// Number of member sites
    pub fn area(&self) -> usize {
        self.sites.len()
    }

    pub fn contains(&self, site: usize) -> bool {
        self.sites.binary_search(&site).is_ok()
    }

    pub fn lattice(&self) -> &Arc<Lattice> {
        &self.lattice
    }

    /// Distance of every site to the region
    pub fn distance_layer(&self) -> Result<DistanceLayer> {
        distance_layer(&self.lattice, &self.sites)
    }

    /// Distance of every site to the region boundary
    pub fn boundary_distance_layer(&self) -> Result<DistanceLayer> {
        distance_layer(&self.lattice, &self.boundary)
    }
}

/// Extract microregions from a binary or label field.
///
/// A binary field is labeled first. In a label field each positive label is
/// split into its connected pieces, and pieces are numbered from 1 in order
/// of their lowest site, which leaves the output of
/// [`label`](crate::morphology::label) unchanged. Real fields are rejected.
pub fn extract_microregions(field: &AnyField) -> Result<Vec<Microregion>> {
    let labels = match field {
        AnyField::Binary(mask) => label(mask)?,
        AnyField::Label(labels) => labels.clone(),
        AnyField::Real(_) => return Err(field.mismatch("region extraction")),
    };
    Ok(regions_of(&labels))
}

fn regions_of(labels: &Field<u32>) -> Vec<Microregion> {
    let lattice = labels.lattice();
    let mut visited = vec![false; lattice.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut regions = Vec::new();

    for seed in lattice.sites() {
        let value = labels.at(seed);
        if value == 0 || visited[seed] {
            continue;
        }
        visited[seed] = true;
        queue.push_back(seed);
        let mut sites = Vec::new();

        while let Some(site) = queue.pop_front() {
            sites.push(site);
            for &n in lattice.neighbors(site) {
                if !visited[n] && labels.at(n) == value {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }

        sites.sort_unstable();
        let id = regions.len() as u32 + 1;
        regions.push(Microregion::new(id, sites, lattice.clone()));
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatmorph_core::{FieldKind, Topology};

    fn block_mask() -> Field<bool> {
        let lattice = Arc::new(Lattice::square_grid(5, 5, Topology::SquareEdge).unwrap());
        Field::from_fn(lattice.clone(), |s| {
            let [r, c] = lattice.coord(s);
            (1..=3).contains(&r) && (1..=3).contains(&c)
        })
    }

    #[test]
    fn test_block_region() {
        let mask = block_mask();
        let regions = extract_microregions(&mask.clone().into()).unwrap();
        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert_eq!(region.id, 1);
        assert_eq!(region.area(), 9);
        // Every member but the center touches the outside ring
        assert_eq!(region.boundary.len(), 8);
        let center = mask.lattice().index_of([2, 2]).unwrap();
        assert!(region.contains(center));
        assert!(!region.boundary.contains(&center));
    }

    #[test]
    fn test_region_filling_lattice_has_no_boundary() {
        let lattice = Arc::new(Lattice::hexagon(1).unwrap());
        let mask = Field::filled(lattice, true);
        let regions = extract_microregions(&mask.into()).unwrap();
        assert_eq!(regions[0].area(), 7);
        assert!(regions[0].boundary.is_empty());
    }

    #[test]
    fn test_split_label_becomes_two_regions() {
        let lattice = Arc::new(Lattice::square_grid(1, 5, Topology::SquareEdge).unwrap());
        let labels = Field::from_vec(lattice, vec![4u32, 0, 4, 4, 2]).unwrap();
        let regions = extract_microregions(&labels.into()).unwrap();
        let areas: Vec<_> = regions.iter().map(|r| (r.id, r.area())).collect();
        assert_eq!(areas, vec![(1, 1), (2, 2), (3, 1)]);
    }

    #[test]
    fn test_region_distance_layers() {
        let mask = block_mask();
        let region = extract_microregions(&mask.clone().into()).unwrap().remove(0);
        let to_region = region.distance_layer().unwrap();
        let to_boundary = region.boundary_distance_layer().unwrap();
        let lattice = mask.lattice();
        let corner = lattice.index_of([0, 0]).unwrap();
        let center = lattice.index_of([2, 2]).unwrap();
        assert_eq!(to_region.distance(corner), Some(2));
        assert_eq!(to_region.distance(center), Some(0));
        assert_eq!(to_boundary.distance(center), Some(1));
    }

    #[test]
    fn test_real_field_rejected() {
        let lattice = Arc::new(Lattice::hexagon(1).unwrap());
        let real: AnyField = Field::filled(lattice, 1.0).into();
        assert!(matches!(
            extract_microregions(&real),
            Err(spatmorph_core::Error::TypeMismatch {
                kind: FieldKind::Real,
                ..
            })
        ));
    }
}
