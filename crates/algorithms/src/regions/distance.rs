//! Geodesic distance layers over lattice adjacency
//!
//! Distances count adjacency edges. Sites in a lattice partition that holds
//! no reference site carry [`UNREACHABLE`]; this is a value, not an error,
//! since a section may consist of several disjoint tissue pieces.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Error, Field, Lattice, Result};

/// Distance of a site with no path to the reference set
pub const UNREACHABLE: u32 = u32::MAX;

/// Minimum edge count from every site to a reference set
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceLayer {
    lattice: Arc<Lattice>,
    distances: Array1<u32>,
}

impl DistanceLayer {
    pub fn lattice(&self) -> &Arc<Lattice> {
        &self.lattice
    }

    /// Distance of `site`, `None` if unreachable
    ///
    /// # Panics
    /// Panics if `site` is out of bounds.
    pub fn distance(&self, site: usize) -> Option<u32> {
        let d = self.distances[site];
        (d != UNREACHABLE).then_some(d)
    }

    /// Raw distances with the [`UNREACHABLE`] sentinel
    pub fn distances(&self) -> &Array1<u32> {
        &self.distances
    }

    /// Level set at distance `k`, in site order
    pub fn layer(&self, k: u32) -> Vec<usize> {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == k && d != UNREACHABLE)
            .map(|(site, _)| site)
            .collect()
    }

    /// Largest finite distance, `None` if no site is reachable
    pub fn max_finite(&self) -> Option<u32> {
        self.distances
            .iter()
            .copied()
            .filter(|&d| d != UNREACHABLE)
            .max()
    }

    pub fn unreachable_count(&self) -> usize {
        self.distances.iter().filter(|&&d| d == UNREACHABLE).count()
    }
}

/// Multi-source breadth-first search from `reference`.
///
/// Every reference site has distance 0; duplicates are ignored. An empty
/// reference set leaves every site unreachable.
pub fn distance_layer(lattice: &Arc<Lattice>, reference: &[usize]) -> Result<DistanceLayer> {
    search(lattice, reference, None)
}

/// [`distance_layer`] with paths confined to the foreground of `tissue`.
///
/// Sites outside the tissue are unreachable and never relay a path;
/// reference sites outside it are ignored.
pub fn distance_layer_within(
    lattice: &Arc<Lattice>,
    reference: &[usize],
    tissue: &Field<bool>,
) -> Result<DistanceLayer> {
    if !Arc::ptr_eq(tissue.lattice(), lattice) && **tissue.lattice() != **lattice {
        return Err(Error::LatticeMismatch);
    }
    search(lattice, reference, Some(tissue))
}

fn search(lattice: &Arc<Lattice>, reference: &[usize], tissue: Option<&Field<bool>>) -> Result<DistanceLayer> {
    let n = lattice.len();
    let open = |site: usize| tissue.map_or(true, |t| t.at(site));
    let mut distances = Array1::from_elem(n, UNREACHABLE);
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &site in reference {
        if site >= n {
            return Err(Error::SiteOutOfBounds { site, len: n });
        }
        if open(site) && distances[site] == UNREACHABLE {
            distances[site] = 0;
            queue.push_back(site);
        }
    }

    while let Some(site) = queue.pop_front() {
        let next = distances[site] + 1;
        for &neighbor in lattice.neighbors(site) {
            if open(neighbor) && distances[neighbor] == UNREACHABLE {
                distances[neighbor] = next;
                queue.push_back(neighbor);
            }
        }
    }

    Ok(DistanceLayer {
        lattice: lattice.clone(),
        distances,
    })
}

/// Which side of a region carries positive layer indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerOrientation {
    /// Positive outside the region, negative inside
    #[default]
    Outward,
    /// Positive inside the region, negative outside
    Inward,
}

/// Which sites form the region, and which take part at all
#[derive(Debug, Clone, Default)]
pub struct LayerSelection {
    /// Labels counted as region; `None` takes every positive label.
    /// A binary field counts its foreground as label 1.
    pub labels: Option<BTreeSet<u32>>,
    /// Sites outside this mask are left out of every path and get `None`
    pub tissue: Option<Field<bool>>,
}

impl LayerSelection {
    /// Region mask of `field` under this selection, restricted to the tissue
    pub fn region_mask(&self, field: &AnyField) -> Result<Field<bool>> {
        let selected = match (field, &self.labels) {
            (AnyField::Real(_), _) => return Err(field.mismatch("layer selection")),
            (_, None) => field.mask(),
            (AnyField::Binary(mask), Some(labels)) => {
                let keep = labels.contains(&1);
                mask.map(|v| v && keep)
            }
            (AnyField::Label(values), Some(labels)) => values.map(|v| v != 0 && labels.contains(&v)),
        };

        match &self.tissue {
            None => Ok(selected),
            Some(tissue) => {
                if !tissue.same_lattice(&selected) {
                    return Err(Error::LatticeMismatch);
                }
                selected.with_values(selected.iter().zip(tissue.iter()).map(|(a, b)| a && b).collect())
            }
        }
    }
}

/// Signed layer index of every site relative to the foreground of `mask`.
///
/// Background sites get `+d`, their distance to the nearest foreground site.
/// Foreground sites get `-d`, their distance to the nearest background site,
/// so the outermost ring of a region is `-1` and the first ring around it
/// is `+1`. Sites with no path to the opposite class are `None`.
pub fn signed_layers(mask: &Field<bool>) -> Result<Vec<Option<i64>>> {
    layers_of(mask, None, LayerOrientation::Outward)
}

/// [`signed_layers`] with the signs flipped: `+d` inside, `-d` outside.
pub fn inward_signed_layers(mask: &Field<bool>) -> Result<Vec<Option<i64>>> {
    layers_of(mask, None, LayerOrientation::Inward)
}

/// Signed layers of the region chosen by `selection` in a binary or label
/// field.
///
/// With a tissue mask, distances only run through tissue sites and sites
/// outside the tissue are `None`.
pub fn selected_signed_layers(
    field: &AnyField,
    selection: &LayerSelection,
    orientation: LayerOrientation,
) -> Result<Vec<Option<i64>>> {
    let region = selection.region_mask(field)?;
    layers_of(&region, selection.tissue.as_ref(), orientation)
}

fn layers_of(
    mask: &Field<bool>,
    tissue: Option<&Field<bool>>,
    orientation: LayerOrientation,
) -> Result<Vec<Option<i64>>> {
    let lattice = mask.lattice();
    let open = |site: usize| tissue.map_or(true, |t| t.at(site));
    let inside = mask.foreground_sites();
    let outside: Vec<usize> = lattice.sites().filter(|&s| !mask.at(s) && open(s)).collect();

    let to_inside = search(lattice, &inside, tissue)?;
    let to_outside = search(lattice, &outside, tissue)?;
    let sign: i64 = match orientation {
        LayerOrientation::Outward => 1,
        LayerOrientation::Inward => -1,
    };

    Ok(lattice
        .sites()
        .map(|site| {
            if !open(site) {
                None
            } else if mask.at(site) {
                to_outside.distance(site).map(|d| -sign * i64::from(d))
            } else {
                to_inside.distance(site).map(|d| sign * i64::from(d))
            }
        })
        .collect())
}
