//! Per-site derived attribute table

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spatmorph_core::{Error, Field, Lattice, Result};

use super::distance::{distance_layer, signed_layers};
use super::microregion::Microregion;

/// Derived attributes of one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAttributes {
    pub site: usize,
    /// Canonical coordinate
    pub coord: [i32; 2],
    /// Id of the containing region, if any
    pub region: Option<u32>,
    /// Edge count to the nearest region site; `None` if no region is reachable
    pub distance: Option<u32>,
    /// Signed layer: negative inside a region, positive outside
    pub layer: Option<i64>,
}

/// Attribute rows for every site of `lattice`, in site order.
pub fn site_attributes(lattice: &Arc<Lattice>, regions: &[Microregion]) -> Result<Vec<SiteAttributes>> {
    let mut owner: Vec<Option<u32>> = vec![None; lattice.len()];
    for region in regions {
        if !Arc::ptr_eq(region.lattice(), lattice) && **region.lattice() != **lattice {
            return Err(Error::LatticeMismatch);
        }
        for &site in &region.sites {
            owner[site] = Some(region.id);
        }
    }

    let members: Vec<usize> = lattice.sites().filter(|&s| owner[s].is_some()).collect();
    let distances = distance_layer(lattice, &members)?;
    let mask = Field::from_fn(lattice.clone(), |s| owner[s].is_some());
    let layers = signed_layers(&mask)?;

    Ok(lattice
        .sites()
        .zip(layers)
        .map(|(site, layer)| SiteAttributes {
            site,
            coord: lattice.coord(site),
            region: owner[site],
            distance: distances.distance(site),
            layer,
        })
        .collect())
}
