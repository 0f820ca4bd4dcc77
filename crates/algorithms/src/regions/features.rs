//! Shape descriptors of microregions
//!
//! All measures are geodesic: paths may only pass through member sites.

use std::collections::{BTreeMap, VecDeque};
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use spatmorph_core::{Field, Result};

use super::microregion::Microregion;
use crate::maybe_rayon::map_sites;
use crate::morphology::{erode_with, reconstruct_by_dilation_with, StructuringElement};

/// Geodesic eccentricity of every member, aligned with `region.sites`.
///
/// The eccentricity of a member is its largest in-region distance to any
/// other member.
pub fn eccentricities(region: &Microregion) -> Vec<u32> {
    let lattice = region.lattice();
    let members = &region.sites;
    let local = |site: usize| members.binary_search(&site).ok();

    map_sites(members.len(), |start| {
        let mut dist = vec![u32::MAX; members.len()];
        let mut queue: VecDeque<usize> = VecDeque::new();
        dist[start] = 0;
        queue.push_back(start);
        let mut farthest = 0;

        while let Some(i) = queue.pop_front() {
            farthest = farthest.max(dist[i]);
            for &n in lattice.neighbors(members[i]) {
                if let Some(j) = local(n) {
                    if dist[j] == u32::MAX {
                        dist[j] = dist[i] + 1;
                        queue.push_back(j);
                    }
                }
            }
        }
        farthest
    })
}

/// Members of minimum geodesic eccentricity, in site order
pub fn geodesic_centers(region: &Microregion) -> Vec<usize> {
    let ecc = eccentricities(region);
    let Some(&min) = ecc.iter().min() else {
        return Vec::new();
    };
    region
        .sites
        .iter()
        .zip(&ecc)
        .filter(|(_, &e)| e == min)
        .map(|(&s, _)| s)
        .collect()
}

/// `4 * area / (pi * diameter^2)` with the geodesic diameter in edges.
///
/// Near 1 for compact regions and smaller for elongated ones. `None` for a
/// single-site region, whose diameter is zero.
pub fn roundness(region: &Microregion) -> Option<f64> {
    let diameter = eccentricities(region).into_iter().max()?;
    if diameter == 0 {
        return None;
    }
    let d = f64::from(diameter);
    Some(4.0 * region.area() as f64 / (PI * d * d))
}

/// Ultimate erosion centers of a region, in site order.
///
/// The region is eroded repeatedly. At each step, members whose whole
/// connected piece vanishes under the next erosion (the eroded set, rebuilt
/// inside the current one, does not reach them) are centers. A piece that
/// erosion no longer shrinks, such as a region covering its whole lattice,
/// contributes all of its members.
pub fn ultimate_centers(region: &Microregion, element: &StructuringElement) -> Result<Vec<usize>> {
    let lattice = region.lattice();
    let hood = element.resolve(lattice)?;
    let reflected = element.resolve_reflected(lattice)?;

    let mut current = Field::from_fn(lattice.clone(), |s| region.contains(s));
    let mut centers = Vec::new();
    while current.count_foreground() > 0 {
        let shrunk = erode_with(&current, &hood)?;
        // Offsets without the origin may reach outside the current set
        let eroded = current.with_values(
            current.iter().zip(shrunk.iter()).map(|(a, b)| a && b).collect(),
        )?;
        if eroded == current {
            centers.extend(current.foreground_sites());
            break;
        }
        let rebuilt = reconstruct_by_dilation_with(&eroded, &current, &reflected)?;
        centers.extend(lattice.sites().filter(|&s| current.at(s) && !rebuilt.at(s)));
        current = eroded;
    }
    centers.sort_unstable();
    Ok(centers)
}

/// Area per region id
pub fn region_areas(regions: &[Microregion]) -> BTreeMap<u32, usize> {
    regions.iter().map(|r| (r.id, r.area())).collect()
}

/// Reportable description of one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub id: u32,
    pub area: usize,
    pub boundary_size: usize,
    /// Canonical coordinates of the geodesic centers
    pub centers: Vec<[i32; 2]>,
    pub roundness: Option<f64>,
}

impl RegionSummary {
    pub fn of(region: &Microregion) -> Self {
        let lattice = region.lattice();
        Self {
            id: region.id,
            area: region.area(),
            boundary_size: region.boundary.len(),
            centers: geodesic_centers(region)
                .into_iter()
                .map(|s| lattice.coord(s))
                .collect(),
            roundness: roundness(region),
        }
    }
}
