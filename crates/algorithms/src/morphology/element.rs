//! Structuring element definitions for morphological operations
//!
//! A structuring element is a set of relative offsets in the canonical
//! coordinates of a topology. Resolving it against a lattice yields the
//! concrete, boundary-clipped neighbor set of every site.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use spatmorph_core::lattice::{Lattice, Neighborhood, Topology};
use spatmorph_core::{Error, Result};

/// Shape of a structuring element for morphological operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum StructuringElement {
    /// The origin and its unit steps under whatever topology it is used on
    #[default]
    Unit,
    /// Square of Chebyshev radius `radius` (side = 2*radius + 1); square topologies
    Square { radius: u32 },
    /// Plus-shaped element with arms of length `radius`; square topologies
    Cross { radius: u32 },
    /// Euclidean disk of given radius; square topologies
    Disk { radius: u32 },
    /// All sites within hex distance `radius`; hexagonal topology
    Hexagon { radius: u32 },
    /// Explicit canonical offsets
    Custom { offsets: Vec<[i32; 2]> },
}

impl StructuringElement {
    /// Validate the element against `topology`, returning an error for
    /// shapes that cannot be realized on it.
    pub fn validate(&self, topology: Topology) -> Result<()> {
        match self {
            StructuringElement::Unit => Ok(()),
            StructuringElement::Square { radius }
            | StructuringElement::Cross { radius }
            | StructuringElement::Disk { radius } => {
                check_radius(*radius)?;
                if !topology.is_square() {
                    return Err(Error::InvalidShape(format!(
                        "{} needs a square topology, got {}",
                        self.name(),
                        topology
                    )));
                }
                Ok(())
            }
            StructuringElement::Hexagon { radius } => {
                check_radius(*radius)?;
                if topology != Topology::Hexagonal {
                    return Err(Error::InvalidShape(format!(
                        "hexagon needs the hexagonal topology, got {}",
                        topology
                    )));
                }
                Ok(())
            }
            StructuringElement::Custom { offsets } => {
                if offsets.is_empty() {
                    return Err(Error::EmptyStructuringElement);
                }
                check_reachable(offsets, topology)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StructuringElement::Unit => "unit",
            StructuringElement::Square { .. } => "square",
            StructuringElement::Cross { .. } => "cross",
            StructuringElement::Disk { .. } => "disk",
            StructuringElement::Hexagon { .. } => "hexagon",
            StructuringElement::Custom { .. } => "custom",
        }
    }

    /// Largest step distance of any offset from the origin
    pub fn radius(&self, topology: Topology) -> u32 {
        match self {
            StructuringElement::Unit => 1,
            StructuringElement::Square { radius }
            | StructuringElement::Cross { radius }
            | StructuringElement::Disk { radius }
            | StructuringElement::Hexagon { radius } => *radius,
            StructuringElement::Custom { offsets } => offsets
                .iter()
                .map(|&o| topology.step_distance(o))
                .max()
                .unwrap_or(0),
        }
    }

    /// Canonical offsets of the element on `topology`, sorted and deduplicated
    pub fn offsets(&self, topology: Topology) -> Vec<[i32; 2]> {
        let set: BTreeSet<[i32; 2]> = match self {
            StructuringElement::Unit => std::iter::once([0, 0])
                .chain(topology.unit_steps().iter().copied())
                .collect(),
            StructuringElement::Square { radius } => {
                let r = *radius as i32;
                (-r..=r)
                    .flat_map(|a| (-r..=r).map(move |b| [a, b]))
                    .collect()
            }
            StructuringElement::Cross { radius } => {
                let r = *radius as i32;
                (-r..=r).flat_map(|d| [[d, 0], [0, d]]).collect()
            }
            StructuringElement::Disk { radius } => {
                let r = *radius as i32;
                (-r..=r)
                    .flat_map(|a| (-r..=r).map(move |b| [a, b]))
                    .filter(|&[a, b]| {
                        let (a, b, r) = (i64::from(a), i64::from(b), i64::from(r));
                        a * a + b * b <= r * r
                    })
                    .collect()
            }
            StructuringElement::Hexagon { radius } => {
                let r = *radius as i32;
                (-r..=r)
                    .flat_map(|q| (-r..=r).map(move |s| [q, s]))
                    .filter(|&o| Topology::Hexagonal.step_distance(o) <= r as u32)
                    .collect()
            }
            StructuringElement::Custom { offsets } => offsets.iter().copied().collect(),
        };
        set.into_iter().collect()
    }

    /// Offsets mirrored through the origin
    pub fn reflected_offsets(&self, topology: Topology) -> Vec<[i32; 2]> {
        let mut offsets: Vec<[i32; 2]> = self
            .offsets(topology)
            .into_iter()
            .map(|[a, b]| [-a, -b])
            .collect();
        offsets.sort_unstable();
        offsets
    }

    /// Whether the element equals its reflection
    pub fn is_symmetric(&self, topology: Topology) -> bool {
        self.offsets(topology) == self.reflected_offsets(topology)
    }

    /// Materialize the element at every site of `lattice`.
    pub fn resolve(&self, lattice: &Lattice) -> Result<Neighborhood> {
        self.validate(lattice.topology())?;
        non_vacant(Neighborhood::from_offsets(
            lattice,
            &self.offsets(lattice.topology()),
        ))
    }

    /// Materialize the reflected element at every site of `lattice`.
    pub fn resolve_reflected(&self, lattice: &Lattice) -> Result<Neighborhood> {
        self.validate(lattice.topology())?;
        non_vacant(Neighborhood::from_offsets(
            lattice,
            &self.reflected_offsets(lattice.topology()),
        ))
    }
}

fn check_radius(radius: u32) -> Result<()> {
    if radius == 0 {
        return Err(Error::InvalidShape(
            "structuring element radius must be at least 1".to_string(),
        ));
    }
    if i32::try_from(radius).is_err() {
        return Err(Error::InvalidShape(format!(
            "structuring element radius {} is out of range",
            radius
        )));
    }
    Ok(())
}

/// Every offset must be reachable from the origin by unit steps that stay
/// inside the element.
fn check_reachable(offsets: &[[i32; 2]], topology: Topology) -> Result<()> {
    let members: HashSet<[i32; 2]> = offsets.iter().copied().collect();
    let mut seen: HashSet<[i32; 2]> = HashSet::new();
    let mut queue: VecDeque<[i32; 2]> = VecDeque::new();
    seen.insert([0, 0]);
    queue.push_back([0, 0]);

    while let Some([a, b]) = queue.pop_front() {
        for &[da, db] in topology.unit_steps() {
            let next = match (a.checked_add(da), b.checked_add(db)) {
                (Some(na), Some(nb)) => [na, nb],
                _ => continue,
            };
            if members.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    match offsets.iter().find(|o| !seen.contains(*o)) {
        Some(o) => Err(Error::InvalidShape(format!(
            "offset {:?} is not reachable from the origin by {} unit steps within the element",
            o, topology
        ))),
        None => Ok(()),
    }
}

fn non_vacant(hood: Neighborhood) -> Result<Neighborhood> {
    if hood.is_vacant() {
        return Err(Error::EmptyStructuringElement);
    }
    Ok(hood)
}
