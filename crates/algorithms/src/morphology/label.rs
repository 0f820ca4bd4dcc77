//! Connected-component labeling ("blob extraction")
//!
//! Components are maximal sets of foreground sites connected through the
//! lattice adjacency. The structuring element plays no part here.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

/// Parameters for labeling (none; kept for a uniform stage shape)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelParams {}

/// Labeling algorithm
#[derive(Debug, Clone, Default)]
pub struct Label;

impl Algorithm for Label {
    type Input = AnyField;
    type Output = AnyField;
    type Params = LabelParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Label"
    }

    fn description(&self) -> &'static str {
        "Label connected foreground components with 1, 2, ... in site order"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        let mask = input.as_binary("labeling")?;
        Ok(label(mask)?.into())
    }
}

/// Connected components of the sites where `member(site)` holds.
///
/// Components are returned in order of their smallest site index and each
/// component's sites are sorted, so the result depends only on the lattice
/// and the membership predicate.
pub fn connected_components<F>(field: &Field<bool>, member: F) -> Vec<Vec<usize>>
where
    F: Fn(bool) -> bool,
{
    let lattice = field.lattice();
    let n = lattice.len();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for seed in lattice.sites() {
        if visited[seed] || !member(field.at(seed)) {
            continue;
        }
        visited[seed] = true;
        queue.push_back(seed);
        let mut component = Vec::new();

        while let Some(site) = queue.pop_front() {
            component.push(site);
            for &n in lattice.neighbors(site) {
                if !visited[n] && member(field.at(n)) {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}

/// Assign labels `1..` to foreground components, `0` to background.
///
/// The component containing the lowest-indexed foreground site gets label 1,
/// and so on, so labels are reproducible across runs.
pub fn label(mask: &Field<bool>) -> Result<Field<u32>> {
    let components = connected_components(mask, |v| v);
    let mut labels = vec![0u32; mask.len()];
    for (id, component) in components.iter().enumerate() {
        let id = u32::try_from(id + 1).map_err(|_| Error::InvalidParameter {
            name: "components",
            value: components.len().to_string(),
            reason: "too many components for u32 labels".to_string(),
        })?;
        for &site in component {
            labels[site] = id;
        }
    }
    mask.with_values(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use spatmorph_core::{Lattice, Topology};

    fn mask(rows: usize, cols: usize, topology: Topology, on: &[[i32; 2]]) -> Field<bool> {
        let lattice = Arc::new(Lattice::square_grid(rows, cols, topology).unwrap());
        Field::from_fn(lattice.clone(), |s| on.contains(&lattice.coord(s)))
    }

    #[test]
    fn test_label_two_components() {
        let field = mask(3, 4, Topology::SquareEdge, &[[0, 3], [1, 3], [2, 0]]);
        let labels = label(&field).unwrap().into_vec();
        // Site (0,3) comes first in canonical order
        assert_eq!(labels, vec![0, 0, 0, 1, 0, 0, 0, 1, 2, 0, 0, 0]);
    }

    #[test]
    fn test_diagonal_depends_on_topology() {
        let on = [[0, 0], [1, 1]];
        let edge = label(&mask(2, 2, Topology::SquareEdge, &on)).unwrap();
        let full = label(&mask(2, 2, Topology::SquareFull, &on)).unwrap();
        assert_eq!(edge.iter().max(), Some(2));
        assert_eq!(full.iter().max(), Some(1));
    }

    #[test]
    fn test_background_components() {
        let field = mask(3, 3, Topology::SquareEdge, &[[0, 1], [1, 0], [1, 2], [2, 1]]);
        let holes = connected_components(&field, |v| !v);
        // Four corners and the center are isolated background sites
        assert_eq!(holes.len(), 5);
        assert!(holes.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_label_empty_mask() {
        let field = mask(2, 2, Topology::SquareEdge, &[]);
        assert!(label(&field).unwrap().iter().all(|v| v == 0));
    }

    #[test]
    fn test_label_rejects_real() {
        let lattice = Arc::new(Lattice::square_grid(1, 1, Topology::SquareEdge).unwrap());
        let real: AnyField = Field::filled(lattice, 1.0).into();
        assert!(Label.execute_default(real).is_err());
    }
}
