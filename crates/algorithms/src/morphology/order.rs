//! Lattice order on field values used by erosion and dilation

use spatmorph_core::lattice::Neighborhood;
use spatmorph_core::{Field, FieldElement, Result};

use crate::maybe_rayon::map_sites;

/// Field values forming a complete lattice: erosion takes the infimum of a
/// neighborhood, dilation the supremum.
pub trait Morphable: FieldElement {
    fn infimum(self, other: Self) -> Self;
    fn supremum(self, other: Self) -> Self;

    /// Equality used to detect a fixed point of an iterated operator
    fn settled(self, other: Self) -> bool {
        self == other
    }
}

impl Morphable for f64 {
    fn infimum(self, other: Self) -> Self {
        self.min(other)
    }

    fn supremum(self, other: Self) -> Self {
        self.max(other)
    }

    fn settled(self, other: Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl Morphable for bool {
    fn infimum(self, other: Self) -> Self {
        self && other
    }

    fn supremum(self, other: Self) -> Self {
        self || other
    }
}

/// Combine the values over each site's neighbor set with `combine`.
///
/// Only neighbors present in the lattice take part; a site whose set is
/// empty keeps its input value.
pub(crate) fn fold_neighborhood<T, F>(
    field: &Field<T>,
    hood: &Neighborhood,
    combine: F,
) -> Result<Field<T>>
where
    T: Morphable,
    F: Fn(T, T) -> T + Sync + Send,
{
    let values = field.values();
    let data = map_sites(field.len(), |site| {
        hood.of(site)
            .iter()
            .map(|&n| values[n])
            .reduce(&combine)
            .unwrap_or(values[site])
    });
    field.with_values(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_is_and_or() {
        assert!(!true.infimum(false));
        assert!(true.supremum(false));
    }

    #[test]
    fn test_f64_ignores_nan() {
        assert_eq!(f64::NAN.infimum(2.0), 2.0);
        assert_eq!(3.0f64.supremum(f64::NAN), 3.0);
    }

    #[test]
    fn test_nan_is_settled() {
        assert!(f64::NAN.settled(f64::NAN));
        assert!(!f64::NAN.settled(1.0));
        assert!(true.settled(true));
    }
}
