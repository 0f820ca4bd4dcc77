//! Morphological erosion (minimum filter)
//!
//! Replaces each site's value with the minimum over its structuring element
//! neighborhood. Shrinks bright regions and enlarges dark regions.

use serde::{Deserialize, Serialize};
use spatmorph_core::lattice::Neighborhood;
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

use super::element::StructuringElement;
use super::order::{fold_neighborhood, Morphable};

/// Parameters for morphological erosion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErodeParams {
    /// Structuring element shape
    #[serde(default)]
    pub element: StructuringElement,
}

/// Erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct Erode;

impl Algorithm for Erode {
    type Input = AnyField;
    type Output = AnyField;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Morphological erosion (minimum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        match &input {
            AnyField::Real(f) => Ok(erode(f, &params.element)?.into()),
            AnyField::Binary(f) => Ok(erode(f, &params.element)?.into()),
            AnyField::Label(_) => Err(input.mismatch("erosion")),
        }
    }
}

/// Perform morphological erosion on a field
///
/// Each output value is the minimum (logical AND for binary fields) of the
/// input over the structuring element placed at the site. Near the lattice
/// boundary only the neighbors that exist take part, so a boundary site is
/// never eroded by phantom background.
///
/// # Arguments
/// * `field` - Input field
/// * `element` - Structuring element defining the neighborhood shape
pub fn erode<T: Morphable>(field: &Field<T>, element: &StructuringElement) -> Result<Field<T>> {
    let hood = element.resolve(field.lattice())?;
    erode_with(field, &hood)
}

/// Erosion over an already resolved neighborhood
pub fn erode_with<T: Morphable>(field: &Field<T>, hood: &Neighborhood) -> Result<Field<T>> {
    fold_neighborhood(field, hood, T::infimum)
}
