//! Morphological dilation (maximum filter)
//!
//! Replaces each site's value with the maximum over its structuring element
//! neighborhood. Expands bright regions and shrinks dark regions.

use serde::{Deserialize, Serialize};
use spatmorph_core::lattice::Neighborhood;
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

use super::element::StructuringElement;
use super::order::{fold_neighborhood, Morphable};

/// Parameters for morphological dilation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DilateParams {
    /// Structuring element shape
    #[serde(default)]
    pub element: StructuringElement,
}

/// Dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = AnyField;
    type Output = AnyField;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Morphological dilation (maximum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        match &input {
            AnyField::Real(f) => Ok(dilate(f, &params.element)?.into()),
            AnyField::Binary(f) => Ok(dilate(f, &params.element)?.into()),
            AnyField::Label(_) => Err(input.mismatch("dilation")),
        }
    }
}

/// Perform morphological dilation on a field
///
/// Each output value is the maximum (logical OR for binary fields) of the
/// input over the reflected structuring element placed at the site, which
/// makes dilation the adjoint of [`erode`](super::erode). For symmetric
/// elements the reflection is the element itself.
///
/// # Arguments
/// * `field` - Input field
/// * `element` - Structuring element defining the neighborhood shape
pub fn dilate<T: Morphable>(field: &Field<T>, element: &StructuringElement) -> Result<Field<T>> {
    let hood = element.resolve_reflected(field.lattice())?;
    dilate_with(field, &hood)
}

/// Dilation over an already resolved (reflected) neighborhood
pub fn dilate_with<T: Morphable>(field: &Field<T>, hood: &Neighborhood) -> Result<Field<T>> {
    fold_neighborhood(field, hood, T::supremum)
}
