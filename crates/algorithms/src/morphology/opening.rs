//! Morphological opening (erosion followed by dilation)
//!
//! Removes bright features smaller than the structuring element while
//! preserving the shape of larger bright regions.

use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

use super::dilate::dilate_with;
use super::element::StructuringElement;
use super::erode::erode_with;
use super::order::Morphable;

/// Parameters for morphological opening
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningParams {
    /// Structuring element shape
    #[serde(default)]
    pub element: StructuringElement,
}

/// Opening algorithm
#[derive(Debug, Clone, Default)]
pub struct Opening;

impl Algorithm for Opening {
    type Input = AnyField;
    type Output = AnyField;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Morphological opening (erosion then dilation) to remove small bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        match &input {
            AnyField::Real(f) => Ok(opening(f, &params.element)?.into()),
            AnyField::Binary(f) => Ok(opening(f, &params.element)?.into()),
            AnyField::Label(_) => Err(input.mismatch("opening")),
        }
    }
}

/// Perform morphological opening on a field
///
/// Opening = erode then dilate with the same element, resolved once.
/// Applying it twice gives the same result as applying it once.
///
/// # Arguments
/// * `field` - Input field
/// * `element` - Structuring element defining the neighborhood shape
pub fn opening<T: Morphable>(field: &Field<T>, element: &StructuringElement) -> Result<Field<T>> {
    let lattice = field.lattice();
    let hood = element.resolve(lattice)?;
    let reflected = element.resolve_reflected(lattice)?;
    let eroded = erode_with(field, &hood)?;
    dilate_with(&eroded, &reflected)
}
