//! Morphological closing (dilation followed by erosion)
//!
//! Fills small dark gaps and holes while preserving the overall
//! shape and size of larger dark regions.

use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

use super::dilate::dilate_with;
use super::element::StructuringElement;
use super::erode::erode_with;
use super::order::Morphable;

/// Parameters for morphological closing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClosingParams {
    /// Structuring element shape
    #[serde(default)]
    pub element: StructuringElement,
}

/// Closing algorithm
#[derive(Debug, Clone, Default)]
pub struct Closing;

impl Algorithm for Closing {
    type Input = AnyField;
    type Output = AnyField;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Morphological closing (dilation then erosion) to fill small dark gaps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        match &input {
            AnyField::Real(f) => Ok(closing(f, &params.element)?.into()),
            AnyField::Binary(f) => Ok(closing(f, &params.element)?.into()),
            AnyField::Label(_) => Err(input.mismatch("closing")),
        }
    }
}

/// Perform morphological closing on a field
///
/// Closing = dilate then erode with the same element. Fills small dark gaps
/// and holes while preserving the overall shape of larger dark structures.
///
/// # Arguments
/// * `field` - Input field
/// * `element` - Structuring element defining the neighborhood shape
pub fn closing<T: Morphable>(field: &Field<T>, element: &StructuringElement) -> Result<Field<T>> {
    let lattice = field.lattice();
    let hood = element.resolve(lattice)?;
    let reflected = element.resolve_reflected(lattice)?;
    let dilated = dilate_with(field, &reflected)?;
    erode_with(&dilated, &hood)
}
