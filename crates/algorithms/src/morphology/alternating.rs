//! Alternating filters: opening then closing, and closing then opening

use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

use super::closing::closing;
use super::element::StructuringElement;
use super::opening::opening;
use super::order::Morphable;

/// Parameters for the open-close filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenCloseParams {
    #[serde(default)]
    pub element: StructuringElement,
}

/// Parameters for the close-open filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloseOpenParams {
    #[serde(default)]
    pub element: StructuringElement,
}

/// Open-close algorithm
#[derive(Debug, Clone, Default)]
pub struct OpenClose;

impl Algorithm for OpenClose {
    type Input = AnyField;
    type Output = AnyField;
    type Params = OpenCloseParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "OpenClose"
    }

    fn description(&self) -> &'static str {
        "Opening followed by closing: removes specks, then fills pinholes"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        match &input {
            AnyField::Real(f) => Ok(open_close(f, &params.element)?.into()),
            AnyField::Binary(f) => Ok(open_close(f, &params.element)?.into()),
            AnyField::Label(_) => Err(input.mismatch("open-close")),
        }
    }
}

/// Close-open algorithm
#[derive(Debug, Clone, Default)]
pub struct CloseOpen;

impl Algorithm for CloseOpen {
    type Input = AnyField;
    type Output = AnyField;
    type Params = CloseOpenParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "CloseOpen"
    }

    fn description(&self) -> &'static str {
        "Closing followed by opening: fills pinholes, then removes specks"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        match &input {
            AnyField::Real(f) => Ok(close_open(f, &params.element)?.into()),
            AnyField::Binary(f) => Ok(close_open(f, &params.element)?.into()),
            AnyField::Label(_) => Err(input.mismatch("close-open")),
        }
    }
}

/// Opening followed by closing with the same element
pub fn open_close<T: Morphable>(field: &Field<T>, element: &StructuringElement) -> Result<Field<T>> {
    closing(&opening(field, element)?, element)
}

/// Closing followed by opening with the same element
pub fn close_open<T: Morphable>(field: &Field<T>, element: &StructuringElement) -> Result<Field<T>> {
    opening(&closing(field, element)?, element)
}
