//! Geodesic operators and morphological reconstruction
//!
//! A geodesic dilation grows a marker field but never above a mask field;
//! a geodesic erosion shrinks it but never below the mask. Iterating either
//! until nothing changes gives reconstruction, which recovers the parts of
//! the mask the marker touches.

use serde::{Deserialize, Serialize};
use spatmorph_core::lattice::Neighborhood;
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

use super::dilate::dilate_with;
use super::element::StructuringElement;
use super::erode::erode_with;
use super::order::Morphable;

/// Direction of a reconstruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionMethod {
    /// Grow the marker under the mask
    #[default]
    Dilation,
    /// Shrink the marker above the mask
    Erosion,
}

/// Parameters for morphological reconstruction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconstructParams {
    #[serde(default)]
    pub element: StructuringElement,
    #[serde(default)]
    pub method: ReconstructionMethod,
}

/// Reconstruction algorithm over a `(marker, mask)` pair of the same kind
#[derive(Debug, Clone, Default)]
pub struct Reconstruct;

impl Algorithm for Reconstruct {
    type Input = (AnyField, AnyField);
    type Output = AnyField;
    type Params = ReconstructParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Reconstruct"
    }

    fn description(&self) -> &'static str {
        "Morphological reconstruction of a marker field under a mask field"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (marker, mask) = input;
        match (&marker, &mask) {
            (AnyField::Real(m), AnyField::Real(k)) => Ok(reconstruct(m, k, &params)?.into()),
            (AnyField::Binary(m), AnyField::Binary(k)) => Ok(reconstruct(m, k, &params)?.into()),
            (AnyField::Label(_), _) => Err(marker.mismatch("reconstruction")),
            _ => Err(mask.mismatch("reconstruction")),
        }
    }
}

fn reconstruct<T: Morphable>(marker: &Field<T>, mask: &Field<T>, params: &ReconstructParams) -> Result<Field<T>> {
    match params.method {
        ReconstructionMethod::Dilation => reconstruct_by_dilation(marker, mask, &params.element),
        ReconstructionMethod::Erosion => reconstruct_by_erosion(marker, mask, &params.element),
    }
}

/// Pointwise combination of two fields on the same lattice
fn pointwise<T, F>(a: &Field<T>, b: &Field<T>, f: F) -> Result<Field<T>>
where
    T: Morphable,
    F: Fn(T, T) -> T,
{
    if !a.same_lattice(b) {
        return Err(Error::LatticeMismatch);
    }
    a.with_values(a.iter().zip(b.iter()).map(|(x, y)| f(x, y)).collect())
}

fn settled<T: Morphable>(a: &Field<T>, b: &Field<T>) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.settled(y))
}

/// One dilation step of `marker`, capped by `mask` at every site
pub fn geodesic_dilate<T: Morphable>(
    marker: &Field<T>,
    mask: &Field<T>,
    element: &StructuringElement,
) -> Result<Field<T>> {
    let hood = element.resolve_reflected(marker.lattice())?;
    let grown = dilate_with(marker, &hood)?;
    pointwise(&grown, mask, T::infimum)
}

/// One erosion step of `marker`, floored by `mask` at every site
pub fn geodesic_erode<T: Morphable>(
    marker: &Field<T>,
    mask: &Field<T>,
    element: &StructuringElement,
) -> Result<Field<T>> {
    let hood = element.resolve(marker.lattice())?;
    let shrunk = erode_with(marker, &hood)?;
    pointwise(&shrunk, mask, T::supremum)
}

/// Reconstruction by dilation: geodesic dilation of `marker` under `mask`
/// repeated to a fixed point.
///
/// The marker is first capped by the mask, so a marker above the mask is
/// not an error. For binary fields the result is the union of the mask
/// components the marker touches.
pub fn reconstruct_by_dilation<T: Morphable>(
    marker: &Field<T>,
    mask: &Field<T>,
    element: &StructuringElement,
) -> Result<Field<T>> {
    let hood = element.resolve_reflected(marker.lattice())?;
    iterate(pointwise(marker, mask, T::infimum)?, |current| {
        let grown = dilate_with(current, &hood)?;
        pointwise(&grown, mask, T::infimum)
    })
}

/// Reconstruction by erosion: geodesic erosion of `marker` above `mask`
/// repeated to a fixed point.
///
/// The marker is first floored by the mask. With a marker equal to the mask
/// on the lattice boundary and foreground elsewhere, this fills the holes of
/// a binary mask.
pub fn reconstruct_by_erosion<T: Morphable>(
    marker: &Field<T>,
    mask: &Field<T>,
    element: &StructuringElement,
) -> Result<Field<T>> {
    let hood = element.resolve(marker.lattice())?;
    iterate(pointwise(marker, mask, T::supremum)?, |current| {
        let shrunk = erode_with(current, &hood)?;
        pointwise(&shrunk, mask, T::supremum)
    })
}

/// Apply `step` until the field stops changing.
fn iterate<T, F>(start: Field<T>, step: F) -> Result<Field<T>>
where
    T: Morphable,
    F: Fn(&Field<T>) -> Result<Field<T>>,
{
    let mut current = start;
    loop {
        let next = step(&current)?;
        if settled(&current, &next) {
            return Ok(next);
        }
        current = next;
    }
}

/// Reconstruction by dilation over an already resolved (reflected) neighborhood
pub(crate) fn reconstruct_by_dilation_with(
    marker: &Field<bool>,
    mask: &Field<bool>,
    hood: &Neighborhood,
) -> Result<Field<bool>> {
    iterate(pointwise(marker, mask, bool::infimum)?, |current| {
        let grown = dilate_with(current, hood)?;
        pointwise(&grown, mask, bool::infimum)
    })
}
