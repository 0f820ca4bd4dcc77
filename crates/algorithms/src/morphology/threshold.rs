//! Binary thresholding of a real signal

use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Algorithm, Error, Field, Result};

/// Parameters for binary thresholding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdParams {
    /// Cutoff; sites with `value >= tau` become foreground
    pub tau: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self { tau: 0.5 }
    }
}

impl ThresholdParams {
    pub fn validate(&self) -> Result<()> {
        if self.tau.is_nan() {
            return Err(Error::InvalidParameter {
                name: "tau",
                value: self.tau.to_string(),
                reason: "threshold must be a number".to_string(),
            });
        }
        Ok(())
    }
}

/// Threshold algorithm
#[derive(Debug, Clone, Default)]
pub struct Threshold;

impl Algorithm for Threshold {
    type Input = AnyField;
    type Output = AnyField;
    type Params = ThresholdParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Threshold"
    }

    fn description(&self) -> &'static str {
        "Binary mask of sites whose signal is at or above a cutoff"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let field = input.as_real("threshold")?;
        Ok(threshold(field, params.tau)?.into())
    }
}

/// Compare every site against `tau`: `value >= tau` is foreground.
///
/// NaN signal values never pass. A NaN cutoff is rejected.
pub fn threshold(field: &Field<f64>, tau: f64) -> Result<Field<bool>> {
    ThresholdParams { tau }.validate()?;
    Ok(field.map(|v| v >= tau))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use spatmorph_core::{FieldKind, Lattice, Topology};

    fn line(values: Vec<f64>) -> Field<f64> {
        let lattice = Lattice::square_grid(1, values.len(), Topology::SquareEdge).unwrap();
        Field::from_vec(Arc::new(lattice), values).unwrap()
    }

    #[test]
    fn test_threshold_inclusive() {
        let mask = threshold(&line(vec![0.1, 0.5, 0.9, f64::NAN]), 0.5).unwrap();
        assert_eq!(mask.into_vec(), vec![false, true, true, false]);
    }

    #[test]
    fn test_threshold_nan_cutoff() {
        assert!(matches!(
            threshold(&line(vec![1.0]), f64::NAN),
            Err(Error::InvalidParameter { name: "tau", .. })
        ));
    }

    #[test]
    fn test_threshold_rejects_binary() {
        let mask: AnyField = line(vec![1.0, 0.0]).mask().into();
        let err = Threshold.execute(mask, ThresholdParams::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                operation: "threshold",
                kind: FieldKind::Binary
            }
        ));
    }
}
