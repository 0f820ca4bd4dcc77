//! Run-time tagged field used where the kind is only known at run time

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::field::{Field, FieldElement, FieldKind};
use crate::lattice::Lattice;

/// A field of any supported kind
#[derive(Debug, Clone, PartialEq)]
pub enum AnyField {
    Real(Field<f64>),
    Binary(Field<bool>),
    Label(Field<u32>),
}

impl AnyField {
    pub fn kind(&self) -> FieldKind {
        match self {
            AnyField::Real(_) => FieldKind::Real,
            AnyField::Binary(_) => FieldKind::Binary,
            AnyField::Label(_) => FieldKind::Label,
        }
    }

    pub fn lattice(&self) -> &Arc<Lattice> {
        match self {
            AnyField::Real(f) => f.lattice(),
            AnyField::Binary(f) => f.lattice(),
            AnyField::Label(f) => f.lattice(),
        }
    }

    pub fn len(&self) -> usize {
        self.lattice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow as a real field, or report `operation` as unsupported for this kind
    pub fn as_real(&self, operation: &'static str) -> Result<&Field<f64>> {
        match self {
            AnyField::Real(f) => Ok(f),
            other => Err(other.mismatch(operation)),
        }
    }

    /// Borrow as a binary field, or report `operation` as unsupported for this kind
    pub fn as_binary(&self, operation: &'static str) -> Result<&Field<bool>> {
        match self {
            AnyField::Binary(f) => Ok(f),
            other => Err(other.mismatch(operation)),
        }
    }

    /// Borrow as a label field, or report `operation` as unsupported for this kind
    pub fn as_label(&self, operation: &'static str) -> Result<&Field<u32>> {
        match self {
            AnyField::Label(f) => Ok(f),
            other => Err(other.mismatch(operation)),
        }
    }

    /// The `TypeMismatch` error for applying `operation` to this field
    pub fn mismatch(&self, operation: &'static str) -> Error {
        Error::TypeMismatch {
            operation,
            kind: self.kind(),
        }
    }

    /// Foreground mask regardless of kind
    pub fn mask(&self) -> Field<bool> {
        match self {
            AnyField::Real(f) => f.mask(),
            AnyField::Binary(f) => f.clone(),
            AnyField::Label(f) => f.mask(),
        }
    }

    /// Site values widened to `f64` for reporting
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            AnyField::Real(f) => f.iter().collect(),
            AnyField::Binary(f) => f.iter().map(FieldElement::to_f64).collect(),
            AnyField::Label(f) => f.iter().map(FieldElement::to_f64).collect(),
        }
    }
}

impl From<Field<f64>> for AnyField {
    fn from(field: Field<f64>) -> Self {
        AnyField::Real(field)
    }
}

impl From<Field<bool>> for AnyField {
    fn from(field: Field<bool>) -> Self {
        AnyField::Binary(field)
    }
}

impl From<Field<u32>> for AnyField {
    fn from(field: Field<u32>) -> Self {
        AnyField::Label(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Topology;

    #[test]
    fn test_kind_accessors() {
        let lattice = Arc::new(Lattice::square_grid(2, 2, Topology::SquareEdge).unwrap());
        let labels: AnyField = Field::from_vec(lattice, vec![0u32, 1, 1, 2]).unwrap().into();

        assert_eq!(labels.kind(), FieldKind::Label);
        assert!(labels.as_label("test").is_ok());
        assert!(matches!(
            labels.as_real("dilation"),
            Err(Error::TypeMismatch {
                operation: "dilation",
                kind: FieldKind::Label
            })
        ));
        assert_eq!(labels.mask().count_foreground(), 3);
        assert_eq!(labels.to_f64_vec(), vec![0.0, 1.0, 1.0, 2.0]);
    }
}
