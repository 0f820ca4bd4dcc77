//! Field element trait for generic site values

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

/// Semantic kind of the values a field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Real-valued signal (`f64`)
    Real,
    /// Foreground/background mask (`bool`)
    Binary,
    /// Component labels (`u32`, 0 = background)
    Label,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Real => "real",
            FieldKind::Binary => "binary",
            FieldKind::Label => "label",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for types that can be stored at a lattice site.
pub trait FieldElement: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Kind tag of fields holding this type
    const KIND: FieldKind;

    /// Value of a site outside every region
    fn background() -> Self;

    /// Whether the value marks a site as foreground
    fn is_foreground(&self) -> bool;

    /// Lossless-enough conversion for reporting
    fn to_f64(self) -> f64;
}

impl FieldElement for f64 {
    const KIND: FieldKind = FieldKind::Real;

    fn background() -> Self {
        0.0
    }

    fn is_foreground(&self) -> bool {
        *self > 0.0
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl FieldElement for bool {
    const KIND: FieldKind = FieldKind::Binary;

    fn background() -> Self {
        false
    }

    fn is_foreground(&self) -> bool {
        *self
    }

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }
}

impl FieldElement for u32 {
    const KIND: FieldKind = FieldKind::Label;

    fn background() -> Self {
        0
    }

    fn is_foreground(&self) -> bool {
        *self > 0
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}
