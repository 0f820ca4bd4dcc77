//! Field data structures: per-site values of one semantic kind

mod any;
mod element;
mod values;

pub use any::AnyField;
pub use element::{FieldElement, FieldKind};
pub use values::Field;
