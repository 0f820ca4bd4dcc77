//! Declarative pipeline of chained stages
//!
//! A pipeline is checked as a whole before any stage runs: unknown stages
//! fail at parse time, kind mismatches and impossible elements at
//! validation. Execution then threads one value through the stages.

mod engine;
mod stage;

pub use engine::Pipeline;
pub use stage::{DataKind, PipelineInput, Stage};
