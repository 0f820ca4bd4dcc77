//! Pipeline stages: one tagged variant per operator

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spatmorph_core::{AnyField, Algorithm, Error, FieldKind, Lattice, PointSet, Result, Topology};

use crate::aggregation::{Aggregate, AggregateParams};
use crate::morphology::{
    AreaClosing, AreaClosingParams, AreaOpening, AreaOpeningParams, CloseOpen, CloseOpenParams,
    Closing, ClosingParams, Dilate, DilateParams, Erode, ErodeParams, Label, LabelParams, OpenClose,
    OpenCloseParams, Opening, OpeningParams, StructuringElement, Threshold, ThresholdParams,
};

/// Kind of the value threaded between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Points,
    Real,
    Binary,
    Label,
}

impl DataKind {
    pub fn name(&self) -> &'static str {
        match self {
            DataKind::Points => "points",
            DataKind::Real => "real",
            DataKind::Binary => "binary",
            DataKind::Label => "label",
        }
    }
}

impl From<FieldKind> for DataKind {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Real => DataKind::Real,
            FieldKind::Binary => DataKind::Binary,
            FieldKind::Label => DataKind::Label,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of a pipeline run, or the value between two stages
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineInput {
    Points(PointSet),
    Field(AnyField),
}

impl PipelineInput {
    pub fn kind(&self) -> DataKind {
        match self {
            PipelineInput::Points(_) => DataKind::Points,
            PipelineInput::Field(field) => field.kind().into(),
        }
    }
}

impl From<PointSet> for PipelineInput {
    fn from(points: PointSet) -> Self {
        PipelineInput::Points(points)
    }
}

impl From<AnyField> for PipelineInput {
    fn from(field: AnyField) -> Self {
        PipelineInput::Field(field)
    }
}

/// One pipeline step with its typed parameters
///
/// In JSON the variant is named by the `op` key, e.g.
/// `{"op": "opening", "element": {"shape": "hexagon", "radius": 1}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Stage {
    Aggregate(AggregateParams),
    Threshold(ThresholdParams),
    Erode(ErodeParams),
    Dilate(DilateParams),
    Opening(OpeningParams),
    Closing(ClosingParams),
    OpenClose(OpenCloseParams),
    CloseOpen(CloseOpenParams),
    AreaOpening(AreaOpeningParams),
    AreaClosing(AreaClosingParams),
    Label(LabelParams),
}

impl Stage {
    /// The `op` name of the stage
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Aggregate(_) => "aggregate",
            Stage::Threshold(_) => "threshold",
            Stage::Erode(_) => "erode",
            Stage::Dilate(_) => "dilate",
            Stage::Opening(_) => "opening",
            Stage::Closing(_) => "closing",
            Stage::OpenClose(_) => "open_close",
            Stage::CloseOpen(_) => "close_open",
            Stage::AreaOpening(_) => "area_opening",
            Stage::AreaClosing(_) => "area_closing",
            Stage::Label(_) => "label",
        }
    }

    /// Structuring element of the morphological stages
    pub fn element(&self) -> Option<&StructuringElement> {
        match self {
            Stage::Erode(p) => Some(&p.element),
            Stage::Dilate(p) => Some(&p.element),
            Stage::Opening(p) => Some(&p.element),
            Stage::Closing(p) => Some(&p.element),
            Stage::OpenClose(p) => Some(&p.element),
            Stage::CloseOpen(p) => Some(&p.element),
            _ => None,
        }
    }

    pub fn accepts(&self, kind: DataKind) -> bool {
        match self {
            Stage::Aggregate(_) => kind == DataKind::Points,
            Stage::Threshold(_) => kind == DataKind::Real,
            Stage::AreaOpening(_) | Stage::AreaClosing(_) | Stage::Label(_) => kind == DataKind::Binary,
            _ => matches!(kind, DataKind::Real | DataKind::Binary),
        }
    }

    /// Human-readable accepted input kinds
    pub fn expects(&self) -> &'static str {
        match self {
            Stage::Aggregate(_) => "points",
            Stage::Threshold(_) => "real",
            Stage::AreaOpening(_) | Stage::AreaClosing(_) | Stage::Label(_) => "binary",
            _ => "real or binary",
        }
    }

    /// Output kind for an accepted input kind
    pub fn output(&self, input: DataKind) -> DataKind {
        match self {
            Stage::Aggregate(_) => DataKind::Real,
            Stage::Threshold(_) | Stage::AreaOpening(_) | Stage::AreaClosing(_) => DataKind::Binary,
            Stage::Label(_) => DataKind::Label,
            _ => input,
        }
    }

    /// Check parameters that can be judged without data
    pub fn validate(&self, topology: Topology) -> Result<()> {
        match self {
            Stage::Aggregate(p) => p.validate(),
            Stage::Threshold(p) => p.validate(),
            other => match other.element() {
                Some(element) => element.validate(topology),
                None => Ok(()),
            },
        }
    }

    pub(crate) fn kind_error(&self, index: usize, found: DataKind) -> Error {
        Error::PipelineType {
            index,
            stage: self.name().to_string(),
            expected: self.expects().to_string(),
            found: found.to_string(),
        }
    }

    /// Run the stage on `value`.
    pub fn apply(&self, index: usize, lattice: &Arc<Lattice>, value: PipelineInput) -> Result<PipelineInput> {
        let field = match (self, value) {
            (Stage::Aggregate(p), PipelineInput::Points(points)) => {
                return Ok(AnyField::from(Aggregate.execute((lattice.clone(), points), p.clone())?).into());
            }
            (_, PipelineInput::Field(field)) if self.accepts(field.kind().into()) => field,
            (_, value) => return Err(self.kind_error(index, value.kind())),
        };

        let out = match self {
            Stage::Threshold(p) => Threshold.execute(field, p.clone())?,
            Stage::Erode(p) => Erode.execute(field, p.clone())?,
            Stage::Dilate(p) => Dilate.execute(field, p.clone())?,
            Stage::Opening(p) => Opening.execute(field, p.clone())?,
            Stage::Closing(p) => Closing.execute(field, p.clone())?,
            Stage::OpenClose(p) => OpenClose.execute(field, p.clone())?,
            Stage::CloseOpen(p) => CloseOpen.execute(field, p.clone())?,
            Stage::AreaOpening(p) => AreaOpening.execute(field, p.clone())?,
            Stage::AreaClosing(p) => AreaClosing.execute(field, p.clone())?,
            Stage::Label(p) => Label.execute(field, p.clone())?,
            Stage::Aggregate(_) => return Err(self.kind_error(index, field.kind().into())),
        };
        Ok(out.into())
    }
}
