//! Sequential pipeline ("backbone") execution

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spatmorph_core::{AnyField, Error, Lattice, Result, Topology};
use tracing::{debug, info};

use super::stage::{DataKind, PipelineInput, Stage};
use crate::aggregation::AggregateParams;
use crate::morphology::{AreaOpeningParams, LabelParams, OpeningParams, StructuringElement, ThresholdParams};

/// An ordered list of stages
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::parse(r#"{"stages": [
///     {"op": "aggregate", "radius": 1.0},
///     {"op": "threshold", "tau": 3.0},
///     {"op": "label"}
/// ]}"#)?;
/// let labels = pipeline.run(&lattice, points.into())?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Append a stage
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// aggregate, opening, threshold, area opening, label
    pub fn standard(aggregate: AggregateParams, element: StructuringElement, tau: f64, lambda: usize) -> Self {
        Self::new(vec![
            Stage::Aggregate(aggregate),
            Stage::Opening(OpeningParams { element }),
            Stage::Threshold(ThresholdParams { tau }),
            Stage::AreaOpening(AreaOpeningParams { lambda }),
            Stage::Label(LabelParams {}),
        ])
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Parse a pipeline document.
    ///
    /// Accepts `{"stages": [...]}` or a bare stage array. Syntax errors are
    /// [`Error::Json`]; an unknown `op` or malformed parameters are
    /// [`Error::UnknownStage`] naming the stage index.
    pub fn parse(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut map) => match map.remove("stages") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(Error::InvalidParameter {
                        name: "stages",
                        value: "missing".to_string(),
                        reason: "pipeline document needs a \"stages\" array".to_string(),
                    })
                }
            },
            other => {
                return Err(Error::InvalidParameter {
                    name: "stages",
                    value: other.to_string(),
                    reason: "pipeline document must be an object or an array".to_string(),
                })
            }
        };

        let stages = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| parse_stage(index, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { stages })
    }

    /// Read and parse a pipeline document file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Walk the stage kinds statically from `source` and check parameters.
    ///
    /// Returns the kind of the terminal value, which is never points.
    pub fn validate(&self, topology: Topology, source: DataKind) -> Result<DataKind> {
        let mut kind = source;
        for (index, stage) in self.stages.iter().enumerate() {
            if !stage.accepts(kind) {
                return Err(stage.kind_error(index, kind));
            }
            stage.validate(topology)?;
            kind = stage.output(kind);
        }

        if kind == DataKind::Points {
            return Err(Error::PipelineType {
                index: self.stages.len(),
                stage: "output".to_string(),
                expected: "real, binary or label".to_string(),
                found: kind.to_string(),
            });
        }
        Ok(kind)
    }

    /// Validate, then thread `input` through every stage in order.
    ///
    /// Either every stage succeeds and the terminal field is returned, or
    /// the first failure is returned and nothing else is produced.
    pub fn run(&self, lattice: &Arc<Lattice>, input: PipelineInput) -> Result<AnyField> {
        if let PipelineInput::Field(field) = &input {
            if !Arc::ptr_eq(field.lattice(), lattice) && **field.lattice() != **lattice {
                return Err(Error::LatticeMismatch);
            }
        }
        let terminal = self.validate(lattice.topology(), input.kind())?;
        // Elements that clip away everywhere fail before any stage runs;
        // reflection does not change whether a neighborhood is vacant
        for (index, stage) in self.stages.iter().enumerate() {
            if let Some(element) = stage.element() {
                debug!(index, stage = stage.name(), element = element.name(), "resolving element");
                element.resolve(lattice)?;
            }
        }

        let mut value = input;
        for (index, stage) in self.stages.iter().enumerate() {
            debug!(index, stage = stage.name(), input = %value.kind(), "running stage");
            value = stage.apply(index, lattice, value)?;
        }

        match value {
            PipelineInput::Field(field) => {
                info!(
                    stages = self.stages.len(),
                    sites = lattice.len(),
                    kind = %terminal,
                    foreground = field.mask().count_foreground(),
                    "pipeline complete"
                );
                Ok(field)
            }
            PipelineInput::Points(_) => Err(Error::PipelineType {
                index: self.stages.len(),
                stage: "output".to_string(),
                expected: "real, binary or label".to_string(),
                found: DataKind::Points.to_string(),
            }),
        }
    }
}

fn parse_stage(index: usize, entry: Value) -> Result<Stage> {
    let name = match entry.get("op") {
        Some(Value::String(op)) => op.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(Error::UnknownStage {
                index,
                name: String::new(),
                reason: "stage has no \"op\" field".to_string(),
            })
        }
    };
    serde_json::from_value(entry).map_err(|e| Error::UnknownStage {
        index,
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::DilateParams;
    use spatmorph_core::{Field, FieldKind, PointEvent, PointSet};

    fn grid(rows: usize, cols: usize) -> Arc<Lattice> {
        Arc::new(Lattice::square_grid(rows, cols, Topology::SquareEdge).unwrap())
    }

    #[test]
    fn test_parse_object_and_array() {
        let a = Pipeline::parse(r#"{"stages": [{"op": "threshold", "tau": 1.0}, {"op": "label"}]}"#).unwrap();
        let b = Pipeline::parse(r#"[{"op": "threshold", "tau": 1.0}, {"op": "label"}]"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_parse_unknown_stage() {
        let err = Pipeline::parse(r#"[{"op": "label"}, {"op": "skeletonize"}]"#).unwrap_err();
        match err {
            Error::UnknownStage { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "skeletonize");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_parameters() {
        let err = Pipeline::parse(r#"[{"op": "area_opening", "lambda": -3}]"#).unwrap_err();
        assert!(matches!(err, Error::UnknownStage { index: 0, .. }));
        let missing = Pipeline::parse(r#"[{"tau": 1.0}]"#).unwrap_err();
        assert!(matches!(missing, Error::UnknownStage { index: 0, .. }));
    }

    #[test]
    fn test_validate_kind_mismatch() {
        let pipeline = Pipeline::new(vec![
            Stage::Threshold(ThresholdParams { tau: 1.0 }),
            Stage::Threshold(ThresholdParams { tau: 1.0 }),
        ]);
        let err = pipeline.validate(Topology::SquareEdge, DataKind::Real).unwrap_err();
        match err {
            Error::PipelineType { index, expected, found, .. } => {
                assert_eq!(index, 1);
                assert_eq!(expected, "real");
                assert_eq!(found, "binary");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_points_need_aggregation() {
        let pipeline = Pipeline::default();
        assert!(matches!(
            pipeline.validate(Topology::Hexagonal, DataKind::Points),
            Err(Error::PipelineType { index: 0, .. })
        ));
        let pipeline = Pipeline::new(vec![Stage::Label(LabelParams {})]);
        assert!(matches!(
            pipeline.validate(Topology::Hexagonal, DataKind::Points),
            Err(Error::PipelineType { index: 0, .. })
        ));
    }

    #[test]
    fn test_run_standard_pipeline() {
        let lattice = grid(6, 6);
        let mut events = Vec::new();
        // A dense 3x3 patch and a single stray transcript
        for row in 1..4 {
            for col in 1..4 {
                events.push(PointEvent::new(col as f64, row as f64, "EPCAM", 5));
            }
        }
        events.push(PointEvent::new(5.0, 5.0, "EPCAM", 5));
        let points = PointSet::new(events).unwrap();

        let pipeline = Pipeline::standard(
            AggregateParams {
                radius: 0.5,
                ..Default::default()
            },
            StructuringElement::Square { radius: 1 },
            1.0,
            2,
        );
        let result = pipeline.run(&lattice, points.into()).unwrap();
        assert_eq!(result.kind(), FieldKind::Label);
        let labels = result.as_label("test").unwrap();
        assert_eq!(labels.iter().max(), Some(1));
        assert_eq!(labels.count_foreground(), 9);
        assert_eq!(labels.at(lattice.index_of([5, 5]).unwrap()), 0);
    }

    #[test]
    fn test_run_is_deterministic() {
        let lattice = grid(8, 8);
        let signal = Field::from_fn(lattice.clone(), |s| ((s * 37) % 11) as f64);
        let pipeline = Pipeline::parse(
            r#"[{"op": "close_open", "element": {"shape": "square", "radius": 1}},
                {"op": "threshold", "tau": 6.0},
                {"op": "area_closing", "lambda": 3},
                {"op": "label"}]"#,
        )
        .unwrap();
        let a = pipeline.run(&lattice, AnyField::from(signal.clone()).into()).unwrap();
        let b = pipeline.run(&lattice, AnyField::from(signal).into()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_rejects_vacant_element_up_front() {
        let lattice = grid(1, 1);
        let points = PointSet::new(vec![PointEvent::new(0.0, 0.0, "EPCAM", 2)]).unwrap();
        let pipeline = Pipeline::new(vec![
            Stage::Aggregate(AggregateParams {
                radius: 1.0,
                ..Default::default()
            }),
            Stage::Threshold(ThresholdParams { tau: 1.0 }),
            Stage::Dilate(DilateParams {
                element: StructuringElement::Custom {
                    offsets: vec![[0, 1]],
                },
            }),
        ]);
        // The shape is valid for the topology, only the lattice is too small
        assert!(pipeline.validate(Topology::SquareEdge, DataKind::Points).is_ok());
        assert!(matches!(
            pipeline.run(&lattice, points.into()),
            Err(Error::EmptyStructuringElement)
        ));
    }

    #[test]
    fn test_run_rejects_foreign_lattice() {
        let field: AnyField = Field::filled(grid(2, 2), 1.0).into();
        let pipeline = Pipeline::new(vec![Stage::Threshold(ThresholdParams { tau: 0.5 })]);
        assert!(matches!(
            pipeline.run(&grid(3, 3), field.into()),
            Err(Error::LatticeMismatch)
        ));
    }
}
