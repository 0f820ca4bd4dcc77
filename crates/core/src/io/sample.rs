//! JSON sample documents
//!
//! A sample document carries the lattice sites of one specimen together with
//! an optional per-site signal and optional raw point events. Platform
//! specific readers are expected to produce this shape.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::Field;
use crate::lattice::{CoordSystem, Lattice, Topology};
use crate::points::{PointEvent, PointSet};

fn default_spacing() -> f64 {
    1.0
}

/// Serialized form of a sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDocument {
    pub topology: Topology,
    /// Coordinate system of every entry in `sites`
    pub coords: CoordSystem,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    pub sites: Vec<Vec<i32>>,
    /// Per-site signal aligned with `sites`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<PointEvent>>,
}

/// A sample resolved onto its lattice
#[derive(Debug, Clone)]
pub struct Sample {
    pub lattice: Arc<Lattice>,
    pub signal: Option<Field<f64>>,
    pub points: Option<PointSet>,
}

impl SampleDocument {
    /// Build the lattice and align the signal with canonical site order.
    pub fn resolve(self) -> Result<Sample> {
        let coords = self
            .sites
            .iter()
            .map(|values| self.coords.coord(values))
            .collect::<Result<Vec<_>>>()?;

        let lattice = Lattice::new(self.topology, coords.iter().copied())?;
        let lattice = Arc::new(lattice.with_spacing(self.spacing)?);

        let signal = match self.values {
            None => None,
            Some(values) => {
                if values.len() != coords.len() {
                    return Err(Error::SizeMismatch {
                        expected: coords.len(),
                        actual: values.len(),
                    });
                }
                let mut aligned = vec![0.0; lattice.len()];
                for (coord, value) in coords.iter().zip(values) {
                    let site = lattice.locate(coord)?.ok_or_else(|| {
                        Error::InvalidTopology(format!("signal at {:?} names no site", coord))
                    })?;
                    aligned[site] = value;
                }
                Some(Field::from_vec(lattice.clone(), aligned)?)
            }
        };

        let points = self.points.map(PointSet::new).transpose()?;

        Ok(Sample {
            lattice,
            signal,
            points,
        })
    }
}

/// Read a sample document from a JSON file
pub fn read_sample<P: AsRef<Path>>(path: P) -> Result<Sample> {
    let file = File::open(path.as_ref())?;
    decode_sample(BufReader::new(file))
}

/// Read a sample document from a JSON string
pub fn read_sample_from_str(json: &str) -> Result<Sample> {
    decode_sample(json.as_bytes())
}

fn decode_sample<R: Read>(reader: R) -> Result<Sample> {
    let document: SampleDocument = serde_json::from_reader(reader)?;
    document.resolve()
}

/// Write any serializable value as pretty JSON to `path`
pub fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
