//! Per-sample output document

use serde::{Deserialize, Serialize};
use spatmorph_algorithms::regions::{extract_microregions, site_attributes, RegionSummary, SiteAttributes};
use spatmorph_core::{AnyField, FieldKind, Lattice, Result, Topology};

/// Everything a run produced for one sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub sample: String,
    pub topology: Topology,
    pub sites: usize,
    /// Kind of the terminal field
    pub kind: FieldKind,
    /// Terminal field values in site order
    pub values: Vec<f64>,
    /// Empty when the terminal field is real-valued
    pub regions: Vec<RegionSummary>,
    pub attributes: Vec<SiteAttributes>,
}

impl RunReport {
    pub fn new(sample: String, lattice: &std::sync::Arc<Lattice>, terminal: &AnyField) -> Result<Self> {
        let regions = match terminal.kind() {
            FieldKind::Real => Vec::new(),
            FieldKind::Binary | FieldKind::Label => extract_microregions(terminal)?,
        };
        Ok(Self {
            sample,
            topology: lattice.topology(),
            sites: lattice.len(),
            kind: terminal.kind(),
            values: terminal.to_f64_vec(),
            regions: regions.iter().map(RegionSummary::of).collect(),
            attributes: site_attributes(lattice, &regions)?,
        })
    }
}
