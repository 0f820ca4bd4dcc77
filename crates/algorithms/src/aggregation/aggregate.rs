//! Aggregation of point events onto lattice sites
//!
//! This is the only place where continuous coordinates are discretized.
//! Events are visited in input order, so sums are bit-identical across runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spatmorph_core::{Algorithm, Error, Field, Lattice, PointSet, Result};

use super::rules::{AggregationRule, Binning};

/// Relative slack on the radius cutoff so that sites exactly one pitch away
/// are not lost to rounding in the hex center formula.
const RADIUS_TOLERANCE: f64 = 1e-9;

/// Parameters for point aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateParams {
    /// Physical cutoff distance from a site center
    pub radius: f64,
    /// Features to include; empty selects every feature
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub rule: AggregationRule,
    #[serde(default)]
    pub binning: Binning,
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            features: BTreeSet::new(),
            rule: AggregationRule::Sum,
            binning: Binning::Radius,
        }
    }
}

impl AggregateParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidParameter {
                name: "radius",
                value: self.radius.to_string(),
                reason: "aggregation radius must be positive and finite".to_string(),
            });
        }
        Ok(())
    }

    fn selects(&self, feature: &str) -> bool {
        self.features.is_empty() || self.features.contains(feature)
    }
}

/// Aggregation algorithm
#[derive(Debug, Clone, Default)]
pub struct Aggregate;

impl Algorithm for Aggregate {
    type Input = (Arc<Lattice>, PointSet);
    type Output = Field<f64>;
    type Params = AggregateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Aggregate"
    }

    fn description(&self) -> &'static str {
        "Bin point events into a per-site signal"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (lattice, points) = input;
        aggregate(&lattice, &points, &params)
    }
}

/// Bin `points` onto `lattice` according to `params`.
///
/// Sites receiving no event hold 0. Events outside the radius of every site
/// are dropped silently.
///
/// # Example
///
/// ```ignore
/// let params = AggregateParams {
///     radius: 55.0,
///     features: ["EPCAM".to_string()].into(),
///     rule: AggregationRule::Sum,
///     binning: Binning::Radius,
/// };
/// let signal = aggregate(&lattice, &points, &params)?;
/// ```
pub fn aggregate(lattice: &Arc<Lattice>, points: &PointSet, params: &AggregateParams) -> Result<Field<f64>> {
    params.validate()?;
    let cutoff = params.radius + RADIUS_TOLERANCE * lattice.spacing().max(params.radius);

    let mut totals = vec![0.0f64; lattice.len()];
    // site -> feature -> total, only needed for the maximum rule
    let mut per_feature: HashMap<usize, BTreeMap<&str, f64>> = HashMap::new();

    for event in points.iter().filter(|e| params.selects(&e.feature)) {
        let sites = match params.binning {
            Binning::Radius => sites_within(lattice, event.x, event.y, cutoff),
            Binning::Nearest => lattice
                .nearest_site(event.x, event.y)
                .filter(|&s| center_distance(lattice, s, event.x, event.y) <= cutoff)
                .into_iter()
                .collect(),
        };

        for site in sites {
            match params.rule {
                AggregationRule::Sum => totals[site] += f64::from(event.count),
                AggregationRule::Count => totals[site] += 1.0,
                AggregationRule::Maximum => {
                    *per_feature
                        .entry(site)
                        .or_default()
                        .entry(event.feature.as_str())
                        .or_insert(0.0) += f64::from(event.count);
                }
            }
        }
    }

    if params.rule == AggregationRule::Maximum {
        for (site, features) in per_feature {
            totals[site] = features.values().copied().fold(0.0, f64::max);
        }
    }

    Field::from_vec(lattice.clone(), totals)
}

fn center_distance(lattice: &Lattice, site: usize, x: f64, y: f64) -> f64 {
    let (cx, cy) = lattice.center(site);
    (cx - x).hypot(cy - y)
}

/// Sites whose center lies within `cutoff` of `(x, y)`, in site order.
fn sites_within(lattice: &Lattice, x: f64, y: f64, cutoff: f64) -> Vec<usize> {
    let spacing = lattice.spacing();
    let topology = lattice.topology();

    // Canonical bounding box of the disk
    let mut candidates: Vec<[i32; 2]> = Vec::new();
    if topology.is_square() {
        let rows = span((y - cutoff) / spacing, (y + cutoff) / spacing);
        let cols = span((x - cutoff) / spacing, (x + cutoff) / spacing);
        if box_exceeds(lattice, &rows, &cols) {
            return scan_all(lattice, x, y, cutoff);
        }
        for row in rows {
            for col in cols.clone() {
                candidates.push([row, col]);
            }
        }
    } else {
        let height = spacing * 3f64.sqrt() / 2.0;
        let rs = span((y - cutoff) / height, (y + cutoff) / height);
        let width = 2.0 * cutoff / spacing + 2.0;
        if (*rs.end() as i64 - *rs.start() as i64 + 1) as f64 * width > lattice.len() as f64 * 4.0 {
            return scan_all(lattice, x, y, cutoff);
        }
        for r in rs {
            let shift = r as f64 / 2.0;
            let qs = span((x - cutoff) / spacing - shift, (x + cutoff) / spacing - shift);
            for q in qs {
                candidates.push([q, r]);
            }
        }
    }

    let mut sites: Vec<usize> = candidates
        .into_iter()
        .filter_map(|c| lattice.index_of(c))
        .filter(|&s| center_distance(lattice, s, x, y) <= cutoff)
        .collect();
    sites.sort_unstable();
    sites
}

fn span(lo: f64, hi: f64) -> std::ops::RangeInclusive<i32> {
    let clamp = |v: f64| v.clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    clamp(lo.floor())..=clamp(hi.ceil())
}

fn box_exceeds(
    lattice: &Lattice,
    rows: &std::ops::RangeInclusive<i32>,
    cols: &std::ops::RangeInclusive<i32>,
) -> bool {
    let height = (*rows.end() as i64 - *rows.start() as i64 + 1) as f64;
    let width = (*cols.end() as i64 - *cols.start() as i64 + 1) as f64;
    height * width > lattice.len() as f64 * 4.0
}

fn scan_all(lattice: &Lattice, x: f64, y: f64, cutoff: f64) -> Vec<usize> {
    lattice
        .sites()
        .filter(|&s| center_distance(lattice, s, x, y) <= cutoff)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spatmorph_core::{PointEvent, Topology};

    fn grid3() -> Arc<Lattice> {
        Arc::new(Lattice::square_grid(3, 3, Topology::SquareEdge).unwrap())
    }

    fn points(events: Vec<PointEvent>) -> PointSet {
        PointSet::new(events).unwrap()
    }

    #[test]
    fn test_radius_binning_inclusive() {
        let lattice = grid3();
        let pts = points(vec![PointEvent::new(1.0, 1.0, "A", 2)]);
        let field = aggregate(&lattice, &pts, &AggregateParams::default()).unwrap();
        // Center plus its four edge neighbors at distance exactly 1
        assert_eq!(field.count_foreground(), 5);
        assert_relative_eq!(field.at(lattice.index_of([1, 1]).unwrap()), 2.0);
        assert_relative_eq!(field.at(lattice.index_of([0, 0]).unwrap()), 0.0);
    }

    #[test]
    fn test_nearest_binning() {
        let lattice = grid3();
        let pts = points(vec![
            PointEvent::new(1.2, 0.9, "A", 2),
            // Rounds to (3, 3), which is not a site
            PointEvent::new(2.5, 2.5, "A", 1),
            PointEvent::new(10.0, 10.0, "A", 1),
        ]);
        let params = AggregateParams {
            radius: 0.5,
            binning: Binning::Nearest,
            ..Default::default()
        };
        let field = aggregate(&lattice, &pts, &params).unwrap();
        assert_eq!(field.foreground_sites(), vec![lattice.index_of([1, 1]).unwrap()]);
    }

    #[test]
    fn test_rules() {
        let lattice = grid3();
        let pts = points(vec![
            PointEvent::new(0.0, 0.0, "A", 2),
            PointEvent::new(0.0, 0.0, "B", 3),
            PointEvent::new(0.0, 0.0, "A", 2),
        ]);
        let origin = lattice.index_of([0, 0]).unwrap();
        let at = |rule| {
            let params = AggregateParams {
                radius: 0.5,
                rule,
                ..Default::default()
            };
            aggregate(&lattice, &pts, &params).unwrap().at(origin)
        };
        assert_relative_eq!(at(AggregationRule::Sum), 7.0);
        assert_relative_eq!(at(AggregationRule::Maximum), 4.0);
        assert_relative_eq!(at(AggregationRule::Count), 3.0);
    }

    #[test]
    fn test_feature_selection() {
        let lattice = grid3();
        let pts = points(vec![
            PointEvent::new(0.0, 0.0, "EPCAM", 1),
            PointEvent::new(0.0, 0.0, "PTPRC", 5),
        ]);
        let params = AggregateParams {
            radius: 0.5,
            features: ["EPCAM".to_string()].into(),
            ..Default::default()
        };
        let field = aggregate(&lattice, &pts, &params).unwrap();
        assert_relative_eq!(field.at(0), 1.0);
    }

    #[test]
    fn test_hex_neighbors_within_one_pitch() {
        let lattice = Arc::new(Lattice::hexagon(2).unwrap());
        let pts = points(vec![PointEvent::new(0.0, 0.0, "A", 1)]);
        let field = aggregate(&lattice, &pts, &AggregateParams::default()).unwrap();
        assert_eq!(field.count_foreground(), 7);
    }

    #[test]
    fn test_spacing_scales_centers() {
        let lattice = Arc::new(
            Lattice::square_grid(3, 3, Topology::SquareEdge)
                .unwrap()
                .with_spacing(100.0)
                .unwrap(),
        );
        let pts = points(vec![PointEvent::new(200.0, 100.0, "A", 1)]);
        let params = AggregateParams {
            radius: 10.0,
            ..Default::default()
        };
        let field = aggregate(&lattice, &pts, &params).unwrap();
        assert_eq!(field.foreground_sites(), vec![lattice.index_of([1, 2]).unwrap()]);
    }

    #[test]
    fn test_invalid_radius() {
        let params = AggregateParams {
            radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            aggregate(&grid3(), &PointSet::default(), &params),
            Err(Error::InvalidParameter { name: "radius", .. })
        ));
    }
}
