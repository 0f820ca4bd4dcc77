//! Raw point measurements prior to aggregation onto a lattice

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn default_count() -> u32 {
    1
}

/// One detection event (a transcript, a cell centroid) in physical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    pub x: f64,
    pub y: f64,
    /// Feature identifier (gene, protein, annotation)
    pub feature: String,
    /// Multiplicity of the event
    #[serde(default = "default_count")]
    pub count: u32,
}

impl PointEvent {
    pub fn new(x: f64, y: f64, feature: impl Into<String>, count: u32) -> Self {
        Self {
            x,
            y,
            feature: feature.into(),
            count,
        }
    }
}

/// A validated collection of point events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    events: Vec<PointEvent>,
}

impl PointSet {
    /// Wrap `events`, rejecting non-finite coordinates
    pub fn new(events: Vec<PointEvent>) -> Result<Self> {
        if let Some(bad) = events
            .iter()
            .find(|e| !(e.x.is_finite() && e.y.is_finite()))
        {
            return Err(Error::InvalidParameter {
                name: "point",
                value: format!("({}, {})", bad.x, bad.y),
                reason: "point coordinates must be finite".to_string(),
            });
        }
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointEvent> {
        self.events.iter()
    }

    pub fn events(&self) -> &[PointEvent] {
        &self.events
    }

    /// Distinct feature identifiers in sorted order
    pub fn features(&self) -> BTreeSet<&str> {
        self.events.iter().map(|e| e.feature.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a PointEvent;
    type IntoIter = std::slice::Iter<'a, PointEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_finite() {
        let events = vec![PointEvent::new(f64::NAN, 0.0, "EPCAM", 1)];
        assert!(PointSet::new(events).is_err());
    }

    #[test]
    fn test_features_sorted_unique() {
        let set = PointSet::new(vec![
            PointEvent::new(0.0, 0.0, "KRT8", 1),
            PointEvent::new(1.0, 0.0, "EPCAM", 2),
            PointEvent::new(2.0, 0.0, "KRT8", 1),
        ])
        .unwrap();
        assert_eq!(set.features().into_iter().collect::<Vec<_>>(), vec!["EPCAM", "KRT8"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_count_defaults_to_one() {
        let event: PointEvent =
            serde_json::from_str(r#"{"x": 1.0, "y": 2.0, "feature": "EPCAM"}"#).unwrap();
        assert_eq!(event.count, 1);
    }
}
