//! End-to-end scenarios on small lattices with hand-checked outcomes.

use std::sync::Arc;

use spatmorph_algorithms::morphology::{area_opening, dilate, erode, label, threshold, StructuringElement};
use spatmorph_algorithms::pipeline::{Pipeline, PipelineInput};
use spatmorph_algorithms::regions::{extract_microregions, site_attributes, RegionSummary};
use spatmorph_core::io::read_sample_from_str;
use spatmorph_core::{AnyField, Error, Field, Lattice, Topology};

/// 5x5 square lattice with 1.0 on a plus shape centered at (2, 2)
fn plus_signal() -> Field<f64> {
    let lattice = Arc::new(Lattice::square_grid(5, 5, Topology::SquareEdge).unwrap());
    let plus = [[2, 2], [1, 2], [3, 2], [2, 1], [2, 3]];
    Field::from_fn(lattice.clone(), |s| {
        if plus.contains(&lattice.coord(s)) {
            1.0
        } else {
            0.0
        }
    })
}

#[test]
fn plus_shape_erodes_to_center() {
    let signal = plus_signal();
    let lattice = signal.lattice().clone();
    let mask = threshold(&signal, 0.5).unwrap();
    assert_eq!(mask.count_foreground(), 5);

    let eroded = erode(&mask, &StructuringElement::Cross { radius: 1 }).unwrap();
    assert_eq!(eroded.foreground_sites(), vec![lattice.index_of([2, 2]).unwrap()]);
}

#[test]
fn plus_shape_removed_by_area_opening() {
    let mask = threshold(&plus_signal(), 0.5).unwrap();
    assert_eq!(area_opening(&mask, 6).unwrap().count_foreground(), 0);
    assert_eq!(area_opening(&mask, 5).unwrap(), mask);
}

#[test]
fn plus_shape_through_pipeline() {
    let signal = plus_signal();
    let lattice = signal.lattice().clone();
    let pipeline = Pipeline::parse(
        r#"{"stages": [
            {"op": "threshold", "tau": 0.5},
            {"op": "erode", "element": {"shape": "cross", "radius": 1}},
            {"op": "label"}
        ]}"#,
    )
    .unwrap();
    let result = pipeline.run(&lattice, AnyField::from(signal).into()).unwrap();
    let labels = result.as_label("test").unwrap();
    assert_eq!(labels.at(lattice.index_of([2, 2]).unwrap()), 1);
    assert_eq!(labels.count_foreground(), 1);
}

#[test]
fn hex_dilation_from_single_site() {
    let lattice = Arc::new(Lattice::hexagon(2).unwrap());
    assert_eq!(lattice.len(), 19);
    let origin = lattice.index_of([0, 0]).unwrap();

    let signal = Field::filled(lattice.clone(), 1.0);
    assert!(threshold(&signal, 1.0).unwrap().iter().all(|v| v));

    let mut seed: Field<bool> = Field::new(lattice.clone());
    seed.set(origin, true).unwrap();
    let grown = dilate(&seed, &StructuringElement::Hexagon { radius: 1 }).unwrap();

    let mut expected: Vec<usize> = lattice.neighbors(origin).to_vec();
    expected.push(origin);
    expected.sort_unstable();
    assert_eq!(grown.foreground_sites(), expected);
}

#[test]
fn small_blob_removed_large_blob_kept() {
    let lattice = Arc::new(Lattice::square_grid(8, 8, Topology::SquareFull).unwrap());
    // 3-site L in the top-left corner, 10-site 2x5 block at the bottom
    let small = [[0, 0], [0, 1], [1, 0]];
    let mask = Field::from_fn(lattice.clone(), |s| {
        let [r, c] = lattice.coord(s);
        small.contains(&[r, c]) || ((5..7).contains(&r) && (2..7).contains(&c))
    });
    let labels = label(&mask).unwrap();
    assert_eq!(labels.iter().max(), Some(2));

    let opened = area_opening(&mask, 5).unwrap();
    assert_eq!(opened.count_foreground(), 10);
    for s in lattice.sites() {
        let in_large = labels.at(s) == 2;
        assert_eq!(opened.at(s), in_large);
    }
}

#[test]
fn sample_document_to_regions() {
    // Two hexagonal spots of tumor signal separated by a gap of low signal
    let json = r#"{
        "topology": "hexagonal",
        "coords": "axial",
        "sites": [[-2, 0], [-1, 0], [0, 0], [1, 0], [2, 0], [-2, 1], [-1, 1], [0, 1], [1, 1]],
        "values": [5.0, 6.0, 0.0, 7.0, 9.0, 4.0, 0.0, 0.0, 8.0]
    }"#;
    let sample = read_sample_from_str(json).unwrap();
    let lattice = sample.lattice.clone();
    let signal = sample.signal.unwrap();

    let pipeline = Pipeline::parse(r#"[{"op": "threshold", "tau": 3.0}, {"op": "label"}]"#).unwrap();
    let terminal = pipeline.run(&lattice, PipelineInput::Field(signal.into())).unwrap();
    let regions = extract_microregions(&terminal).unwrap();
    assert_eq!(regions.len(), 2);

    let summaries: Vec<RegionSummary> = regions.iter().map(RegionSummary::of).collect();
    let areas: Vec<usize> = summaries.iter().map(|s| s.area).collect();
    assert_eq!(areas, vec![3, 3]);

    let rows = site_attributes(&lattice, &regions).unwrap();
    let gap = lattice.index_of([0, 0]).unwrap();
    assert_eq!(rows[gap].region, None);
    assert_eq!(rows[gap].distance, Some(1));
    assert_eq!(rows[gap].layer, Some(1));
}

#[test]
fn element_checked_before_running() {
    let lattice = Arc::new(Lattice::hexagon(2).unwrap());
    let pipeline = Pipeline::parse(
        r#"[{"op": "opening", "element": {"shape": "square", "radius": 1}}, {"op": "threshold", "tau": 1}]"#,
    )
    .unwrap();
    let signal: AnyField = Field::filled(lattice.clone(), 1.0).into();
    assert!(matches!(
        pipeline.run(&lattice, signal.into()),
        Err(Error::InvalidShape(_))
    ));
}
