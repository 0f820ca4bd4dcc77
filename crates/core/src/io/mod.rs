//! I/O for sample documents and JSON reports

mod sample;

pub use sample::{read_sample, read_sample_from_str, write_json, Sample, SampleDocument};
