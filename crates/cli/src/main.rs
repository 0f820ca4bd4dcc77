//! SpatMorph CLI - microregion pipelines on spatial lattices

mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use spatmorph_algorithms::pipeline::{DataKind, Pipeline, PipelineInput, Stage};
use spatmorph_core::io::{read_sample, write_json, Sample};
use spatmorph_core::{AnyField, Topology};

use report::RunReport;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "spatmorph")]
#[command(author, version, about = "Lattice morphology for spatial-omics microregions", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a sample document
    Info {
        /// Input sample (JSON)
        input: PathBuf,
    },
    /// Check a pipeline document without running it
    Validate {
        /// Pipeline document (JSON)
        pipeline: PathBuf,
        /// Sample to check the pipeline against
        #[arg(long)]
        input: Option<PathBuf>,
        /// Topology to check against when no sample is given
        #[arg(long, value_enum, default_value = "hexagonal")]
        topology: TopologyArg,
    },
    /// Run a pipeline on one or more samples
    Run {
        /// Pipeline document (JSON)
        pipeline: PathBuf,
        /// Input samples (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory receiving one `<sample>.report.json` per input
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TopologyArg {
    SquareEdge,
    SquareFull,
    Hexagonal,
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::SquareEdge => Topology::SquareEdge,
            TopologyArg::SquareFull => Topology::SquareFull,
            TopologyArg::Hexagonal => Topology::Hexagonal,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_pipeline(path: &Path) -> Result<Pipeline> {
    Pipeline::from_path(path).with_context(|| format!("Failed to read pipeline {}", path.display()))
}

fn read_input(path: &Path) -> Result<Sample> {
    read_sample(path).with_context(|| format!("Failed to read sample {}", path.display()))
}

/// The source a pipeline consumes: points when it starts by aggregating
fn source_kind(pipeline: &Pipeline) -> DataKind {
    match pipeline.stages.first() {
        Some(Stage::Aggregate(_)) => DataKind::Points,
        _ => DataKind::Real,
    }
}

fn pipeline_input(pipeline: &Pipeline, sample: Sample, path: &Path) -> Result<PipelineInput> {
    match source_kind(pipeline) {
        DataKind::Points => match sample.points {
            Some(points) => Ok(PipelineInput::Points(points)),
            None => bail!("{}: pipeline aggregates points but the sample has none", path.display()),
        },
        _ => match sample.signal {
            Some(signal) => Ok(PipelineInput::Field(AnyField::Real(signal))),
            None => bail!("{}: pipeline needs a signal but the sample has no values", path.display()),
        },
    }
}

fn report_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample".to_string());
    output_dir.join(format!("{}.report.json", stem))
}

/// Report paths for every input, refusing inputs that would share a report.
fn report_paths(output_dir: &Path, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut paths = Vec::with_capacity(inputs.len());
    for input in inputs {
        let out = report_path(output_dir, input);
        if let Some(previous) = claimed.insert(out.clone(), input.as_path()) {
            bail!(
                "{} and {} would both write {}",
                previous.display(),
                input.display(),
                out.display()
            );
        }
        paths.push(out);
    }
    Ok(paths)
}

fn run_one(pipeline: &Pipeline, input: &Path, out: &Path) -> Result<usize> {
    let sample = read_input(input)?;
    let lattice = sample.lattice.clone();
    let source = pipeline_input(pipeline, sample, input)?;

    let terminal = pipeline
        .run(&lattice, source)
        .with_context(|| format!("Pipeline failed on {}", input.display()))?;
    let name = input.display().to_string();
    let report = RunReport::new(name, &lattice, &terminal).context("Failed to extract regions")?;

    write_json(&report, out).with_context(|| format!("Failed to write {}", out.display()))?;
    debug!("{} -> {}", input.display(), out.display());
    Ok(report.regions.len())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let pb = spinner("Reading sample...");
            let sample = read_input(&input)?;
            pb.finish_and_clear();
            let lattice = &sample.lattice;
            let interior = lattice.sites().filter(|&s| lattice.is_interior(s)).count();

            println!("File: {}", input.display());
            println!("Topology: {}", lattice.topology());
            println!("Sites: {} ({} interior)", lattice.len(), interior);
            println!("Edges: {}", lattice.edge_count());
            println!("Spacing: {}", lattice.spacing());
            match &sample.signal {
                Some(signal) => {
                    if let Some((min, max)) = signal.range() {
                        println!("Signal: {:.4} to {:.4}", min, max);
                    }
                }
                None => println!("Signal: none"),
            }
            match &sample.points {
                Some(points) => {
                    let features = points.features();
                    println!("Points: {} events, {} features", points.len(), features.len());
                }
                None => println!("Points: none"),
            }
        }

        // ── Validate ─────────────────────────────────────────────────
        Commands::Validate {
            pipeline,
            input,
            topology,
        } => {
            let parsed = read_pipeline(&pipeline)?;
            let (topology, source) = match &input {
                Some(path) => {
                    let sample = read_input(path)?;
                    let kind = source_kind(&parsed);
                    let available = match kind {
                        DataKind::Points => sample.points.is_some(),
                        _ => sample.signal.is_some(),
                    };
                    if !available {
                        bail!("{}: sample has no {} source", path.display(), kind);
                    }
                    (sample.lattice.topology(), kind)
                }
                None => (topology.into(), source_kind(&parsed)),
            };

            let terminal = parsed
                .validate(topology, source)
                .with_context(|| format!("Invalid pipeline {}", pipeline.display()))?;

            let mut kind = source;
            for (index, stage) in parsed.stages.iter().enumerate() {
                let next = stage.output(kind);
                println!("  {:>2}. {:<13} {} -> {}", index, stage.name(), kind, next);
                kind = next;
            }
            println!("Pipeline OK on {} lattice: {} -> {}", topology, source, terminal);
        }

        // ── Run ──────────────────────────────────────────────────────
        Commands::Run {
            pipeline,
            inputs,
            output_dir,
        } => {
            let parsed = read_pipeline(&pipeline)?;
            let outputs = report_paths(&output_dir, &inputs)?;
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;

            let pb = spinner(&format!("Processing {} samples...", inputs.len()));
            let start = Instant::now();
            // Samples share nothing, so they run concurrently
            let results: Vec<Result<usize>> = inputs
                .par_iter()
                .zip(outputs.par_iter())
                .map(|(input, out)| run_one(&parsed, input, out))
                .collect();
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            let mut regions = 0;
            for result in results {
                regions += result?;
            }
            info!("{} samples, {} regions", inputs.len(), regions);
            println!("Reports saved to: {}", output_dir.display());
            println!("  Processing time: {:.2?}", elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_paths_follow_stems() {
        let inputs = vec![PathBuf::from("a/s1.json"), PathBuf::from("b/s2.json")];
        let paths = report_paths(Path::new("out"), &inputs).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/s1.report.json"),
                PathBuf::from("out/s2.report.json")
            ]
        );
    }

    #[test]
    fn test_report_paths_reject_shared_stem() {
        let inputs = vec![PathBuf::from("a/s.json"), PathBuf::from("b/s.json")];
        let err = report_paths(Path::new("out"), &inputs).unwrap_err();
        assert!(err.to_string().contains("s.report.json"));
    }

    #[test]
    fn test_report_paths_reject_repeated_input() {
        let inputs = vec![PathBuf::from("s.json"), PathBuf::from("s.json")];
        assert!(report_paths(Path::new("."), &inputs).is_err());
    }
}
