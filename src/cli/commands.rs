use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn, Level};

use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{Pipeline, SegmentationReport};
use crate::readers::{PayloadReader, ProcessedDatasetReader, RawObservationReader, RecordTableReader};
use crate::utils::filename::{
    generate_default_processed_filename, generate_default_split_filename, DatasetFormat,
};
use crate::utils::progress::ProgressReporter;
use crate::writers::{blocks_per_location, CsvWriter, ParquetWriter};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let base_config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Prepare {
            input,
            output,
            feature_days,
            compression,
            use_mmap,
        } => {
            let config = with_feature_days(base_config, feature_days)?;
            let output = output.unwrap_or_else(generate_default_processed_filename);
            let format = DatasetFormat::from_path(&output).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "output must end in .csv or .parquet: {}",
                    output.display()
                ))
            })?;

            println!("Preparing processed dataset...");
            println!("Input file: {}", input.display());
            println!("Output file: {}", output.display());
            println!(
                "Feature days: {}, block length: {}",
                config.feature_days,
                config.block_length()
            );

            let progress = ProgressReporter::new_spinner("Reading raw observations...", false);

            let raw = RawObservationReader::new()
                .with_mmap(use_mmap)
                .read_observations(&input)?;
            if raw.skipped_rows > 0 {
                warn!(
                    "Skipped {} rows with missing measurements",
                    raw.skipped_rows
                );
            }

            let pipeline = Pipeline::new(config)?;
            let (blocks, report) = pipeline.prepare(&raw.records, Some(&progress))?;
            progress.finish_with_message(&format!("Retained {} blocks", blocks.len()));

            println!("\n{}", report.generate_summary());

            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }

            match format {
                DatasetFormat::Csv => CsvWriter::new().write_blocks(&blocks, &output)?,
                DatasetFormat::Parquet => {
                    let writer = ParquetWriter::new().with_compression(&compression)?;
                    writer.write_blocks(&blocks, &output)?;
                    println!("\n{}", writer.get_file_info(&output)?.summary());
                }
            }

            println!("Processing complete!");
        }

        Commands::Build {
            input,
            from_table,
            output,
            feature_days,
            test_fraction,
            seed,
            max_workers,
        } => {
            let mut config = with_feature_days(base_config, feature_days)?;
            if let Some(fraction) = test_fraction {
                config = config.with_test_fraction(fraction);
            }
            if let Some(seed) = seed {
                config = config.with_random_seed(seed);
            }
            if let Some(workers) = max_workers {
                config = config.with_max_workers(workers);
            }
            let output = output.unwrap_or_else(generate_default_split_filename);

            println!("Building dataset...");
            println!("Input file: {}", input.display());
            println!(
                "Feature days: {}, test fraction: {}, seed: {}, workers: {}",
                config.feature_days, config.test_fraction, config.random_seed, config.max_workers
            );

            let pipeline = Pipeline::new(config)?;
            let progress = ProgressReporter::new_spinner("Loading input...", false);

            let split = if from_table {
                let records = RecordTableReader::new().read_records(&input)?;
                let (split, report) = pipeline.build_dataset(&records, Some(&progress))?;
                progress.println(&report.generate_summary());
                split
            } else {
                let blocks = ProcessedDatasetReader::new().read_blocks(&input)?;
                let report =
                    SegmentationReport::from_blocks(pipeline.config().block_length(), &blocks);
                progress.println(&report.generate_summary());
                let split = pipeline.build_from_blocks(&blocks, Some(&progress))?;
                progress.finish_with_message(&format!("Built {} samples", split.total()));
                split
            };

            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(&output)?;
            serde_json::to_writer(BufWriter::new(file), &split)?;

            println!("\n{}", split.summary());
            println!("Split written to {}", output.display());
        }

        Commands::Window {
            input,
            feature_days,
        } => {
            let config = with_feature_days(base_config, feature_days)?;
            let records = PayloadReader::new().read_payload(&input)?;
            info!("Read {} payload days from {}", records.len(), input.display());

            let features = Pipeline::new(config)?.window_single_sample(&records)?;
            println!("{}", serde_json::to_string(&features)?);
        }

        Commands::Validate {
            input,
            feature_days,
        } => {
            let config = with_feature_days(base_config, feature_days)?;

            println!("Validating record table...");
            println!("Input file: {}", input.display());

            let progress = ProgressReporter::new_spinner("Reading record table...", false);
            let records = RecordTableReader::new().read_records(&input)?;

            let (blocks, report) = Pipeline::new(config)?.prepare(&records, Some(&progress))?;
            progress.finish_with_message("Validation complete");

            println!("\n{}", report.generate_summary());

            if blocks.is_empty() {
                println!("⚠️  No block reaches the required length");
            } else if report.starved_locations.is_empty() {
                println!("✅ Every location contributes at least one sample");
            } else {
                println!(
                    "⚠️  {} locations contribute no samples",
                    report.starved_locations.len()
                );
            }
        }

        Commands::Info { file } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            let blocks = writer.read_blocks(&file)?;

            println!("\nFile Details:");
            println!("{}", file_info.summary());

            println!("\nBlocks per location ({} blocks total):", blocks.len());
            for (location, count) in blocks_per_location(&blocks) {
                println!("  {}: {}", location, count);
            }
        }
    }

    Ok(())
}

fn with_feature_days(config: PipelineConfig, feature_days: Option<usize>) -> Result<PipelineConfig> {
    let config = match feature_days {
        Some(days) => PipelineConfig {
            feature_days: days,
            ..config
        },
        None => config,
    };
    config.checked()
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if installed.is_err() {
        warn!("Logging was already initialized");
    }
    Ok(())
}
