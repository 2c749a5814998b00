use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-windower")]
#[command(about = "Segments daily weather observations into fixed-length blocks and builds windowed training datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Segment and purge raw observations into a processed dataset
    Prepare {
        #[arg(short, long, help = "Raw observations CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output dataset path, .csv or .parquet [default: output/weather-processed-{YYMMDD}.parquet]"
        )]
        output: Option<PathBuf>,

        #[arg(long)]
        feature_days: Option<usize>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "false", help = "Memory-map the input file")]
        use_mmap: bool,
    },

    /// Build a train/test split of windowed samples
    Build {
        #[arg(short, long, help = "Processed dataset (.csv or .parquet), or a record table with --from-table")]
        input: PathBuf,

        #[arg(long, default_value = "false", help = "Input is a record table CSV to segment and purge first")]
        from_table: bool,

        #[arg(
            short,
            long,
            help = "Output split JSON path [default: output/weather-split-{YYMMDD}.json]"
        )]
        output: Option<PathBuf>,

        #[arg(long)]
        feature_days: Option<usize>,

        #[arg(long)]
        test_fraction: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Turn a single prediction payload into a feature vector
    Window {
        #[arg(short, long, help = "Payload file, .json or .csv")]
        input: PathBuf,

        #[arg(long)]
        feature_days: Option<usize>,
    },

    /// Report segmentation statistics for a record table without building samples
    Validate {
        #[arg(short, long, help = "Record table CSV file")]
        input: PathBuf,

        #[arg(long)]
        feature_days: Option<usize>,
    },

    /// Display information about a processed Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}
