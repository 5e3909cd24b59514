//! cutkit CLI - DXF to SVG conversion and cut metrics
//!
//! Positional subcommands only:
//! - `cutkit convert file.dxf file.svg` converts a single file
//! - `cutkit convert folder/` converts every DXF in the folder
//! - `cutkit metrics file.dxf` prints cut metrics as JSON
//! - `cutkit inspect file.dxf` prints the entity type table

use clap::{Parser, Subcommand};
use cutkit::pipeline;
use cutkit::{init_logging, ConversionConfig, ErrorTally};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cutkit")]
#[command(version)]
#[command(about = "DXF to SVG converter and cut-metrics calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a DXF file to SVG, or every DXF file in a folder
    Convert {
        /// Input DXF file, or a folder for batch mode
        input: PathBuf,
        /// Output SVG file (single-file mode only; batch mode derives names)
        output: Option<PathBuf>,
    },
    /// Print cut length and piercing count as JSON
    Metrics {
        /// Input DXF file
        input: PathBuf,
    },
    /// Print the entity types found in a DXF file
    Inspect {
        /// Input DXF file
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Help and version requests are not usage errors
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = init_logging() {
        eprintln!("failed to initialize logging: {}", err);
    }

    let config = ConversionConfig::default();

    match cli.command {
        Commands::Convert { input, output } => run_convert(&input, output, &config),
        Commands::Metrics { input } => {
            match pipeline::collect_metrics(&input, &config) {
                Ok(metrics) => match serde_json::to_string(&metrics) {
                    Ok(json) => println!("{}", json),
                    Err(err) => println!("{}", error_json(&err.to_string())),
                },
                // Read failures yield a single structured error, not a panic
                Err(err) => println!("{}", error_json(&err.to_string())),
            }
            ExitCode::SUCCESS
        }
        Commands::Inspect { input } => {
            match pipeline::inspect(&input) {
                Ok(table) => print!("{}", table),
                Err(err) => println!("error: {}", err),
            }
            ExitCode::SUCCESS
        }
    }
}

fn run_convert(input: &PathBuf, output: Option<PathBuf>, config: &ConversionConfig) -> ExitCode {
    if input.is_dir() {
        if output.is_some() {
            eprintln!("batch mode derives output names; do not pass an output path");
            return ExitCode::from(1);
        }
        // Per-file failures are reported in the summary and do not change
        // the exit code.
        match pipeline::convert_folder(input, config) {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::from(1)
            }
        }
    } else {
        let Some(output) = output else {
            eprintln!("usage: cutkit convert <file.dxf> <file.svg>");
            return ExitCode::from(1);
        };
        let mut tally = ErrorTally::new();
        match pipeline::convert_file(input, &output, config, &mut tally) {
            Ok(report) => {
                println!(
                    "{} ({:.1} x {:.1} mm, {} entities)",
                    report.output.display(),
                    report.width_mm,
                    report.height_mm,
                    report.element_count
                );
            }
            Err(err) => println!("{}", err),
        }
        if !tally.is_empty() {
            println!("error summary:");
            for (cause, count) in tally.iter() {
                println!("  {} : {}", cause, count);
            }
        }
        ExitCode::SUCCESS
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
