#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for ward lookups.
//!
//! Resolves coordinates and photos against the configured boundary
//! dataset, reports data-quality problems in that dataset, and starts the
//! HTTP server.

use std::path::PathBuf;
use std::process::ExitCode;

use civic_map_locator::{WardLocator, bootstrap, extract_gps_from_image};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "civic_map_cli", about = "Ward lookup tools")]
struct Cli {
    /// Configuration file (defaults to `$CIVIC_MAP_CONFIG`, then
    /// `civic_map.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ward containing a coordinate
    Locate {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Print the GPS position embedded in a photo and its ward
    Photo {
        /// Image file (JPEG, TIFF, HEIF, PNG, or WebP)
        path: PathBuf,
    },
    /// Load the dataset and report unnamed or overlapping wards
    Check,
    /// Start the HTTP server
    Serve,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Locate { lat, lng } => {
            let (_, _, locator) = bootstrap(config)?;
            print_ward(&locator, lat, lng)
        }
        Commands::Photo { path } => {
            let (_, _, locator) = bootstrap(config)?;
            let bytes = std::fs::read(&path)?;

            let Some(coordinate) = extract_gps_from_image(&bytes) else {
                println!("{} has no GPS position", path.display());
                return Ok(ExitCode::FAILURE);
            };

            println!("{}, {}", coordinate.latitude, coordinate.longitude);
            print_ward(&locator, coordinate.latitude, coordinate.longitude)
        }
        Commands::Check => {
            let (_, _, locator) = bootstrap(config)?;
            Ok(check(&locator))
        }
        Commands::Serve => {
            actix_web::rt::System::new().block_on(civic_map_server::run_server(config))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_ward(
    locator: &WardLocator,
    lat: f64,
    lng: f64,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match locator.locate_ward(lat, lng)? {
        Some(ward) => {
            println!("{}", serde_json::to_string_pretty(&ward)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("outside service area");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints the data-quality report. Fails if any problem was found.
fn check(locator: &WardLocator) -> ExitCode {
    let dataset = locator.dataset();
    println!(
        "{} wards, {} ward names",
        dataset.len(),
        dataset.zones().len()
    );

    let unnamed = dataset.unnamed_wards();
    let overlaps = dataset.overlaps();

    if !unnamed.is_empty() {
        let list: Vec<String> = unnamed.iter().map(ToString::to_string).collect();
        println!("Wards without a name: {}", list.join(", "));
    }
    for overlap in &overlaps {
        println!(
            "Wards {} and {} overlap (ward {} wins in the shared area)",
            overlap.first, overlap.second, overlap.first
        );
    }

    if unnamed.is_empty() && overlaps.is_empty() {
        println!("No problems found");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
