use std::fs::File;
use std::path::Path;

use kdam::tqdm;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tourcast_core::linking::{link_trips, LinkingDiagnostic};
use tourcast_core::model::{Household, Person, RawTripSegment};
use tourcast_core::tour::{extract_tours, TourDiagnostic};

use super::cli_args::{CliArgs, Command};
use super::error::TourcastError;
use super::rows::{HouseholdRow, LinkedTripRow, PersonRow, SegmentRow, TourRow};
use super::run_config::RunConfig;

pub const LINKED_TRIPS_FILENAME: &str = "linked_trips.csv";
pub const TOURS_FILENAME: &str = "tours.csv";
pub const DIAGNOSTICS_FILENAME: &str = "diagnostics.json";

/// per-run report of records the engine excluded rather than failed on.
#[derive(Debug, Serialize)]
struct DiagnosticsReport {
    excluded_segments: Vec<LinkingDiagnostic>,
    unanchored_person_days: Vec<TourDiagnostic>,
}

pub fn command_line_runner(args: &CliArgs) -> Result<(), TourcastError> {
    match &args.command {
        Command::Run { config } => run(config),
    }
}

/// executes one survey canonicalization run:
///   1. read household, person, and unlinked trip segment tables
///   2. merge segments into linked trips
///   3. assemble linked trips into tours
///   4. write linked_trips.csv, tours.csv, and a diagnostics report
pub fn run(config_path: &Path) -> Result<(), TourcastError> {
    let config = RunConfig::from_path(config_path)?;
    log::info!("starting run from {}", config_path.to_string_lossy());

    let households: Vec<Household> = read_rows::<HouseholdRow>(&config.households_input)?
        .into_iter()
        .map(Household::from)
        .collect();
    let persons: Vec<Person> = convert_rows(
        read_rows::<PersonRow>(&config.persons_input)?,
        &config.persons_input,
        Person::try_from,
    );
    let segments: Vec<RawTripSegment> = convert_rows(
        read_rows::<SegmentRow>(&config.segments_input)?,
        &config.segments_input,
        RawTripSegment::try_from,
    );
    log::info!(
        "read {} households, {} persons, {} trip segments",
        households.len(),
        persons.len(),
        segments.len()
    );

    let linking = link_trips(segments, &config.linking)?;
    let extraction = extract_tours(&persons, &households, linking.linked_trips, &config.tours)?;

    std::fs::create_dir_all(&config.output_directory).map_err(|e| TourcastError::WriteError {
        filepath: config.output_directory.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;

    write_csv(
        &config.output_directory.join(LINKED_TRIPS_FILENAME),
        extraction.linked_trips.iter().map(LinkedTripRow::from),
        extraction.linked_trips.len(),
        "linked trips",
    )?;
    write_csv(
        &config.output_directory.join(TOURS_FILENAME),
        extraction.tours.iter().map(TourRow::from),
        extraction.tours.len(),
        "tours",
    )?;

    let report = DiagnosticsReport {
        excluded_segments: linking.diagnostics,
        unanchored_person_days: extraction.diagnostics,
    };
    let report_path = config.output_directory.join(DIAGNOSTICS_FILENAME);
    let report_file = File::create(&report_path).map_err(|e| TourcastError::WriteError {
        filepath: report_path.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;
    serde_json::to_writer_pretty(report_file, &report).map_err(|e| TourcastError::WriteError {
        filepath: report_path.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;

    log::info!(
        "run complete: {} linked trips, {} tours written to {}",
        extraction.linked_trips.len(),
        extraction.tours.len(),
        config.output_directory.to_string_lossy()
    );
    Ok(())
}

/// reads all well-formed rows of a CSV table. malformed rows are
/// skipped with a warning, matching the engine's partial-failure
/// semantics; only an unreadable file is fatal.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TourcastError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| TourcastError::ReadError {
        filepath: path.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => log::warn!(
                "skipping malformed row in {}: {e}",
                path.to_string_lossy()
            ),
        }
    }
    Ok(rows)
}

fn convert_rows<R, T, E>(
    rows: Vec<R>,
    path: &Path,
    convert: impl Fn(R) -> Result<T, E>,
) -> Vec<T>
where
    E: std::fmt::Display,
{
    rows.into_iter()
        .filter_map(|row| match convert(row) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("skipping row in {}: {e}", path.to_string_lossy());
                None
            }
        })
        .collect()
}

fn write_csv<I, T>(path: &Path, rows: I, total: usize, desc: &str) -> Result<(), TourcastError>
where
    I: Iterator<Item = T>,
    T: Serialize,
{
    let mut writer = csv::Writer::from_path(path).map_err(|e| TourcastError::WriteError {
        filepath: path.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;
    let bar_iter = tqdm!(rows, total = total, desc = desc);
    for row in bar_iter {
        writer.serialize(row).map_err(|e| TourcastError::WriteError {
            filepath: path.to_string_lossy().to_string(),
            error: e.to_string(),
        })?;
    }
    eprintln!();
    writer.flush().map_err(|e| TourcastError::WriteError {
        filepath: path.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;
    Ok(())
}
