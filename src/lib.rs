#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Checksum records, runoff deduplication, and reference checksum stores.
pub mod checksums;
/// Harness configuration and experiment run specs.
pub mod config;
/// Centralized constants for record keys, file names, and expectations.
pub mod constants;
/// Datetime parsing helpers shared by the namelist reader and log reconstruction.
pub mod dates;
/// Typed model of the forcing-description file shipped with each experiment.
pub mod forcing;
/// Reconstruction of forcing-update events from one run's log.
pub mod logitems;
/// Minimal reader for the Fortran namelist files the experiments ship.
pub mod namelist;
/// Structured extraction of single-entry records from raw model logs.
pub mod records;
/// Blocking execution of the external simulation binary.
pub mod runner;
/// Shared type aliases.
pub mod types;
/// Regression checks comparing a run against stored reference data.
pub mod validate;

mod errors;

pub use checksums::{
    dedup_runoff_checksums, extract_checksums, filter_checksums, stored_checksums, Checksum,
    ChecksumKey,
};
pub use config::{ExperimentSpec, HarnessConfig};
pub use errors::HarnessError;
pub use forcing::{ForcingConfig, ForcingInput};
pub use logitems::{build_log_items, reconstruct, LogItem, LogReconstruction, SyncCounts};
pub use namelist::{forcing_period, NamelistFile};
pub use records::{parse_record_line, records_with_key, values_with_key, LogRecord, RecordValue};
pub use runner::{ExperimentRunner, RunOutput};
pub use types::{ExperimentName, FieldFile, FieldName};
pub use validate::{standard_battery, CheckOutcome};
