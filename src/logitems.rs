//! Reconstruction of forcing-update events from one run's log.
//!
//! Four parallel record sequences describe each field update: the forcing
//! datetime it was applied at, the data file it was read from, its record
//! index within that file, and the checksum of the resulting field data.
//! After runoff deduplication the four sequences must line up exactly; any
//! disagreement means the run itself is broken and reconstruction fails fast.

use chrono::NaiveDateTime;
use indexmap::IndexSet;
use tracing::debug;

use crate::checksums::{dedup_runoff_checksums, extract_checksums, Checksum};
use crate::constants::record_keys;
use crate::dates::parse_forcing_datetime;
use crate::errors::HarnessError;
use crate::records::{values_with_key, RecordValue};
use crate::types::{FieldFile, FieldName};

/// One reconstructed forcing-field update observation. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct LogItem {
    /// Forcing field that was updated, from the checksum key.
    pub field_name: FieldName,
    /// Data file the field data was read from.
    pub field_file: FieldFile,
    /// Record index within the data file.
    pub field_index: i64,
    /// Model datetime at which the update was applied.
    pub forcing_datetime: NaiveDateTime,
    /// Checksum record reported for the update.
    pub checksum: Checksum,
}

/// Synchronization record counts checked during reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncCounts {
    /// Number of experiment clock records in the log.
    pub experiment: usize,
    /// Number of forcing clock records in the log.
    pub forcing: usize,
    /// Expected count: field updates divided by distinct field names.
    pub expected: usize,
}

/// Reconstruction output: ordered log items plus bookkeeping counters.
#[derive(Clone, Debug)]
pub struct LogReconstruction {
    /// Reconstructed updates, in log order.
    pub items: Vec<LogItem>,
    /// Duplicate runoff checksums dropped before correlation.
    pub removed_runoff_duplicates: usize,
    /// Clock record counts and the expectation they were checked against.
    pub sync: SyncCounts,
}

/// Reconstruct the ordered log items from one run's log text.
///
/// Convenience wrapper around [`reconstruct`] for callers that only need the
/// items themselves.
pub fn build_log_items(log: &str) -> Result<Vec<LogItem>, HarnessError> {
    Ok(reconstruct(log)?.items)
}

/// Correlate the four parallel update sequences into [`LogItem`]s and check
/// the clock synchronization invariant.
///
/// There must be one experiment/forcing clock record pair per full exchange
/// of all fields, i.e. `updates / distinct_fields` pairs with the division
/// exact. A fractional ratio, a parallel length mismatch, or a clock count
/// mismatch is a [`HarnessError::Consistency`].
pub fn reconstruct(log: &str) -> Result<LogReconstruction, HarnessError> {
    let forcing_datetimes = datetime_values(log, record_keys::FORCING_UPDATE_DATETIME)?;
    let field_files = text_values(log, record_keys::FIELD_UPDATE_FILE)?;
    let field_indices = int_values(log, record_keys::FIELD_UPDATE_INDEX)?;
    let (checksums, removed_runoff_duplicates) = dedup_runoff_checksums(extract_checksums(log)?);

    if forcing_datetimes.len() != field_files.len()
        || field_files.len() != field_indices.len()
        || field_indices.len() != checksums.len()
    {
        return Err(HarnessError::Consistency(format!(
            "parallel update sequences disagree: {} datetimes, {} files, {} indices, {} checksums after runoff dedup",
            forcing_datetimes.len(),
            field_files.len(),
            field_indices.len(),
            checksums.len(),
        )));
    }

    let mut field_names: IndexSet<FieldName> = IndexSet::new();
    let mut items = Vec::with_capacity(checksums.len());
    for (((forcing_datetime, field_file), field_index), checksum) in forcing_datetimes
        .into_iter()
        .zip(field_files)
        .zip(field_indices)
        .zip(checksums)
    {
        field_names.insert(checksum.key.field.clone());
        items.push(LogItem {
            field_name: checksum.key.field.clone(),
            field_file,
            field_index,
            forcing_datetime,
            checksum,
        });
    }

    let experiment_clocks = datetime_values(log, record_keys::CUR_EXP_DATETIME)?;
    let forcing_clocks = datetime_values(log, record_keys::CUR_FORCING_DATETIME)?;

    let updates = items.len();
    let expected = if updates == 0 {
        0
    } else {
        if updates % field_names.len() != 0 {
            return Err(HarnessError::Consistency(format!(
                "{updates} field updates do not divide evenly across {} distinct fields",
                field_names.len()
            )));
        }
        updates / field_names.len()
    };
    if experiment_clocks.len() != expected || forcing_clocks.len() != expected {
        return Err(HarnessError::Consistency(format!(
            "expected {expected} experiment/forcing clock pairs, found {} and {}",
            experiment_clocks.len(),
            forcing_clocks.len(),
        )));
    }

    debug!(
        updates,
        distinct_fields = field_names.len(),
        removed_runoff = removed_runoff_duplicates,
        "reconstructed forcing update log"
    );

    Ok(LogReconstruction {
        items,
        removed_runoff_duplicates,
        sync: SyncCounts {
            experiment: experiment_clocks.len(),
            forcing: forcing_clocks.len(),
            expected,
        },
    })
}

fn datetime_values(log: &str, key: &str) -> Result<Vec<NaiveDateTime>, HarnessError> {
    values_with_key(log, key)?
        .into_iter()
        .map(|value| match value {
            RecordValue::Text(text) => parse_forcing_datetime(&text).ok_or_else(|| {
                HarnessError::Consistency(format!("record '{key}' carries unparseable datetime '{text}'"))
            }),
            other => Err(HarnessError::Consistency(format!(
                "record '{key}' carries non-text value {other:?}"
            ))),
        })
        .collect()
}

fn text_values(log: &str, key: &str) -> Result<Vec<String>, HarnessError> {
    values_with_key(log, key)?
        .into_iter()
        .map(|value| match value {
            RecordValue::Text(text) => Ok(text),
            other => Err(HarnessError::Consistency(format!(
                "record '{key}' carries non-text value {other:?}"
            ))),
        })
        .collect()
}

fn int_values(log: &str, key: &str) -> Result<Vec<i64>, HarnessError> {
    values_with_key(log, key)?
        .into_iter()
        .map(|value| {
            value.as_int().ok_or_else(|| {
                HarnessError::Consistency(format!("record '{key}' carries non-integer value {value:?}"))
            })
        })
        .collect()
}
