//! Regression checks comparing a run against stored reference data.
//!
//! Every check is independent: it takes exactly the inputs it compares and
//! returns its own result, so a caller can run one check or the whole
//! battery and failures never mask each other.

use chrono::{Datelike, Duration, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};

use crate::constants::validation;
use crate::errors::HarnessError;
use crate::forcing::ForcingConfig;
use crate::logitems::LogItem;
use crate::runner::RunOutput;
use crate::types::ChecksumKeyText;

/// Expected spacing between consecutive unique forcing updates.
pub fn expected_forcing_timestep() -> Duration {
    Duration::hours(validation::FORCING_TIMESTEP_HOURS)
}

/// The run must have exited cleanly.
pub fn check_exit_status(run: &RunOutput) -> Result<(), HarnessError> {
    if run.exit_code == 0 {
        Ok(())
    } else {
        Err(HarnessError::Validation(format!(
            "simulation exited with status {}",
            run.exit_code
        )))
    }
}

/// Exact comparison of run checksums against the stored reference set.
///
/// Key sets must match and every value must be identical, bit-for-bit for
/// floats: the model is expected to reproduce exactly across runs, and any
/// drift is a regression until shown otherwise.
pub fn check_unchanged_checksums(
    run: &IndexMap<ChecksumKeyText, f64>,
    stored: &IndexMap<ChecksumKeyText, f64>,
) -> Result<(), HarnessError> {
    let run_keys: IndexSet<&ChecksumKeyText> = run.keys().collect();
    let stored_keys: IndexSet<&ChecksumKeyText> = stored.keys().collect();
    if run_keys != stored_keys {
        let missing: Vec<&str> = stored_keys
            .difference(&run_keys)
            .map(|key| key.as_str())
            .collect();
        let unexpected: Vec<&str> = run_keys
            .difference(&stored_keys)
            .map(|key| key.as_str())
            .collect();
        return Err(HarnessError::Validation(format!(
            "checksum keys changed: missing {missing:?}, unexpected {unexpected:?}"
        )));
    }
    for (key, stored_value) in stored {
        let run_value = run[key];
        if run_value.to_bits() != stored_value.to_bits() {
            return Err(HarnessError::Validation(format!(
                "checksum '{key}' changed: stored {stored_value}, run {run_value}"
            )));
        }
    }
    Ok(())
}

/// Check the forcing-scaling experiment: the checksum at position `i` of
/// `keys` must equal `i` times its stored value, within
/// [`validation::SCALING_TOLERANCE`].
pub fn check_field_scaling(
    run: &IndexMap<ChecksumKeyText, f64>,
    stored: &IndexMap<ChecksumKeyText, f64>,
    keys: &[&str],
) -> Result<(), HarnessError> {
    for (multiplier, key) in keys.iter().enumerate() {
        let run_value = *run.get(*key).ok_or_else(|| {
            HarnessError::Validation(format!("run is missing scaled checksum '{key}'"))
        })?;
        let stored_value = *stored.get(*key).ok_or_else(|| {
            HarnessError::Validation(format!("reference is missing scaled checksum '{key}'"))
        })?;
        let expected = multiplier as f64 * stored_value;
        if (run_value - expected).abs() >= validation::SCALING_TOLERANCE {
            return Err(HarnessError::Validation(format!(
                "scaled checksum '{key}': expected {expected} ({multiplier}x stored), run {run_value}"
            )));
        }
    }
    Ok(())
}

/// The first forcing update must land on the configured forcing start date.
pub fn check_forcing_start(
    items: &[LogItem],
    forcing_start: NaiveDateTime,
) -> Result<(), HarnessError> {
    let Some(first) = items.first() else {
        return Err(HarnessError::Validation(
            "log contains no forcing updates".to_string(),
        ));
    };
    if first.forcing_datetime != forcing_start {
        return Err(HarnessError::Validation(format!(
            "first forcing update at {}, expected forcing start {forcing_start}",
            first.forcing_datetime
        )));
    }
    Ok(())
}

/// Unique forcing datetimes must advance by exactly `expected` at every step.
pub fn check_forcing_timestep(items: &[LogItem], expected: Duration) -> Result<(), HarnessError> {
    let unique: IndexSet<NaiveDateTime> =
        items.iter().map(|item| item.forcing_datetime).collect();
    let unique: Vec<NaiveDateTime> = unique.into_iter().collect();
    for window in unique.windows(2) {
        let delta = window[1] - window[0];
        if delta != expected {
            return Err(HarnessError::Validation(format!(
                "forcing timestep between {} and {} is {delta}, expected {expected}",
                window[0], window[1]
            )));
        }
    }
    Ok(())
}

/// Fields observed in the log must match the configured forcing inputs.
pub fn check_field_coverage(
    items: &[LogItem],
    forcing: &ForcingConfig,
) -> Result<(), HarnessError> {
    let observed: IndexSet<&str> = items.iter().map(|item| item.field_name.as_str()).collect();
    let configured: IndexSet<&str> = forcing
        .inputs
        .iter()
        .map(|input| input.cname.as_str())
        .collect();
    if observed != configured {
        return Err(HarnessError::Validation(format!(
            "forcing fields in log {observed:?} do not match configuration {configured:?}"
        )));
    }
    Ok(())
}

/// Per-field update indices must increase within a forcing year and restart
/// when the forcing datetime crosses into a new year.
pub fn check_index_progression(items: &[LogItem]) -> Result<(), HarnessError> {
    let mut last_seen: IndexMap<&str, &LogItem> = IndexMap::new();
    for item in items {
        if let Some(previous) = last_seen.get(item.field_name.as_str()) {
            let same_year = previous.forcing_datetime.year() == item.forcing_datetime.year();
            if same_year {
                if item.field_index <= previous.field_index {
                    return Err(HarnessError::Validation(format!(
                        "field '{}' index went from {} to {} within year {}",
                        item.field_name,
                        previous.field_index,
                        item.field_index,
                        item.forcing_datetime.year()
                    )));
                }
            } else if item.field_index > previous.field_index {
                return Err(HarnessError::Validation(format!(
                    "field '{}' index did not restart at the {} year boundary (was {}, now {})",
                    item.field_name,
                    item.forcing_datetime.year(),
                    previous.field_index,
                    item.field_index
                )));
            }
        }
        last_seen.insert(item.field_name.as_str(), item);
    }
    Ok(())
}

/// Result of one named check in the standard battery.
#[derive(Debug)]
pub struct CheckOutcome {
    /// Short stable name of the check.
    pub name: &'static str,
    /// The check's result.
    pub result: Result<(), HarnessError>,
}

impl CheckOutcome {
    /// True when the check passed.
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run the standard battery for one experiment and collect every outcome.
///
/// The order is fixed; each entry carries its own result so a reporting
/// caller can show all failures at once.
pub fn standard_battery(
    run: &RunOutput,
    run_checksums: &IndexMap<ChecksumKeyText, f64>,
    stored: &IndexMap<ChecksumKeyText, f64>,
    items: &[LogItem],
    forcing_start: NaiveDateTime,
    forcing: &ForcingConfig,
) -> Vec<CheckOutcome> {
    vec![
        CheckOutcome {
            name: "exit_status",
            result: check_exit_status(run),
        },
        CheckOutcome {
            name: "unchanged_checksums",
            result: check_unchanged_checksums(run_checksums, stored),
        },
        CheckOutcome {
            name: "forcing_start",
            result: check_forcing_start(items, forcing_start),
        },
        CheckOutcome {
            name: "forcing_timestep",
            result: check_forcing_timestep(items, expected_forcing_timestep()),
        },
        CheckOutcome {
            name: "field_coverage",
            result: check_field_coverage(items, forcing),
        },
        CheckOutcome {
            name: "index_progression",
            result: check_index_progression(items),
        },
    ]
}
