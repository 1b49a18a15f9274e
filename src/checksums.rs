//! Checksum records, runoff deduplication, and reference checksum stores.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::constants::{fields, record_keys};
use crate::errors::HarnessError;
use crate::records::records_with_key;
use crate::types::{ChecksumKeyText, FieldName};

/// Typed decomposition of a checksum record key such as
/// `checksum-matmxx-swfld_ai-0000043200`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChecksumKey {
    /// Model component tag (e.g. `matmxx`).
    pub component: String,
    /// Forcing field name, the third dash-delimited segment (e.g. `swfld_ai`).
    pub field: FieldName,
    /// Zero-padded model step tag, in seconds since the run start.
    pub step: String,
}

impl FromStr for ChecksumKey {
    type Err = HarnessError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = text.split('-').collect();
        if parts.len() != 4 || parts[0] != record_keys::CHECKSUM_PREFIX {
            return Err(HarnessError::Consistency(format!(
                "malformed checksum key '{text}'"
            )));
        }
        Ok(Self {
            component: parts[1].to_string(),
            field: parts[2].to_string(),
            step: parts[3].to_string(),
        })
    }
}

impl fmt::Display for ChecksumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            record_keys::CHECKSUM_PREFIX,
            self.component,
            self.field,
            self.step
        )
    }
}

/// One checksum record: a single key and its numeric field fingerprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Checksum {
    /// The record's single key.
    pub key: ChecksumKey,
    /// Numeric fingerprint of the field data at that step.
    pub value: f64,
}

/// Extract every checksum record from the log, in line order.
pub fn extract_checksums(log: &str) -> Result<Vec<Checksum>, HarnessError> {
    records_with_key(log, record_keys::CHECKSUM_PREFIX)
        .map(|record| {
            let record = record?;
            let key: ChecksumKey = record.key.parse()?;
            let value = record.value.as_f64().ok_or_else(|| {
                HarnessError::Consistency(format!(
                    "checksum '{}' carries a non-numeric value",
                    record.key
                ))
            })?;
            Ok(Checksum { key, value })
        })
        .collect()
}

/// Drop repeated runoff checksums, keeping the first occurrence of each
/// distinct value. Returns the filtered sequence and the removed count.
///
/// The model exchanges the runoff field more than once per coupling cycle,
/// so identical runoff checksums are expected and must not count against the
/// regression comparison. All other records pass through untouched, in their
/// original relative order.
pub fn dedup_runoff_checksums(checksums: Vec<Checksum>) -> (Vec<Checksum>, usize) {
    let mut kept = Vec::with_capacity(checksums.len());
    let mut seen_runoff: Vec<u64> = Vec::new();
    let mut removed = 0;

    for checksum in checksums {
        if checksum.key.field.contains(fields::RUNOFF_MARKER) {
            // Bit-exact value identity; the model repeats the same bits.
            let bits = checksum.value.to_bits();
            if seen_runoff.contains(&bits) {
                removed += 1;
            } else {
                seen_runoff.push(bits);
                kept.push(checksum);
            }
        } else {
            kept.push(checksum);
        }
    }

    (kept, removed)
}

/// Final checksum value for every key in the log, insertion-ordered by first
/// appearance. Later records overwrite earlier ones, so the map holds the
/// last value the model reported for each key.
pub fn filter_checksums(log: &str) -> Result<IndexMap<ChecksumKeyText, f64>, HarnessError> {
    let mut out = IndexMap::new();
    for checksum in extract_checksums(log)? {
        out.insert(checksum.key.to_string(), checksum.value);
    }
    Ok(out)
}

/// Load the known-good checksum map recorded for an experiment.
pub fn stored_checksums(path: &Path) -> Result<IndexMap<ChecksumKeyText, f64>, HarnessError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
