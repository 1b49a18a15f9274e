//! Minimal reader for the Fortran namelist files the experiments ship.
//!
//! Handles the `&group ... key = value ... /` subset that `accessom2.nml`
//! uses: quoted string values, `!` comments, and case-insensitive group and
//! key names. Nothing more.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::constants::namelist_keys;
use crate::dates::parse_forcing_datetime;
use crate::errors::HarnessError;

/// Parsed namelist file: group name to key/value entries.
#[derive(Clone, Debug, Default)]
pub struct NamelistFile {
    groups: IndexMap<String, IndexMap<String, String>>,
}

impl NamelistFile {
    /// Read and parse the namelist at `path`.
    pub fn read(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path)
            .map_err(|err| HarnessError::Config(format!("cannot read '{}': {err}", path.display())))?;
        Self::parse(&text)
    }

    /// Parse namelist text.
    pub fn parse(text: &str) -> Result<Self, HarnessError> {
        let mut groups: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        let mut current: Option<String> = None;

        for raw in text.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('&') {
                if current.is_some() {
                    return Err(HarnessError::Config(format!(
                        "nested namelist group '&{}'",
                        name.trim()
                    )));
                }
                let name = name.trim().to_ascii_lowercase();
                groups.entry(name.clone()).or_default();
                current = Some(name);
            } else if line == "/" {
                if current.take().is_none() {
                    return Err(HarnessError::Config(
                        "group terminator outside a namelist group".to_string(),
                    ));
                }
            } else if let Some((key, value)) = line.split_once('=') {
                let Some(group) = current.as_ref() else {
                    return Err(HarnessError::Config(format!(
                        "assignment outside a namelist group: '{line}'"
                    )));
                };
                if let Some(entries) = groups.get_mut(group) {
                    entries.insert(
                        key.trim().to_ascii_lowercase(),
                        unquote(value.trim().trim_end_matches(',')).to_string(),
                    );
                }
            } else {
                return Err(HarnessError::Config(format!(
                    "unrecognized namelist line: '{line}'"
                )));
            }
        }

        if let Some(group) = current {
            return Err(HarnessError::Config(format!(
                "unterminated namelist group '&{group}'"
            )));
        }
        Ok(Self { groups })
    }

    /// Look up a value by group and key, case-insensitively.
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.groups
            .get(&group.to_ascii_lowercase())?
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Like [`NamelistFile::get`], but a missing entry is a config error.
    pub fn require(&self, group: &str, key: &str) -> Result<&str, HarnessError> {
        self.get(group, key).ok_or_else(|| {
            HarnessError::Config(format!("namelist group '&{group}' is missing '{key}'"))
        })
    }
}

/// Read the forcing period (start, end) from an experiment's namelist.
pub fn forcing_period(namelist: &NamelistFile) -> Result<(NaiveDateTime, NaiveDateTime), HarnessError> {
    let start = parse_namelist_datetime(namelist, namelist_keys::FORCING_START_DATE)?;
    let end = parse_namelist_datetime(namelist, namelist_keys::FORCING_END_DATE)?;
    Ok((start, end))
}

fn parse_namelist_datetime(namelist: &NamelistFile, key: &str) -> Result<NaiveDateTime, HarnessError> {
    let value = namelist.require(namelist_keys::DATE_MANAGER_GROUP, key)?;
    parse_forcing_datetime(value).ok_or_else(|| {
        HarnessError::Config(format!("'{key}' holds unparseable datetime '{value}'"))
    })
}

/// Trim a trailing `!` comment, respecting quoted strings.
fn strip_comment(line: &str) -> &str {
    let mut in_quote: Option<char> = None;
    for (idx, ch) in line.char_indices() {
        match in_quote {
            Some(quote) if ch == quote => in_quote = None,
            None if ch == '\'' || ch == '"' => in_quote = Some(ch),
            None if ch == '!' => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Strip one layer of matching quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    const SAMPLE: &str = "\
&date_manager_nml
    forcing_start_date = '1958-01-01T00:00:00'
    forcing_end_date = '1959-01-01T00:00:00'  ! exclusive
    restart_period = 0, 0, 86400
/

&runtime_nml
    log_level = \"debug\"
/
";

    #[test]
    fn parses_groups_keys_and_comments() {
        let namelist = NamelistFile::parse(SAMPLE).unwrap();
        assert_eq!(
            namelist.get("date_manager_nml", "forcing_start_date"),
            Some("1958-01-01T00:00:00")
        );
        assert_eq!(
            namelist.get("DATE_MANAGER_NML", "Forcing_End_Date"),
            Some("1959-01-01T00:00:00")
        );
        assert_eq!(namelist.get("runtime_nml", "log_level"), Some("debug"));
        assert_eq!(namelist.get("date_manager_nml", "missing"), None);
        assert_eq!(namelist.get("missing_nml", "key"), None);
    }

    #[test]
    fn reads_the_forcing_period() {
        let namelist = NamelistFile::parse(SAMPLE).unwrap();
        let (start, end) = forcing_period(&namelist).unwrap();
        assert_eq!(
            start,
            NaiveDate::from_ymd_opt(1958, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(end.date().year(), 1959);
    }

    #[test]
    fn missing_date_keys_are_config_errors() {
        let namelist = NamelistFile::parse("&date_manager_nml\n/\n").unwrap();
        assert!(matches!(
            forcing_period(&namelist),
            Err(HarnessError::Config(_))
        ));
    }

    #[test]
    fn structural_errors_are_rejected() {
        assert!(NamelistFile::parse("forcing_start_date = 'x'\n").is_err());
        assert!(NamelistFile::parse("&a\n&b\n/\n/\n").is_err());
        assert!(NamelistFile::parse("&a\nkey = 1\n").is_err());
        assert!(NamelistFile::parse("/\n").is_err());
        assert!(NamelistFile::parse("&a\njust some words\n/\n").is_err());
    }

    #[test]
    fn comment_marker_inside_quotes_is_preserved() {
        let namelist = NamelistFile::parse("&a\nnote = 'keep!this'\n/\n").unwrap();
        assert_eq!(namelist.get("a", "note"), Some("keep!this"));
    }
}
