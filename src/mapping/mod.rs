//! Compact grouping mapping string (verb module)
//!
//! Bindings ↔ `grouping="$variable"|grouping="$variable"`
//!
//! Only non-manual bindings appear in the compact form; manual values live
//! in the structured mapping alone. An ignored grouping is written with the
//! aggregate sentinel as its variable name.

mod error;

pub use error::MappingError;

use std::collections::BTreeMap;
use crate::query::GroupingBinding;

/// Separator between entries
pub const ENTRY_SEPARATOR: char = '|';

/// Serialize the non-manual bindings to the compact form
pub fn serialize_bindings(bindings: &BTreeMap<String, GroupingBinding>) -> String {
    bindings
        .iter()
        .filter(|(_, binding)| !binding.is_manual())
        .map(|(grouping, binding)| format!("{}=\"${}\"", grouping, binding.name()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Parse the compact form back into grouping → variable name
pub fn parse_bindings(s: &str) -> Result<BTreeMap<String, String>, MappingError> {
    let mut parsed = BTreeMap::new();
    if s.trim().is_empty() {
        return Ok(parsed);
    }

    for entry in s.split(ENTRY_SEPARATOR) {
        let (grouping, variable) = parse_entry(entry)?;
        if parsed.insert(grouping.to_string(), variable.to_string()).is_some() {
            return Err(MappingError::DuplicateGrouping(grouping.to_string()));
        }
    }
    Ok(parsed)
}

/// The grouping → variable name associations the compact form carries
pub fn binding_associations(bindings: &BTreeMap<String, GroupingBinding>) -> BTreeMap<String, String> {
    bindings
        .iter()
        .filter(|(_, binding)| !binding.is_manual())
        .map(|(grouping, binding)| (grouping.clone(), binding.name().to_string()))
        .collect()
}

fn parse_entry(entry: &str) -> Result<(&str, &str), MappingError> {
    let malformed = || MappingError::MalformedEntry(entry.to_string());

    let (grouping, quoted) = entry.split_once("=\"").ok_or_else(malformed)?;
    let variable = quoted
        .strip_suffix('"')
        .and_then(|v| v.strip_prefix('$'))
        .ok_or_else(malformed)?;

    if grouping.is_empty() {
        return Err(MappingError::EmptyGrouping(entry.to_string()));
    }
    if variable.is_empty() {
        return Err(malformed());
    }
    Ok((grouping, variable))
}
