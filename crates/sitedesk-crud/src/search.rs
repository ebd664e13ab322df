// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Case-insensitive substring search over every field of a record.

use serde::Serialize;
use serde_json::Value;

/// Records where any field's string form contains `term`, in input order.
///
/// Numbers and booleans are stringified; arrays are joined with `,`. Null
/// and absent fields never match. An empty term matches everything.
pub fn search<'a, T: Serialize>(records: &'a [T], term: &str) -> Vec<&'a T> {
    search_excluding(records, term, &[])
}

/// As [`search`], skipping the named top-level fields.
pub fn search_excluding<'a, T: Serialize>(
    records: &'a [T],
    term: &str,
    skip: &[&str],
) -> Vec<&'a T> {
    if term.is_empty() {
        return records.iter().collect();
    }
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches(*record, &needle, skip))
        .collect()
}

fn matches<T: Serialize>(record: &T, needle: &str, skip: &[&str]) -> bool {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => fields
            .iter()
            .filter(|(name, _)| !skip.contains(&name.as_str()))
            .filter_map(|(_, value)| stringify(value))
            .any(|text| text.to_lowercase().contains(needle)),
        Ok(other) => stringify(&other).is_some_and(|text| text.to_lowercase().contains(needle)),
        Err(_) => false,
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| stringify(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
