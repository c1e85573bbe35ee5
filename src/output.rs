// src/output.rs
//! Flat-record writers for the persistence collaborator
//!
//! A valuation run exports one flat key-value record (see
//! [`ValuationResult::flat_record`](crate::valuation::ValuationResult::flat_record));
//! records append as CSV rows so many runs batch into one table, or
//! serialize individually as JSON objects. Path and payoff matrices are
//! never part of a record.

use crate::valuation::ValuationResult;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

/// Append a result as one CSV row. With `headers` set the file is truncated
/// and the sorted keys are written first.
pub fn write_record_csv(filename: &str, result: &ValuationResult, headers: bool) -> io::Result<()> {
    let record = result.flat_record();
    let mut file = if headers {
        File::create(filename)?
    } else {
        OpenOptions::new().append(true).create(true).open(filename)?
    };

    if headers {
        let keys: Vec<&str> = record.iter().map(|(k, _)| k.as_str()).collect();
        writeln!(file, "{}", keys.join(","))?;
    }
    let values: Vec<&str> = record.iter().map(|(_, v)| v.as_str()).collect();
    writeln!(file, "{}", values.join(","))?;
    Ok(())
}

/// Serialize a result record as a JSON object string.
pub fn record_to_json(result: &ValuationResult) -> String {
    let mut map = Map::new();
    for (key, value) in result.flat_record() {
        map.insert(key, Value::String(value));
    }
    Value::Object(map).to_string()
}

/// Write a result record as a JSON file.
pub fn write_record_json(filename: &str, result: &ValuationResult) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "{}", record_to_json(result))?;
    Ok(())
}
