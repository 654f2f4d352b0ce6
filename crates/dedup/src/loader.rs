//! Parse provider exports into [`BusinessRecord`]s.
//!
//! Callers read the files; this module only sees their contents.

use serde_json::Value;

use crate::config::RecordFormat;
use crate::error::DedupError;
use crate::model::BusinessRecord;

pub fn load_records(
    source: &str,
    text: &str,
    format: RecordFormat,
) -> Result<Vec<BusinessRecord>, DedupError> {
    match format {
        RecordFormat::Json => load_json_records(source, text),
        RecordFormat::Csv => load_csv_records(source, text),
    }
}

/// JSON array of flat or nested objects.
pub fn load_json_records(source: &str, text: &str) -> Result<Vec<BusinessRecord>, DedupError> {
    let mut records: Vec<BusinessRecord> =
        serde_json::from_str(text).map_err(|e| DedupError::RecordParse {
            source: source.to_string(),
            message: e.to_string(),
        })?;
    for record in &mut records {
        fill_source(record, source);
    }
    Ok(records)
}

/// Headered CSV. Empty cells are treated as absent; non-core columns are
/// kept as string fields under their header name.
pub fn load_csv_records(source: &str, text: &str) -> Result<Vec<BusinessRecord>, DedupError> {
    let parse_err = |e: csv::Error| DedupError::RecordParse {
        source: source.to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(parse_err)?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(parse_err)?;
        let mut record = BusinessRecord::default();

        for (header, value) in headers.iter().zip(row.iter()) {
            if value.trim().is_empty() {
                continue;
            }
            let value = value.to_string();
            match header {
                "name" => record.name = value,
                "address" => record.address = Some(value),
                "phone" => record.phone = Some(value),
                "website" => record.website = Some(value),
                "source" => record.source = value,
                other => {
                    record.extra.insert(other.to_string(), Value::String(value));
                }
            }
        }

        fill_source(&mut record, source);
        records.push(record);
    }

    Ok(records)
}

fn fill_source(record: &mut BusinessRecord, source: &str) {
    if record.source.trim().is_empty() {
        record.source = source.to_string();
    }
}
