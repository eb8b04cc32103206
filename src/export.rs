use crate::error::ExportError;
use crate::models::StoredRecord;
use csv::{QuoteStyle, WriterBuilder};

pub const CSV_FILENAME: &str = "email_verification_results.csv";

const CSV_HEADER: [&str; 7] = [
    "email",
    "status",
    "reason",
    "syntax_valid",
    "domain_exists",
    "mx_records_exist",
    "verified_at",
];

const NULL: &str = "null";

fn flag(value: Option<bool>) -> String {
    value.map_or_else(|| NULL.to_string(), |b| b.to_string())
}

/// Renders records as CSV. The header line is bare; every data field is
/// quoted and unset values are written as the literal `null`.
pub fn records_to_csv(records: &[StoredRecord]) -> Result<String, ExportError> {
    let mut buffer = CSV_HEADER.join(",").into_bytes();
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(buffer);

    for record in records {
        writer.write_record([
            record.email.clone(),
            record.status.to_string(),
            record.reason.clone(),
            flag(record.syntax_valid),
            flag(record.domain_exists),
            flag(record.mx_records_exist),
            record
                .verified_at
                .map_or_else(|| NULL.to_string(), |at| at.to_rfc3339()),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
