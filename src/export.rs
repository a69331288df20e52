//! CSV export of the email records.

use crate::database::EmailRecord;

pub const CSV_HEADER: [&str; 2] = ["id", "email_name"];

/// Writes `records` as CSV: a header row followed by one row per record, in the given order.
/// The header is written even when there are no records.
pub fn to_csv(records: &[EmailRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|er| Error::Flush(er.error().to_string()))?;

    Ok(String::from_utf8(bytes)?)
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush the csv writer: {0}")]
    Flush(String),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
