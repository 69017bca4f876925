// Primitives for reading CSV files.

use crate::survey::io_common::RawSheet;
use crate::survey::*;

/// Reads a CSV file: the first record is the header, all the others are data.
///
/// Lines may have fewer or more cells than the header; the callers decide.
pub fn read_csv_sheet(path: &str) -> SurveyResult<RawSheet> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { lineno: 1usize })?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => return Err(SurveyError::EmptyFile { path: path.to_string() }),
    };
    debug!("read_csv_sheet: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = RawSheet::lineno(idx);
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    debug!("read_csv_sheet: {:?}: {} rows", path, rows.len());
    Ok(RawSheet { header, rows })
}
