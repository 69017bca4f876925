// Primitives shared by the readers of uploaded files.

use std::path::Path;

use church_health::builder::Builder;
use church_health::row::{normalize_column, parse_score_cell};

use crate::survey::{io_csv, io_excel, *};

/// The cells of an uploaded file, all read as text.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawSheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    /// The 1-based row number of a data row, as shown in a spreadsheet.
    pub fn lineno(idx: usize) -> usize {
        idx + 2
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FileKind {
    Csv,
    Excel,
}

pub fn file_kind(path: &str) -> SurveyResult<FileKind> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("csv") => Ok(FileKind::Csv),
        Some("xls") | Some("xlsx") => Ok(FileKind::Excel),
        _ => Err(SurveyError::UnsupportedFile {
            path: path.to_string(),
        }),
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Reads an uploaded file, choosing the reader from the file extension.
pub fn read_sheet(path: &str, worksheet: Option<&str>) -> SurveyResult<RawSheet> {
    match file_kind(path)? {
        FileKind::Csv => io_csv::read_csv_sheet(path),
        FileKind::Excel => io_excel::read_excel_sheet(path, worksheet),
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.contains(&normalize_column(h).as_str()))
}

pub fn parse_allow_list(sheet: &RawSheet) -> SurveyResult<AllowList> {
    let code_idx = find_column(&sheet.header, &["code", "church_code"]);
    let control_idx = find_column(&sheet.header, &["control_id"]);
    let (code_idx, control_idx) = match (code_idx, control_idx) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(SurveyError::InvalidAllowListHeader {
                found: sheet.header.clone(),
            })
        }
    };
    debug!(
        "parse_allow_list: code column {} control id column {}",
        code_idx, control_idx
    );

    let mut res = AllowList::new();
    for row in sheet.rows.iter().filter(|r| !is_blank(r)) {
        let code = row.get(code_idx).map(|s| s.as_str()).unwrap_or("");
        let control_id = row.get(control_idx).map(|s| s.as_str()).unwrap_or("");
        // An empty control id would match every untracked submission.
        if code.trim().is_empty() || control_id.trim().is_empty() {
            debug!("parse_allow_list: skipping incomplete row {:?}", row);
            continue;
        }
        res.insert(code, control_id);
    }
    Ok(res)
}

/// Reads the scores of a direct upload.
///
/// The header must be exactly `Q1` to `Q7`, in this order. Blank rows are
/// skipped, any other row must hold seven valid scores.
pub fn parse_scores(sheet: &RawSheet) -> SurveyResult<Builder> {
    let expected: Vec<String> = (1..=NUM_QUESTIONS).map(|i| format!("q{}", i)).collect();
    let found: Vec<String> = sheet.header.iter().map(|h| normalize_column(h)).collect();
    if found != expected {
        return Err(SurveyError::InvalidScoresHeader {
            found: sheet.header.clone(),
        });
    }

    let mut builder = Builder::new();
    for (idx, row) in sheet.rows.iter().enumerate() {
        if is_blank(row) {
            continue;
        }
        let lineno = RawSheet::lineno(idx);
        let mut values: Vec<i64> = Vec::new();
        for (col, cell) in row.iter().enumerate() {
            let value = parse_score_cell(cell).context(InvalidScoreCellSnafu {
                lineno,
                column: sheet.header.get(col).cloned().unwrap_or_default(),
                content: cell.clone(),
            })?;
            values.push(value);
        }
        builder
            .add_response(&values)
            .context(InvalidUploadRowSnafu { lineno })?;
    }
    debug!("parse_scores: read {} responses", builder.len());
    Ok(builder)
}
