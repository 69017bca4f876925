// Primitives for reading Excel files (XLS and XLSX).

use calamine::{open_workbook_auto, DataType, Range, Reader};

use crate::survey::io_common::RawSheet;
use crate::survey::*;

/// Reads a cell as text. Whole numbers lose their decimal part, since
/// spreadsheets store `5` as `5.0`.
fn read_cell(cell: &DataType, lineno: usize) -> SurveyResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok("".to_string()),
        _ => Err(SurveyError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", cell),
        }),
    }
}

fn get_range(path: &str, worksheet: Option<&str>) -> SurveyResult<Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet);
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(name) = worksheet {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyFileSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };
    Ok(wrange)
}

pub fn read_excel_sheet(path: &str, worksheet: Option<&str>) -> SurveyResult<RawSheet> {
    let wrange = get_range(path, worksheet)?;
    let mut iter = wrange.rows();

    let header_cells = iter.next().context(EmptyFileSnafu { path })?;
    let mut header: Vec<String> = Vec::new();
    for cell in header_cells.iter() {
        header.push(read_cell(cell, 1)?);
    }
    // Trailing empty header cells are padding from the spreadsheet.
    while header.last().map(|h| h.trim().is_empty()).unwrap_or(false) {
        header.pop();
    }
    debug!("read_excel_sheet: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = RawSheet::lineno(idx);
        let mut cells: Vec<String> = Vec::new();
        for cell in row.iter().take(header.len()) {
            cells.push(read_cell(cell, lineno)?);
        }
        rows.push(cells);
    }
    debug!("read_excel_sheet: {:?}: {} rows", path, rows.len());
    Ok(RawSheet { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(read_cell(&DataType::Float(5.0), 2).unwrap(), "5");
        assert_eq!(read_cell(&DataType::Float(5.5), 2).unwrap(), "5.5");
        assert_eq!(read_cell(&DataType::Int(7), 2).unwrap(), "7");
        assert_eq!(
            read_cell(&DataType::String(" CH001 ".to_string()), 2).unwrap(),
            " CH001 "
        );
        assert_eq!(read_cell(&DataType::Empty, 2).unwrap(), "");
    }

    #[test]
    fn unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        fs::write(&path, "not a workbook").unwrap();
        assert!(matches!(
            read_excel_sheet(&path.display().to_string(), None),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }
}
