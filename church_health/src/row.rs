//! Conversions between the rows of the remote table and [`ResponseRecord`].

use std::collections::HashMap;

use chrono::NaiveDateTime;
use log::debug;

use crate::config::*;
use crate::table::RawRow;

/// The format used for the timestamps written in the table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalized form of a column name: trimmed and lower case.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Reads a cell as a score.
///
/// Spreadsheets happily turn `5` into `5.0`, so integral floats are accepted.
/// Range checking is left to [`Scores::new`].
pub fn parse_score_cell(cell: &str) -> Option<i64> {
    let s = cell.trim();
    if let Ok(x) = s.parse::<i64>() {
        return Some(x);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

/// Converts one stored row into a record.
///
/// `lineno` is only used in error messages. Missing columns are errors: the
/// layout says which columns must be there. A timestamp that cannot be read
/// is not an error, the record simply has no time.
pub fn parse_row(
    row: &RawRow,
    layout: RowLayout,
    lineno: usize,
) -> Result<ResponseRecord, HealthError> {
    let cells: HashMap<String, &String> = row
        .iter()
        .map(|(k, v)| (normalize_column(k), v))
        .collect();

    let get = |column: &str| {
        cells
            .get(column)
            .copied()
            .ok_or_else(|| HealthError::MissingColumn {
                column: column.to_string(),
                lineno,
            })
    };

    let timestamp_s = get("timestamp")?;
    let timestamp = NaiveDateTime::parse_from_str(timestamp_s.trim(), TIMESTAMP_FORMAT).ok();
    if timestamp.is_none() {
        debug!(
            "parse_row: row {}: unreadable timestamp {:?}",
            lineno, timestamp_s
        );
    }

    let code = get("code")?.trim().to_string();
    let control_id = match layout {
        RowLayout::WithControlId => get("control_id")?.trim().to_string(),
        RowLayout::WithoutControlId => "".to_string(),
    };

    let mut values: Vec<i64> = Vec::with_capacity(NUM_QUESTIONS);
    for idx in 1..=NUM_QUESTIONS {
        let column = format!("q{}", idx);
        let cell = get(&column)?;
        let value = parse_score_cell(cell).ok_or_else(|| HealthError::InvalidCell {
            column: column.clone(),
            value: cell.clone(),
            lineno,
        })?;
        values.push(value);
    }
    let scores = Scores::new(&values).map_err(|_| HealthError::InvalidCell {
        column: "q1..q7".to_string(),
        value: format!("{:?}", values),
        lineno,
    })?;

    Ok(ResponseRecord {
        timestamp,
        code,
        control_id,
        scores,
    })
}

/// Converts all the rows of a full read. Fails on the first bad row.
pub fn parse_rows(
    rows: &[RawRow],
    layout: RowLayout,
) -> Result<Vec<ResponseRecord>, HealthError> {
    let mut res: Vec<ResponseRecord> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        // Row 1 is the header in the sheet.
        res.push(parse_row(row, layout, idx + 2)?);
    }
    Ok(res)
}

/// The positional values appended for a record.
pub fn to_row(record: &ResponseRecord, layout: RowLayout) -> Vec<String> {
    let timestamp = record
        .timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();
    let mut res: Vec<String> = vec![timestamp, record.code.clone()];
    if layout == RowLayout::WithControlId {
        res.push(record.control_id.clone());
    }
    res.extend(record.scores.values().iter().map(|v| v.to_string()));
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_row(code: &str) -> RawRow {
        raw(&[
            ("Timestamp", "2025-01-01 10:00:00"),
            ("Code", code),
            ("Control_ID", " A1 "),
            ("Q1", "1"),
            ("Q2", "2"),
            ("Q3", "3"),
            ("Q4", "4"),
            ("Q5", "5.0"),
            ("Q6", "6"),
            ("Q7", "10"),
        ])
    }

    #[test]
    fn parses_a_complete_row() {
        let r = parse_row(&full_row(" ABC "), RowLayout::WithControlId, 2).unwrap();
        assert_eq!(r.code, "ABC");
        assert_eq!(r.control_id, "A1");
        assert_eq!(r.scores.values(), &[1, 2, 3, 4, 5, 6, 10]);
        assert_eq!(
            r.timestamp.unwrap().format(TIMESTAMP_FORMAT).to_string(),
            "2025-01-01 10:00:00"
        );
    }

    #[test]
    fn column_names_are_normalized() {
        let row = raw(&[
            (" timestamp", "2025-01-01 10:00:00"),
            ("CODE ", "X"),
            ("q1", "5"),
            ("q2", "5"),
            ("q3", "5"),
            ("q4", "5"),
            ("q5", "5"),
            ("q6", "5"),
            ("q7", "5"),
        ]);
        let r = parse_row(&row, RowLayout::WithoutControlId, 2).unwrap();
        assert_eq!(r.code, "X");
        assert_eq!(r.control_id, "");
    }

    #[test]
    fn missing_column_fails_fast() {
        let mut row = full_row("ABC");
        row.remove("Q4");
        match parse_row(&row, RowLayout::WithControlId, 7) {
            Err(HealthError::MissingColumn { column, lineno }) => {
                assert_eq!(column, "q4");
                assert_eq!(lineno, 7);
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn control_id_column_is_required_by_the_layout() {
        let mut row = full_row("ABC");
        row.remove("Control_ID");
        assert!(parse_row(&row, RowLayout::WithControlId, 2).is_err());
        assert!(parse_row(&row, RowLayout::WithoutControlId, 2).is_ok());
    }

    #[test]
    fn bad_timestamp_is_kept_as_unknown() {
        let mut row = full_row("ABC");
        row.insert("Timestamp".to_string(), "yesterday".to_string());
        let r = parse_row(&row, RowLayout::WithControlId, 2).unwrap();
        assert_eq!(r.timestamp, None);
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut row = full_row("ABC");
        row.insert("Q2".to_string(), "11".to_string());
        assert!(matches!(
            parse_row(&row, RowLayout::WithControlId, 2),
            Err(HealthError::InvalidCell { .. })
        ));
        row.insert("Q2".to_string(), "2.5".to_string());
        assert!(parse_row(&row, RowLayout::WithControlId, 2).is_err());
    }

    #[test]
    fn row_layouts() {
        let r = parse_row(&full_row("ABC"), RowLayout::WithControlId, 2).unwrap();
        assert_eq!(
            to_row(&r, RowLayout::WithControlId),
            vec!["2025-01-01 10:00:00", "ABC", "A1", "1", "2", "3", "4", "5", "6", "10"]
        );
        assert_eq!(
            to_row(&r, RowLayout::WithoutControlId),
            vec!["2025-01-01 10:00:00", "ABC", "1", "2", "3", "4", "5", "6", "10"]
        );
        assert_eq!(RowLayout::WithoutControlId.header().len(), 9);
    }
}
