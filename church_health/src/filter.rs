//! Selection of the records handed to the aggregator.
//!
//! All the filters work on a full read of the table and keep the storage
//! order of the records.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::debug;

use crate::config::*;

/// Records whose code is exactly `code` (both sides trimmed, case-sensitive).
pub fn by_code(records: &[ResponseRecord], code: &str) -> Vec<ResponseRecord> {
    let code = code.trim();
    records
        .iter()
        .filter(|r| r.code.trim() == code)
        .cloned()
        .collect()
}

/// Records for `code` submitted between the start of `start` and the end of
/// `end`, both days included.
///
/// Records without a readable timestamp never match.
pub fn by_code_and_dates(
    records: &[ResponseRecord],
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ResponseRecord>, HealthError> {
    if start > end {
        return Err(HealthError::InvalidDateRange { start, end });
    }
    let (lower, upper) = match (start.and_hms_opt(0, 0, 0), end.and_hms_opt(23, 59, 59)) {
        (Some(lower), Some(upper)) => (lower, upper),
        _ => return Err(HealthError::InvalidDateRange { start, end }),
    };
    let res: Vec<ResponseRecord> = by_code(records, code)
        .into_iter()
        .filter(|r| match r.timestamp {
            Some(t) => lower <= t && t <= upper,
            None => false,
        })
        .collect();
    debug!(
        "by_code_and_dates: code {:?} [{} - {}]: {} records",
        code,
        lower,
        upper,
        res.len()
    );
    Ok(res)
}

/// A list of `(code, control_id)` pairs supplied from outside, typically the
/// list of the official respondents of a church.
///
/// Pairs are compared without regard to case, unlike the duplicate check done
/// when submitting.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct AllowList {
    pairs: HashSet<(String, String)>,
    len: usize,
}

impl AllowList {
    pub fn new() -> AllowList {
        AllowList::default()
    }

    fn key(code: &str, control_id: &str) -> (String, String) {
        (code.trim().to_lowercase(), control_id.trim().to_lowercase())
    }

    pub fn insert(&mut self, code: &str, control_id: &str) {
        self.len += 1;
        self.pairs.insert(AllowList::key(code, control_id));
    }

    pub fn contains(&self, code: &str, control_id: &str) -> bool {
        self.pairs.contains(&AllowList::key(code, control_id))
    }

    /// Number of entries as loaded, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for AllowList {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut res = AllowList::new();
        for (code, control_id) in iter {
            res.insert(code, control_id);
        }
        res
    }
}

/// Records whose `(code, control_id)` pair is in the allow-list. Every stored
/// record appears at most once.
pub fn by_allow_list(records: &[ResponseRecord], allow_list: &AllowList) -> Vec<ResponseRecord> {
    records
        .iter()
        .filter(|r| allow_list.contains(&r.code, &r.control_id))
        .cloned()
        .collect()
}

/// Number of records per code, in order of first appearance.
pub fn code_counts(records: &[ResponseRecord]) -> Vec<(String, usize)> {
    let mut res: Vec<(String, usize)> = Vec::new();
    for r in records.iter() {
        match res.iter_mut().find(|(code, _)| *code == r.code) {
            Some((_, count)) => *count += 1,
            None => res.push((r.code.clone(), 1)),
        }
    }
    res
}
