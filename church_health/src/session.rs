use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use log::{debug, info};
use snafu::ResultExt;

use crate::clock::Clock;
use crate::config::*;
use crate::filter::{self, AllowList};
use crate::row::parse_rows;
use crate::table::RemoteTable;
use crate::{summarize, Summary};

#[derive(Debug, Clone)]
struct CachedRead {
    fetched_at: DateTime<FixedOffset>,
    records: Vec<ResponseRecord>,
}

/// The state of one user session against the remote table.
///
/// A session owns everything that outlives a single request: the per-code
/// time of the last successful submission and the last full read of the
/// table. Submissions go through [`Session::submit`].
pub struct Session<T: RemoteTable, C: Clock> {
    pub(crate) table: T,
    pub(crate) clock: C,
    pub(crate) rules: GuardRules,
    pub(crate) last_submission: HashMap<String, DateTime<FixedOffset>>,
    cache: Option<CachedRead>,
}

impl<T: RemoteTable, C: Clock> Session<T, C> {
    pub fn new(table: T, clock: C, rules: GuardRules) -> Session<T, C> {
        info!("Session::new: rules: {:?}", rules);
        Session {
            table,
            clock,
            rules,
            last_submission: HashMap::new(),
            cache: None,
        }
    }

    pub fn rules(&self) -> &GuardRules {
        &self.rules
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut T {
        &mut self.table
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// All the stored records. A previous read is reused while it is fresh.
    pub fn records(&mut self) -> Result<Vec<ResponseRecord>, HealthError> {
        let now = self.clock.now();
        if let Some(cached) = &self.cache {
            let age = (now - cached.fetched_at).to_std();
            match age {
                Ok(age) if age < self.rules.cache_ttl => {
                    debug!(
                        "Session::records: serving {} cached records",
                        cached.records.len()
                    );
                    return Ok(cached.records.clone());
                }
                _ => {}
            }
        }
        self.fetch()
    }

    /// Reads the whole table, bypassing and then refreshing the cache.
    ///
    /// Read failures are not retried.
    pub fn fetch(&mut self) -> Result<Vec<ResponseRecord>, HealthError> {
        let rows = self.table.read_all().context(FetchSnafu {})?;
        let records = parse_rows(&rows, self.rules.layout)?;
        debug!("Session::fetch: read {} records", records.len());
        self.cache = Some(CachedRead {
            fetched_at: self.clock.now(),
            records: records.clone(),
        });
        Ok(records)
    }

    /// Drops the cached read. The next read goes to the table.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn results_for_code(&mut self, code: &str) -> Result<Summary, HealthError> {
        let records = self.records()?;
        summarize(&filter::by_code(&records, code))
    }

    pub fn results_for_dates(
        &mut self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Summary, HealthError> {
        let records = self.records()?;
        summarize(&filter::by_code_and_dates(&records, code, start, end)?)
    }

    pub fn results_for_allow_list(
        &mut self,
        allow_list: &AllowList,
    ) -> Result<Summary, HealthError> {
        let records = self.records()?;
        summarize(&filter::by_allow_list(&records, allow_list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::table::MemoryTable;
    use chrono::NaiveDateTime;
    use std::time::Duration;

    fn clock() -> ManualClock {
        let start =
            NaiveDateTime::parse_from_str("2025-01-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        ManualClock::at(start, FixedOffset::east_opt(8 * 3600).unwrap()).unwrap()
    }

    fn table_with(rows: &[&[&str]]) -> MemoryTable {
        let mut table = MemoryTable::new(RowLayout::WithControlId.header());
        for row in rows.iter() {
            let row: Vec<String> = row.iter().map(|s| s.to_string()).collect();
            table.append(&row).unwrap();
        }
        table
    }

    #[test]
    fn cached_read_is_reused_while_fresh() {
        let table = table_with(&[&[
            "2025-01-01 09:00:00",
            "ABC",
            "",
            "5",
            "5",
            "5",
            "5",
            "5",
            "5",
            "5",
        ]]);
        let mut session = Session::new(table, clock(), GuardRules::DEFAULT_RULES);
        assert_eq!(session.records().unwrap().len(), 1);
        session.clock().advance(Duration::from_secs(10));
        assert_eq!(session.records().unwrap().len(), 1);
        assert_eq!(session.table().read_calls(), 1);
        session.clock().advance(Duration::from_secs(5));
        session.records().unwrap();
        assert_eq!(session.table().read_calls(), 2);
        session.invalidate();
        session.records().unwrap();
        assert_eq!(session.table().read_calls(), 3);
    }

    #[test]
    fn read_failure_is_reported() {
        let mut table = table_with(&[]);
        table.fail_next_reads(1);
        let mut session = Session::new(table, clock(), GuardRules::DEFAULT_RULES);
        let err = session.results_for_code("ABC").unwrap_err();
        assert!(matches!(err, HealthError::Fetch { .. }));
        assert!(err.to_string().starts_with("Could not fetch existing responses"));
        // Not retried.
        assert_eq!(session.table().read_calls(), 1);
    }

    #[test]
    fn unknown_code_has_no_data() {
        let table = table_with(&[&[
            "2025-01-01 09:00:00",
            "ABC",
            "",
            "5",
            "5",
            "5",
            "5",
            "5",
            "5",
            "5",
        ]]);
        let mut session = Session::new(table, clock(), GuardRules::DEFAULT_RULES);
        assert!(session.results_for_code("XYZ").unwrap_err().is_no_data());
        let s = session.results_for_code("ABC").unwrap();
        assert_eq!(s.aggregate.respondents, 1);
        assert_eq!(s.code_counts, vec![("ABC".to_string(), 1)]);
    }

    #[test]
    fn date_and_allow_list_results() {
        let table = table_with(&[
            &["2025-01-01 10:00:00", "X", "A1", "9", "9", "9", "9", "9", "9", "9"],
            &["2025-02-01 10:00:00", "X", "A2", "2", "2", "2", "2", "2", "2", "2"],
        ]);
        let mut session = Session::new(table, clock(), GuardRules::DEFAULT_RULES);
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let s = session.results_for_dates("X", start, end).unwrap();
        assert_eq!(s.aggregate.respondents, 1);
        assert_eq!(s.classification.category, HealthCategory::Thriving);

        let allow: AllowList = vec![("x", "a2")].into_iter().collect();
        let s = session.results_for_allow_list(&allow).unwrap();
        assert_eq!(s.aggregate.overall_mean, 2.0);
    }
}
