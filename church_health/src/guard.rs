//! Admission of new submissions.
//!
//! Two checks run before anything is written: the control id must not have
//! been used already for the same code, and the code must not be in its
//! cooldown window. The duplicate check reads the table and then appends, with
//! no transaction in between: two processes submitting the same pair at the
//! same time can both pass it.

use std::time::Duration;

use log::{debug, info, warn};

use crate::clock::Clock;
use crate::config::*;
use crate::row::to_row;
use crate::session::Session;
use crate::table::RemoteTable;

impl<T: RemoteTable, C: Clock> Session<T, C> {
    /// Records one response.
    ///
    /// `code` and `control_id` are trimmed. An empty control id is an
    /// untracked submission and skips the duplicate check. On success, the
    /// cooldown of the code starts and the read cache is dropped so that the
    /// new record shows up in the next tabulation.
    pub fn submit(
        &mut self,
        code: &str,
        control_id: &str,
        scores: Scores,
    ) -> Result<ResponseRecord, HealthError> {
        let code = code.trim();
        let control_id = control_id.trim();
        if code.is_empty() {
            return Err(HealthError::EmptyCode {});
        }
        if !control_id.is_empty() && self.rules.layout == RowLayout::WithoutControlId {
            return Err(HealthError::ControlIdNotRecorded {});
        }

        if !control_id.is_empty() {
            self.check_unique(code, control_id)?;
        }

        if let Some(remaining) = self.cooldown_remaining(code) {
            info!(
                "submit: code {:?} in cooldown for {}s",
                code, remaining.remaining_secs
            );
            return Err(HealthError::CooldownActive {
                code: code.to_string(),
                remaining,
            });
        }

        let record = ResponseRecord {
            timestamp: Some(self.clock.now().naive_local()),
            code: code.to_string(),
            control_id: control_id.to_string(),
            scores,
        };
        let row = to_row(&record, self.rules.layout);
        self.append_with_retry(&row)?;

        self.invalidate();
        let now = self.clock.now();
        self.last_submission.insert(code.to_string(), now);
        info!(
            "submit: recorded response for code {:?} control id {:?}",
            code, control_id
        );
        Ok(record)
    }

    /// The time left before `code` accepts a new submission, if any.
    pub fn cooldown_remaining(&self, code: &str) -> Option<Cooldown> {
        let last = self.last_submission.get(code.trim())?;
        // A clock that went backwards counts as no time elapsed.
        let elapsed = (self.clock.now() - *last)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if elapsed >= self.rules.cooldown {
            return None;
        }
        let left = self.rules.cooldown - elapsed;
        let remaining_secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
        Some(Cooldown { remaining_secs })
    }

    fn check_unique(&mut self, code: &str, control_id: &str) -> Result<(), HealthError> {
        let records = self.fetch()?;
        let duplicate = records
            .iter()
            .any(|r| r.code == code && r.control_id == control_id);
        if duplicate {
            warn!(
                "check_unique: control id {:?} already used for code {:?}",
                control_id, code
            );
            return Err(HealthError::DuplicateControlId {
                control_id: control_id.to_string(),
                code: code.to_string(),
            });
        }
        Ok(())
    }

    fn append_with_retry(&mut self, row: &[String]) -> Result<(), HealthError> {
        let attempts = self.rules.append_attempts.max(1);
        let mut attempt: u32 = 1;
        loop {
            match self.table.append(row) {
                Ok(()) => {
                    debug!("append_with_retry: appended on attempt {}", attempt);
                    return Ok(());
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        "append_with_retry: attempt {}/{} failed: {}",
                        attempt, attempts, e
                    );
                    self.clock.sleep(self.rules.retry_delay);
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        "append_with_retry: attempt {}/{} failed, giving up: {}",
                        attempt, attempts, e
                    );
                    return Err(HealthError::Append {
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }
}
