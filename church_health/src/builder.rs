pub use crate::config::*;
use crate::{summarize_scores, Summary};

/// A builder for adding score sets that do not come from the table, for
/// example the rows of an uploaded file.
///
/// No duplicate or cooldown rule applies to these scores.
///
/// ```
/// pub use church_health::builder::Builder;
/// # use church_health::HealthError;
///
/// let mut builder = Builder::new();
///
/// builder.add_response(&[5, 5, 5, 5, 5, 5, 5])?;
/// builder.add_response(&[2, 2, 2, 2, 2, 2, 2])?;
///
/// let summary = builder.summarize()?;
/// assert_eq!(summary.aggregate.overall_mean, 3.5);
///
/// # Ok::<(), HealthError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _responses: Vec<Scores>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _responses: Vec::new(),
        }
    }

    /// Adds the seven answers of one respondent.
    ///
    /// The answers are validated: there must be exactly seven of them, each
    /// between 1 and 10.
    pub fn add_response(&mut self, values: &[i64]) -> Result<(), HealthError> {
        let scores = Scores::new(values)?;
        self.add_scores(&scores)
    }

    pub fn add_scores(&mut self, scores: &Scores) -> Result<(), HealthError> {
        self._responses.push(*scores);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self._responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self._responses.is_empty()
    }

    /// Aggregates and classifies everything added so far.
    pub fn summarize(&self) -> Result<Summary, HealthError> {
        summarize_scores(&self._responses)
    }
}
