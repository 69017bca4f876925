mod config;
use log::{debug, info};

pub mod builder;
pub mod clock;
pub mod filter;
mod guard;
pub mod manual;
pub mod row;
mod session;
pub mod table;

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::*;
pub use crate::filter::AllowList;
pub use crate::session::Session;
pub use crate::table::{MemoryTable, RawRow, RemoteTable, TableFailure};

/// The outcome of a tabulation, ready to be displayed.
#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    pub aggregate: Aggregate,
    pub classification: Classification,
    /// Respondents per code, in order of first appearance. Empty when the
    /// scores were supplied directly.
    pub code_counts: Vec<(String, usize)>,
}

/// Computes the per-question means and the overall mean of the records.
///
/// Returns [`HealthError::NoData`] if there are no records.
pub fn aggregate(records: &[ResponseRecord]) -> Result<Aggregate, HealthError> {
    let scores: Vec<Scores> = records.iter().map(|r| r.scores).collect();
    aggregate_scores(&scores)
}

/// Same as [`aggregate`], for scores that do not come from the table.
pub fn aggregate_scores(coll: &[Scores]) -> Result<Aggregate, HealthError> {
    if coll.is_empty() {
        return Err(HealthError::NoData {});
    }
    let mut totals = [0u64; NUM_QUESTIONS];
    for scores in coll.iter() {
        for (total, value) in totals.iter_mut().zip(scores.values().iter()) {
            *total += *value as u64;
        }
    }
    let n = coll.len() as f64;
    let mut per_question_mean = [0f64; NUM_QUESTIONS];
    for (mean, total) in per_question_mean.iter_mut().zip(totals.iter()) {
        *mean = *total as f64 / n;
    }
    // Mean of the means, not of the raw values. Both agree here since every
    // respondent answers every question.
    let overall_mean = per_question_mean.iter().sum::<f64>() / NUM_QUESTIONS as f64;
    debug!(
        "aggregate_scores: {} respondents, means {:?}, overall {}",
        coll.len(),
        per_question_mean,
        overall_mean
    );
    Ok(Aggregate {
        respondents: coll.len(),
        per_question_mean,
        overall_mean,
    })
}

/// Maps an overall mean to its health category.
///
/// The thresholds are inclusive lower bounds, checked from the healthiest
/// category down. Every value maps to a category, including values outside of
/// the score range and NaN (which lands in the last category).
pub fn classify(overall_mean: f64) -> Classification {
    let category = HealthCategory::ALL
        .iter()
        .find(|c| match c.lower_bound() {
            Some(bound) => overall_mean >= bound,
            None => true,
        })
        .cloned()
        .unwrap_or(HealthCategory::Critical);
    Classification {
        category,
        narrative: category.narrative(),
    }
}

/// Aggregates and classifies a set of records.
pub fn summarize(records: &[ResponseRecord]) -> Result<Summary, HealthError> {
    let aggregate = aggregate(records)?;
    let classification = classify(aggregate.overall_mean);
    info!(
        "summarize: {} respondents, overall {:.2}: {}",
        aggregate.respondents,
        aggregate.overall_mean,
        classification.category.label()
    );
    Ok(Summary {
        aggregate,
        classification,
        code_counts: filter::code_counts(records),
    })
}

/// Aggregates and classifies scores supplied directly by the caller.
pub fn summarize_scores(coll: &[Scores]) -> Result<Summary, HealthError> {
    let aggregate = aggregate_scores(coll)?;
    let classification = classify(aggregate.overall_mean);
    info!(
        "summarize_scores: {} respondents, overall {:.2}: {}",
        aggregate.respondents,
        aggregate.overall_mean,
        classification.category.label()
    );
    Ok(Summary {
        aggregate,
        classification,
        code_counts: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[i64]) -> Scores {
        Scores::new(values).unwrap()
    }

    #[test]
    fn mean_of_two_respondents() {
        let coll = vec![scores(&[5; 7]), scores(&[2; 7])];
        let agg = aggregate_scores(&coll).unwrap();
        assert_eq!(agg.respondents, 2);
        assert_eq!(agg.per_question_mean, [3.5; 7]);
        assert_eq!(agg.overall_mean, 3.5);
        assert_eq!(classify(agg.overall_mean).category, HealthCategory::Critical);
    }

    #[test]
    fn overall_is_mean_of_question_means() {
        let coll = vec![
            scores(&[1, 2, 3, 4, 5, 6, 7]),
            scores(&[3, 4, 5, 6, 7, 8, 9]),
        ];
        let agg = aggregate_scores(&coll).unwrap();
        assert_eq!(agg.per_question_mean, [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert!((agg.overall_mean - 5.0).abs() < 1e-12);
    }

    #[test]
    fn overall_stays_in_score_range() {
        let coll = vec![
            scores(&[1, 1, 1, 1, 1, 1, 1]),
            scores(&[10, 10, 10, 10, 10, 10, 10]),
            scores(&[1, 10, 1, 10, 1, 10, 1]),
        ];
        for n in 1..=coll.len() {
            let agg = aggregate_scores(&coll[..n]).unwrap();
            assert!(agg.overall_mean >= 1.0 && agg.overall_mean <= 10.0);
        }
    }

    #[test]
    fn empty_input_is_no_data() {
        assert!(aggregate_scores(&[]).unwrap_err().is_no_data());
        assert!(aggregate(&[]).unwrap_err().is_no_data());
        assert!(summarize(&[]).unwrap_err().is_no_data());
    }

    #[test]
    fn classification_boundaries() {
        let cases = [
            (10.0, HealthCategory::Thriving),
            (8.5, HealthCategory::Thriving),
            (8.4999, HealthCategory::Stable),
            (7.5, HealthCategory::Stable),
            (7.4999, HealthCategory::Moderate),
            (6.5, HealthCategory::Moderate),
            (6.4999, HealthCategory::Significant),
            (5.5, HealthCategory::Significant),
            (5.4999, HealthCategory::Critical),
            (1.0, HealthCategory::Critical),
        ];
        for (x, expected) in cases.iter() {
            assert_eq!(classify(*x).category, *expected, "for {}", x);
        }
    }

    #[test]
    fn classification_is_total() {
        assert_eq!(classify(42.0).category, HealthCategory::Thriving);
        assert_eq!(classify(-3.0).category, HealthCategory::Critical);
        assert_eq!(classify(f64::NAN).category, HealthCategory::Critical);
        assert_eq!(
            classify(9.0).narrative,
            "Consistently reflects ideal communal characteristics"
        );
        assert_eq!(classify(7.0).category.label(), "Moderate Concerns");
    }

    #[test]
    fn scores_are_validated() {
        assert!(matches!(
            Scores::new(&[1, 2, 3]),
            Err(HealthError::WrongScoreCount { count: 3 })
        ));
        assert!(matches!(
            Scores::new(&[1, 2, 3, 0, 5, 6, 7]),
            Err(HealthError::InvalidScore {
                question: 4,
                value: 0
            })
        ));
        assert!(Scores::new(&[1, 2, 3, 4, 5, 6, 11]).is_err());
    }
}
