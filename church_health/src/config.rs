// ********* Input data structures ***********

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use snafu::Snafu;

use crate::table::TableFailure;

/// The number of fixed questions in the checklist.
pub const NUM_QUESTIONS: usize = 7;
pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

/// The reference rings drawn on every chart: the lower bounds of the
/// "Significant Issues" and "Thriving Health" categories.
pub const REFERENCE_RINGS: [f64; 2] = [5.5, 8.5];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Question {
    pub label: &'static str,
    pub description: &'static str,
}

pub const QUESTIONS: [Question; NUM_QUESTIONS] = [
    Question {
        label: "HUMILITY",
        description: "People regard each other better than themselves; there is genuine respect for each other's place in the community.",
    },
    Question {
        label: "ENDURANCE",
        description: "The community exemplifies faithfulness, sacrifice and endurance in the faith despite persecution, poverty or difficulty.",
    },
    Question {
        label: "AUTHENTICITY",
        description: "People are genuinely kind, hospitable, gentle and merciful, and go the extra mile to help someone in need.",
    },
    Question {
        label: "LOVE",
        description: "Members truly love each other; they linger for fellowship and prayer and are excited to see each other.",
    },
    Question {
        label: "TRUSTWORTHINESS",
        description: "The congregation fully trusts the leadership, and the leaders live, lead and serve consistently with their calling.",
    },
    Question {
        label: "HARMONY",
        description: "There is forgiveness, peace and harmony; leaders and members are quick to apologize when necessary.",
    },
    Question {
        label: "YEARNING",
        description: "People are eager to learn from the Scriptures, study on their own and grow in the faith.",
    },
];

/// The seven answers of one respondent.
///
/// A `Scores` value always holds exactly [`NUM_QUESTIONS`] values, each in
/// `[MIN_SCORE, MAX_SCORE]`. The only way to build one is through
/// [`Scores::new`], which enforces both.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Scores([u8; NUM_QUESTIONS]);

impl Scores {
    pub fn new(values: &[i64]) -> Result<Scores, HealthError> {
        if values.len() != NUM_QUESTIONS {
            return Err(HealthError::WrongScoreCount {
                count: values.len(),
            });
        }
        let mut res = [0u8; NUM_QUESTIONS];
        for (idx, value) in values.iter().enumerate() {
            if !(MIN_SCORE..=MAX_SCORE).contains(value) {
                return Err(HealthError::InvalidScore {
                    question: idx + 1,
                    value: *value,
                });
            }
            res[idx] = *value as u8;
        }
        Ok(Scores(res))
    }

    pub fn values(&self) -> &[u8; NUM_QUESTIONS] {
        &self.0
    }
}

/// One stored submission.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseRecord {
    /// Wall-clock time in the survey time zone. `None` when the stored cell
    /// could not be read as a date.
    pub timestamp: Option<NaiveDateTime>,
    pub code: String,
    /// Empty for untracked submissions.
    pub control_id: String,
    pub scores: Scores,
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct Aggregate {
    pub respondents: usize,
    pub per_question_mean: [f64; NUM_QUESTIONS],
    /// Mean of the per-question means.
    pub overall_mean: f64,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum HealthCategory {
    Thriving,
    Stable,
    Moderate,
    Significant,
    Critical,
}

impl HealthCategory {
    /// All the categories, from the healthiest down.
    pub const ALL: [HealthCategory; 5] = [
        HealthCategory::Thriving,
        HealthCategory::Stable,
        HealthCategory::Moderate,
        HealthCategory::Significant,
        HealthCategory::Critical,
    ];

    /// The inclusive lower bound of the category. The last category has none.
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            HealthCategory::Thriving => Some(8.5),
            HealthCategory::Stable => Some(7.5),
            HealthCategory::Moderate => Some(6.5),
            HealthCategory::Significant => Some(5.5),
            HealthCategory::Critical => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthCategory::Thriving => "Thriving Health",
            HealthCategory::Stable => "Stable Health",
            HealthCategory::Moderate => "Moderate Concerns",
            HealthCategory::Significant => "Significant Issues",
            HealthCategory::Critical => "Critical Condition",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            HealthCategory::Thriving => "Consistently reflects ideal communal characteristics",
            HealthCategory::Stable => "Healthy foundation with clear growth opportunities",
            HealthCategory::Moderate => "Several vulnerabilities requiring focused attention",
            HealthCategory::Significant => {
                "Multiple areas need urgent attention; sustainability concerns"
            }
            HealthCategory::Critical => {
                "Comprehensive renewal needed; reflects fundamental health problems"
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Classification {
    pub category: HealthCategory,
    pub narrative: &'static str,
}

/// Time left before a code accepts a new submission.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Cooldown {
    pub remaining_secs: u64,
}

impl Cooldown {
    pub fn minutes(&self) -> u64 {
        self.remaining_secs / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining_secs % 60
    }
}

/// Errors that prevent a submission or a tabulation from completing.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HealthError {
    #[snafu(display("Please enter a Church Code before continuing"))]
    EmptyCode {},

    #[snafu(display("Expected {} scores, but got {count}", NUM_QUESTIONS))]
    WrongScoreCount { count: usize },

    #[snafu(display(
        "Score for Q{question} must be between {} and {}, but it was {value}",
        MIN_SCORE,
        MAX_SCORE
    ))]
    InvalidScore { question: usize, value: i64 },

    #[snafu(display("This sheet does not record Control IDs, leave the Control ID empty"))]
    ControlIdNotRecorded {},

    #[snafu(display(
        "Control ID '{control_id}' has already been used for Church Code '{code}'"
    ))]
    DuplicateControlId { control_id: String, code: String },

    #[snafu(display(
        "Please wait {} minute(s) and {} second(s) before submitting again for Church Code '{code}'",
        remaining.minutes(),
        remaining.seconds()
    ))]
    CooldownActive { code: String, remaining: Cooldown },

    #[snafu(display("Could not fetch existing responses: {source}"))]
    Fetch { source: TableFailure },

    #[snafu(display("Could not submit response after {attempts} attempt(s): {source}"))]
    Append { attempts: u32, source: TableFailure },

    #[snafu(display("Row {lineno}: missing required column '{column}'"))]
    MissingColumn { column: String, lineno: usize },

    #[snafu(display("Row {lineno}: could not understand '{value}' in column '{column}'"))]
    InvalidCell {
        column: String,
        value: String,
        lineno: usize,
    },

    #[snafu(display("Start date {start} is after end date {end}"))]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[snafu(display("No responses yet"))]
    NoData {},
}

impl HealthError {
    /// No-data is reported to users as an empty result, not as a failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, HealthError::NoData {})
    }
}

// ********* Configuration **********

/// The positional layout of an appended row.
///
/// This is a fixed property of a sheet: it is configured, never guessed from
/// the contents of the sheet.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RowLayout {
    /// `[timestamp, code, control_id, q1..q7]`
    WithControlId,
    /// `[timestamp, code, q1..q7]`
    WithoutControlId,
}

impl RowLayout {
    pub fn header(&self) -> Vec<String> {
        let mut res: Vec<String> = vec!["Timestamp".to_string(), "Code".to_string()];
        if *self == RowLayout::WithControlId {
            res.push("Control_ID".to_string());
        }
        for idx in 1..=NUM_QUESTIONS {
            res.push(format!("Q{}", idx));
        }
        res
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GuardRules {
    /// Minimum time between two successful submissions for the same code.
    pub cooldown: Duration,
    /// Total number of append attempts, including the first one.
    pub append_attempts: u32,
    pub retry_delay: Duration,
    /// How long a full read of the table may be reused.
    pub cache_ttl: Duration,
    pub layout: RowLayout,
}

impl GuardRules {
    pub const DEFAULT_RULES: GuardRules = GuardRules {
        cooldown: Duration::from_secs(120),
        append_attempts: 3,
        retry_delay: Duration::from_secs(2),
        cache_ttl: Duration::from_secs(15),
        layout: RowLayout::WithControlId,
    };
}
