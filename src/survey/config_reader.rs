use crate::survey::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// The sheet used when neither the configuration nor the command line name one.
pub const DEFAULT_SHEET_PATH: &str = "responses.csv";
/// Asia/Manila, which has no daylight saving time.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    pub layout: Option<String>,
    #[serde(rename = "utcOffsetHours")]
    pub utc_offset_hours: Option<i32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(rename = "cooldownSeconds")]
    pub cooldown_seconds: Option<u64>,
    #[serde(rename = "appendAttempts")]
    pub append_attempts: Option<u32>,
    #[serde(rename = "retryDelaySeconds")]
    pub retry_delay_seconds: Option<u64>,
    #[serde(rename = "cacheSeconds")]
    pub cache_seconds: Option<u64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// The validated configuration.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub sheet_path: PathBuf,
    pub offset: FixedOffset,
    pub rules: GuardRules,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn validate_layout(layout: &Option<String>) -> SurveyResult<RowLayout> {
    match layout.as_deref() {
        None | Some("withControlId") => Ok(RowLayout::WithControlId),
        Some("withoutControlId") => Ok(RowLayout::WithoutControlId),
        Some(x) => whatever!(
            "Unknown sheet layout {:?}: expected withControlId or withoutControlId",
            x
        ),
    }
}

pub fn validate_rules(config: &SurveyConfig) -> SurveyResult<GuardRules> {
    let defaults = GuardRules::DEFAULT_RULES;
    let rc = &config.rules;
    let res = GuardRules {
        cooldown: rc
            .cooldown_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.cooldown),
        append_attempts: match rc.append_attempts {
            None => defaults.append_attempts,
            Some(x) if x >= 1 => x,
            Some(x) => whatever!("appendAttempts must be at least 1, but it was {}", x),
        },
        retry_delay: rc
            .retry_delay_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry_delay),
        cache_ttl: rc
            .cache_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl),
        layout: validate_layout(&config.sheet.layout)?,
    };
    Ok(res)
}

/// Builds the settings from an optional configuration file and an optional
/// sheet path given on the command line.
///
/// A relative `filePath` in the configuration is resolved against the
/// directory of the configuration file.
pub fn load_settings(config_path: Option<&str>, sheet_path: Option<&str>) -> SurveyResult<Settings> {
    let (config, root) = match config_path {
        Some(p) => {
            let root: PathBuf = Path::new(p)
                .parent()
                .map(|d| d.to_path_buf())
                .unwrap_or_default();
            (read_config(p)?, root)
        }
        None => (SurveyConfig::default(), PathBuf::new()),
    };

    let rules = validate_rules(&config)?;

    let hours = config
        .sheet
        .utc_offset_hours
        .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
    if !(-23..=23).contains(&hours) {
        whatever!("utcOffsetHours out of range: {}", hours);
    }
    let offset = match FixedOffset::east_opt(hours * 3600) {
        Some(x) => x,
        None => whatever!("utcOffsetHours out of range: {}", hours),
    };

    let sheet_path: PathBuf = match (sheet_path, &config.sheet.file_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => root.join(p),
        (None, None) => PathBuf::from(DEFAULT_SHEET_PATH),
    };

    Ok(Settings {
        sheet_path,
        offset,
        rules,
    })
}
