use log::{debug, info, warn};

use church_health::builder::Builder;
use church_health::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};

use chrono::NaiveDate;
use clap::Parser;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command, SessionLine};
use crate::survey::config_reader::*;
use crate::survey::sheet::CsvSheet;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod sheet;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("File {path} contains no header row"))]
    EmptyFile { path: String },
    #[snafu(display("Unsupported file {path}: expected a .csv, .xls or .xlsx file"))]
    UnsupportedFile { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Row {lineno}: could not read line"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Row {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },

    #[snafu(display(
        "The allow-list needs a 'Code' (or 'Church_Code') column and a 'Control_ID' column, found {found:?}"
    ))]
    InvalidAllowListHeader { found: Vec<String> },
    #[snafu(display("The score file needs exactly the columns Q1 to Q7, found {found:?}"))]
    InvalidScoresHeader { found: Vec<String> },
    #[snafu(display("Row {lineno}: could not understand '{content}' in column {column}"))]
    InvalidScoreCell {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Row {lineno}: {source}"))]
    InvalidUploadRow { lineno: usize, source: HealthError },
    #[snafu(display("Could not read date {value:?}, expected YYYY-MM-DD"))]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the output"))]
    Writing { source: std::io::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not split the line into words: {source}"))]
    SplittingLine { source: shell_words::ParseError },
    #[snafu(display("Error reading the input"))]
    ReadingInput { source: std::io::Error },

    #[snafu(display("{source}"))]
    Health { source: HealthError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Where the responses of a report come from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportSource {
    Code(String),
    Dates {
        code: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    AllowList { file: String, entries: usize },
    Upload { file: String },
}

impl ReportSource {
    fn title(&self) -> String {
        match self {
            ReportSource::Code(code) => format!("Results for Church Code '{}'", code),
            ReportSource::Dates { code, from, to } => format!(
                "Results for Church Code '{}' from {} to {}",
                code, from, to
            ),
            ReportSource::AllowList { file, entries } => {
                format!("Results for the {} entries of {}", entries, file)
            }
            ReportSource::Upload { file } => format!("Results for the scores of {}", file),
        }
    }

    fn to_json(&self) -> JSValue {
        match self {
            ReportSource::Code(code) => json!({"source": "sheet", "code": code}),
            ReportSource::Dates { code, from, to } => json!({
                "source": "sheet",
                "code": code,
                "from": from.to_string(),
                "to": to.to_string()
            }),
            ReportSource::AllowList { file, entries } => json!({
                "source": "allowList",
                "file": file,
                "entries": entries
            }),
            ReportSource::Upload { file } => json!({"source": "upload", "file": file}),
        }
    }
}

/// What to do with a summary once it is printed.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OutputOptions {
    pub out: Option<String>,
    pub reference: Option<String>,
}

// ********* Rendering ***********

pub fn questionnaire_text() -> String {
    let mut res = String::new();
    res.push_str("H.E.A.L.T.H.Y. church checklist\n");
    res.push_str(&format!(
        "Rate each statement from {} (strongly disagree) to {} (strongly agree).\n\n",
        MIN_SCORE, MAX_SCORE
    ));
    for (idx, q) in QUESTIONS.iter().enumerate() {
        res.push_str(&format!("Q{} {}: {}\n", idx + 1, q.label, q.description));
    }
    res.push_str("\nScoring guide (overall score):\n");
    let mut last_bound: Option<f64> = None;
    for category in HealthCategory::ALL.iter() {
        let range = match (category.lower_bound(), last_bound) {
            (Some(bound), _) => format!("{:.1} and above", bound),
            (None, Some(bound)) => format!("below {:.1}", bound),
            (None, None) => String::new(),
        };
        last_bound = category.lower_bound().or(last_bound);
        res.push_str(&format!(
            "  {:<14} {}: {}\n",
            range,
            category.label(),
            category.narrative()
        ));
    }
    res
}

fn code_counts_text(code_counts: &[(String, usize)]) -> String {
    code_counts
        .iter()
        .map(|(code, count)| format!("{} ({})", code, count))
        .collect::<Vec<String>>()
        .join(", ")
}

pub fn summary_text(source: &ReportSource, summary: &Summary) -> String {
    let agg = &summary.aggregate;
    let mut res = String::new();
    res.push_str(&format!("{}\n", source.title()));
    res.push_str(&format!("Respondents: {}\n", agg.respondents));
    for (idx, (q, mean)) in QUESTIONS.iter().zip(agg.per_question_mean.iter()).enumerate() {
        res.push_str(&format!("  Q{} {:<16} {:.2}\n", idx + 1, q.label, mean));
    }
    res.push_str(&format!("Overall: {:.2}\n", agg.overall_mean));
    res.push_str(&format!(
        "Category: {}\n",
        summary.classification.category.label()
    ));
    res.push_str(&format!("{}\n", summary.classification.narrative));
    if matches!(source, ReportSource::AllowList { .. }) && !summary.code_counts.is_empty() {
        res.push_str(&format!(
            "Codes: {}\n",
            code_counts_text(&summary.code_counts)
        ));
    }
    res
}

fn results_to_json(summary: &Summary) -> JSValue {
    let agg = &summary.aggregate;
    let means: Vec<JSValue> = QUESTIONS
        .iter()
        .zip(agg.per_question_mean.iter())
        .enumerate()
        .map(|(idx, (q, mean))| {
            json!({
                "question": format!("Q{}", idx + 1),
                "label": q.label,
                "mean": format!("{:.2}", mean)
            })
        })
        .collect();
    let codes: Vec<JSValue> = summary
        .code_counts
        .iter()
        .map(|(code, count)| json!({"code": code, "respondents": count}))
        .collect();
    json!({
        "respondents": agg.respondents,
        "means": means,
        "overall": format!("{:.2}", agg.overall_mean),
        "category": summary.classification.category.label(),
        "narrative": summary.classification.narrative,
        "codes": codes
    })
}

// The data of the radar chart. Drawing it is left to the consumer.
fn chart_to_json(summary: &Summary) -> JSValue {
    let axes: Vec<&str> = QUESTIONS.iter().map(|q| q.label).collect();
    let values: Vec<JSValue> = summary
        .aggregate
        .per_question_mean
        .iter()
        .map(|m| json!(format!("{:.2}", m)))
        .collect();
    let rings: Vec<JSValue> = REFERENCE_RINGS
        .iter()
        .map(|r| json!(format!("{:.1}", r)))
        .collect();
    json!({
        "axes": axes,
        "values": values,
        "range": [0, MAX_SCORE],
        "rings": rings
    })
}

pub fn build_summary_js(source: &ReportSource, summary: &Summary) -> JSValue {
    json!({
        "config": source.to_json(),
        "results": results_to_json(summary),
        "chart": chart_to_json(summary)
    })
}

fn write_summary_js<W: Write>(
    js: &JSValue,
    opts: &OutputOptions,
    out: &mut W,
) -> SurveyResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(js).context(ParsingJsonSnafu {})?;

    match opts.out.as_deref() {
        None | Some("") => {}
        Some("stdout") => {
            writeln!(out, "{}", pretty_js_stats).context(WritingSnafu {})?;
        }
        Some(path) => {
            info!("write_summary_js: writing summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingFileSnafu { path })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &opts.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("write_summary_js: summary matches {:?}", summary_p);
    }
    Ok(())
}

/// Prints a report. An empty selection is not an error for the user: it is
/// reported as such and nothing is written.
fn report<W: Write>(
    source: &ReportSource,
    res: Result<Summary, HealthError>,
    opts: &OutputOptions,
    out: &mut W,
) -> SurveyResult<()> {
    let summary = match res {
        Ok(s) => s,
        Err(e) if e.is_no_data() => {
            info!("report: no data for {:?}", source);
            writeln!(out, "{}\n{}", source.title(), e).context(WritingSnafu {})?;
            return Ok(());
        }
        Err(e) => return Err(e).context(HealthSnafu {}),
    };
    write!(out, "{}", summary_text(source, &summary)).context(WritingSnafu {})?;
    let js = build_summary_js(source, &summary);
    write_summary_js(&js, opts, out)
}

fn parse_date(value: &str) -> SurveyResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").context(InvalidDateSnafu { value })
}

// ********* Commands ***********

/// Runs one command against an open session.
pub fn run_command<T: RemoteTable, C: Clock, W: Write>(
    session: &mut Session<T, C>,
    command: &Command,
    opts: &OutputOptions,
    out: &mut W,
) -> SurveyResult<()> {
    debug!("run_command: {:?}", command);
    match command {
        Command::Questions => {
            write!(out, "{}", questionnaire_text()).context(WritingSnafu {})?;
        }
        Command::Submit {
            code,
            control_id,
            scores,
        } => {
            let scores = Scores::new(scores).context(HealthSnafu {})?;
            let control_id = control_id.clone().unwrap_or_default();
            let record = session
                .submit(code, &control_id, scores)
                .context(HealthSnafu {})?;
            let when = record
                .timestamp
                .map(|t| t.format(church_health::row::TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            writeln!(
                out,
                "Response recorded for Church Code '{}' at {}",
                record.code, when
            )
            .context(WritingSnafu {})?;
        }
        Command::Results { code, from, to } => match (from, to) {
            (None, None) => {
                let source = ReportSource::Code(code.trim().to_string());
                let res = session.results_for_code(code);
                report(&source, res, opts, out)?;
            }
            (Some(from), Some(to)) => {
                let from = parse_date(from)?;
                let to = parse_date(to)?;
                let res = session.results_for_dates(code, from, to);
                let source = ReportSource::Dates {
                    code: code.trim().to_string(),
                    from,
                    to,
                };
                report(&source, res, opts, out)?;
            }
            _ => whatever!("Both --from and --to are needed to select a date range"),
        },
        Command::AllowList { input, worksheet } => {
            let raw = io_common::read_sheet(input, worksheet.as_deref())?;
            let allow_list = io_common::parse_allow_list(&raw)?;
            info!(
                "run_command: allow-list {:?} has {} entries",
                input,
                allow_list.len()
            );
            let source = ReportSource::AllowList {
                file: io_common::simplify_file_name(input),
                entries: allow_list.len(),
            };
            let res = session.results_for_allow_list(&allow_list);
            report(&source, res, opts, out)?;
        }
        Command::Upload { input, worksheet } => {
            let raw = io_common::read_sheet(input, worksheet.as_deref())?;
            let builder: Builder = io_common::parse_scores(&raw)?;
            let source = ReportSource::Upload {
                file: io_common::simplify_file_name(input),
            };
            report(&source, builder.summarize(), opts, out)?;
        }
        Command::Session => {
            whatever!("A session is already running")
        }
    }
    Ok(())
}

/// Splits a session line into words. Quotes group words, so that a code
/// may contain spaces: `results --code "First Baptist"`.
fn split_line(line: &str) -> SurveyResult<Vec<String>> {
    shell_words::split(line).context(SplittingLineSnafu {})
}

/// Reads commands line by line until the input ends or a line says `quit`.
///
/// All the commands share the same session. A failing command is reported on
/// `out` and does not end the loop.
pub fn run_session<T: RemoteTable, C: Clock, R: BufRead, W: Write>(
    session: &mut Session<T, C>,
    opts: &OutputOptions,
    input: R,
    out: &mut W,
) -> SurveyResult<()> {
    writeln!(out, "Type a command ('help' for the list, 'quit' to leave).")
        .context(WritingSnafu {})?;
    for line in input.lines() {
        let line = line.context(ReadingInputSnafu {})?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        let words = match split_line(line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "Error: {}", e).context(WritingSnafu {})?;
                continue;
            }
        };
        let parsed = SessionLine::try_parse_from(words);
        match parsed {
            Ok(sl) => {
                if let Err(e) = run_command(session, &sl.command, opts, out) {
                    warn!("run_session: command {:?} failed: {:?}", line, e);
                    writeln!(out, "Error: {}", e).context(WritingSnafu {})?;
                }
            }
            // Help and usage errors are rendered by clap.
            Err(e) => {
                writeln!(out, "{}", e).context(WritingSnafu {})?;
            }
        }
    }
    info!("run_session: done");
    Ok(())
}

pub fn open_session(settings: &Settings) -> Session<CsvSheet, SystemClock> {
    let table = CsvSheet::new(&settings.sheet_path, settings.rules.layout);
    info!("open_session: responses in {:?}", table.path());
    let clock = SystemClock::new(settings.offset);
    Session::new(table, clock, settings.rules.clone())
}

pub fn run(args: &Args) -> SurveyResult<()> {
    let opts = OutputOptions {
        out: args.out.clone(),
        reference: args.reference.clone(),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.command == Command::Questions {
        write!(out, "{}", questionnaire_text()).context(WritingSnafu {})?;
        return Ok(());
    }

    let settings = load_settings(args.config.as_deref(), args.sheet.as_deref())?;
    info!("run: settings: {:?}", settings);
    let mut session = open_session(&settings);

    match &args.command {
        Command::Session => {
            let stdin = std::io::stdin();
            let input = stdin.lock();
            run_session(&mut session, &opts, input, &mut out)
        }
        command => run_command(&mut session, command, &opts, &mut out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDateTime};
    use std::time::Duration;

    fn session() -> Session<MemoryTable, ManualClock> {
        let start =
            NaiveDateTime::parse_from_str("2025-03-01 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let clock = ManualClock::at(start, FixedOffset::east_opt(8 * 3600).unwrap()).unwrap();
        let table = MemoryTable::new(RowLayout::WithControlId.header());
        Session::new(table, clock, GuardRules::DEFAULT_RULES)
    }

    fn run_line(
        s: &mut Session<MemoryTable, ManualClock>,
        line: &str,
    ) -> (SurveyResult<()>, String) {
        let sl = SessionLine::try_parse_from(split_line(line).unwrap()).unwrap();
        let mut out: Vec<u8> = Vec::new();
        let res = run_command(s, &sl.command, &OutputOptions::default(), &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn submit_then_results() {
        let mut s = session();
        let (res, out) = run_line(
            &mut s,
            "submit --code CH001 --control-id A1 --scores 9,9,8,9,9,8,9",
        );
        res.unwrap();
        assert_eq!(
            out,
            "Response recorded for Church Code 'CH001' at 2025-03-01 09:30:00\n"
        );

        let (res, out) = run_line(&mut s, "results --code CH001");
        res.unwrap();
        assert!(out.starts_with("Results for Church Code 'CH001'\nRespondents: 1\n"));
        assert!(out.contains("  Q1 HUMILITY         9.00\n"));
        assert!(out.contains("Overall: 8.71\n"));
        assert!(out.contains("Category: Thriving Health\n"));
    }

    #[test]
    fn quoted_codes_keep_their_spaces() {
        let mut s = session();
        let (res, out) = run_line(
            &mut s,
            "submit --code \"First Baptist\" --control-id A1 --scores 7,7,7,7,7,7,7",
        );
        res.unwrap();
        assert!(out.starts_with("Response recorded for Church Code 'First Baptist'"));
        let (res, out) = run_line(&mut s, "results --code 'First Baptist'");
        res.unwrap();
        assert!(out.starts_with("Results for Church Code 'First Baptist'\nRespondents: 1\n"));
    }

    #[test]
    fn unbalanced_quote_does_not_end_the_session() {
        let mut s = session();
        let input = "results --code \"First Baptist\nresults --code CH001\n";
        let mut out: Vec<u8> = Vec::new();
        run_session(&mut s, &OutputOptions::default(), input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Error: Could not split the line into words"));
        assert!(out.contains("Results for Church Code 'CH001'\nNo responses yet\n"));
    }

    #[test]
    fn results_without_data() {
        let mut s = session();
        let (res, out) = run_line(&mut s, "results --code NOPE");
        res.unwrap();
        assert_eq!(out, "Results for Church Code 'NOPE'\nNo responses yet\n");
    }

    #[test]
    fn results_need_both_dates() {
        let mut s = session();
        let (res, _) = run_line(&mut s, "results --code CH001 --from 2025-01-01");
        assert!(res.is_err());
        let (res, _) = run_line(
            &mut s,
            "results --code CH001 --from 2025-02-01 --to 2025-01-01",
        );
        assert!(matches!(
            res,
            Err(SurveyError::Health {
                source: HealthError::InvalidDateRange { .. }
            })
        ));
        let (res, _) = run_line(&mut s, "results --code CH001 --from 2025-13-01 --to 2025-12-31");
        assert!(matches!(res, Err(SurveyError::InvalidDate { .. })));
    }

    #[test]
    fn invalid_scores_are_rejected_before_submitting() {
        let mut s = session();
        let (res, _) = run_line(&mut s, "submit --code CH001 --scores 9,9,8,9,9,8");
        assert!(matches!(
            res,
            Err(SurveyError::Health {
                source: HealthError::WrongScoreCount { count: 6 }
            })
        ));
        let (res, _) = run_line(&mut s, "submit --code CH001 --scores 9,9,8,9,9,8,11");
        assert_eq!(
            res.unwrap_err().to_string(),
            "Score for Q7 must be between 1 and 10, but it was 11"
        );
        assert_eq!(s.table().append_calls(), 0);
    }

    #[test]
    fn session_loop_keeps_going_after_errors() {
        let mut s = session();
        let input = "\
submit --code CH001 --control-id A1 --scores 5,5,5,5,5,5,5
submit --code CH001 --control-id A1 --scores 5,5,5,5,5,5,5
submit --code CH001 --scores 5,5,5,5,5,5,5
bogus
results --code CH001
quit
results --code CH001
";
        let mut out: Vec<u8> = Vec::new();
        run_session(&mut s, &OutputOptions::default(), input.as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Response recorded for Church Code 'CH001'"));
        assert!(out.contains(
            "Error: Control ID 'A1' has already been used for Church Code 'CH001'"
        ));
        assert!(out.contains("Error: Please wait 2 minute(s) and 0 second(s)"));
        assert!(out.contains("Category: Critical Condition"));
        // Nothing runs after 'quit'.
        assert_eq!(out.matches("Respondents:").count(), 1);
        assert_eq!(s.table().rows().len(), 1);
    }

    #[test]
    fn session_cooldown_expires() {
        let mut s = session();
        run_line(&mut s, "submit --code CH001 --scores 5,5,5,5,5,5,5")
            .0
            .unwrap();
        s.clock().advance(Duration::from_secs(120));
        run_line(&mut s, "submit --code CH001 --scores 6,6,6,6,6,6,6")
            .0
            .unwrap();
        assert_eq!(s.results_for_code("CH001").unwrap().aggregate.overall_mean, 5.5);
    }

    #[test]
    fn summary_json() {
        let summary = summarize_scores(&[
            Scores::new(&[8, 8, 8, 8, 8, 8, 8]).unwrap(),
            Scores::new(&[7, 7, 7, 7, 7, 7, 7]).unwrap(),
        ])
        .unwrap();
        let js = build_summary_js(
            &ReportSource::Upload {
                file: "scores.csv".to_string(),
            },
            &summary,
        );
        assert_eq!(js["config"]["source"], "upload");
        assert_eq!(js["results"]["respondents"], 2);
        assert_eq!(js["results"]["overall"], "7.50");
        assert_eq!(js["results"]["category"], "Stable Health");
        assert_eq!(js["results"]["means"][6]["label"], "YEARNING");
        assert_eq!(js["chart"]["axes"][0], "HUMILITY");
        assert_eq!(js["chart"]["rings"], json!(["5.5", "8.5"]));
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summarize_scores(&[Scores::new(&[8; 7]).unwrap()]).unwrap();
        let source = ReportSource::Code("CH001".to_string());
        let js = build_summary_js(&source, &summary);

        let ref_path = dir.path().join("expected.json");
        fs::write(&ref_path, serde_json::to_string(&js).unwrap()).unwrap();
        let opts = OutputOptions {
            out: Some(dir.path().join("out.json").display().to_string()),
            reference: Some(ref_path.display().to_string()),
        };
        let mut out: Vec<u8> = Vec::new();
        write_summary_js(&js, &opts, &mut out).unwrap();
        assert!(dir.path().join("out.json").exists());

        let other = summarize_scores(&[Scores::new(&[2; 7]).unwrap()]).unwrap();
        let js2 = build_summary_js(&source, &other);
        assert!(write_summary_js(&js2, &opts, &mut out).is_err());
    }

    #[test]
    fn unwritable_out_file() {
        let dir = tempfile::tempdir().unwrap();
        let summary = summarize_scores(&[Scores::new(&[8; 7]).unwrap()]).unwrap();
        let js = build_summary_js(&ReportSource::Code("CH001".to_string()), &summary);
        let out_path = dir.path().join("missing").join("out.json").display().to_string();
        let opts = OutputOptions {
            out: Some(out_path.clone()),
            reference: None,
        };
        let mut out: Vec<u8> = Vec::new();
        match write_summary_js(&js, &opts, &mut out) {
            Err(SurveyError::WritingFile { path, .. }) => assert_eq!(path, out_path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn questionnaire_lists_every_question() {
        let text = questionnaire_text();
        for q in QUESTIONS.iter() {
            assert!(text.contains(q.label));
        }
        assert!(text.contains("8.5 and above  Thriving Health"));
        assert!(text.contains("below 5.5      Critical Condition"));
    }
}
