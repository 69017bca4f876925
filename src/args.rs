use clap::{Parser, Subcommand};

/// This is the collection and tabulation program for the H.E.A.L.T.H.Y. church survey.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration file. All its keys are optional,
    /// see the manual of the church_health crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The CSV file holding the responses. Setting this option
    /// overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub sheet: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided,
    /// healthy will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the results will be
    /// written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prints the questionnaire and the scoring guide.
    Questions,

    /// Records one response.
    Submit {
        /// The church code.
        #[clap(long, value_parser)]
        code: String,
        /// (optional) The control id of the respondent. Each control id may only be used
        /// once per church code.
        #[clap(long, value_parser)]
        control_id: Option<String>,
        /// The seven scores, separated by commas, for example 7,8,6,9,7,8,6.
        #[clap(long, value_parser, value_delimiter = ',')]
        scores: Vec<i64>,
    },

    /// Prints the results of one church code, optionally between two dates.
    Results {
        #[clap(long, value_parser)]
        code: String,
        /// (YYYY-MM-DD) First day included.
        #[clap(long, value_parser)]
        from: Option<String>,
        /// (YYYY-MM-DD) Last day included.
        #[clap(long, value_parser)]
        to: Option<String>,
    },

    /// Prints the results of the code and control id pairs listed in a file.
    AllowList {
        /// (file path) A CSV, XLS or XLSX file with the columns Code and Control_ID.
        #[clap(short, long, value_parser)]
        input: String,
        /// (default: first worksheet) When using an Excel file, the name of the worksheet.
        #[clap(long, value_parser)]
        worksheet: Option<String>,
    },

    /// Prints the results of the scores listed in a file.
    Upload {
        /// (file path) A CSV, XLS or XLSX file with exactly the columns Q1 to Q7.
        #[clap(short, long, value_parser)]
        input: String,
        /// (default: first worksheet) When using an Excel file, the name of the worksheet.
        #[clap(long, value_parser)]
        worksheet: Option<String>,
    },

    /// Reads commands from the standard input, one per line, until 'quit'.
    Session,
}

/// One line of an interactive session.
#[derive(Parser, Debug, Clone)]
#[clap(no_binary_name = true)]
pub struct SessionLine {
    #[clap(subcommand)]
    pub command: Command,
}
