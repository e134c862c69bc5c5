use clap::Parser;

/// Scores the communication style questionnaire of survey exports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the survey: data sources, rules and layout of the
    /// columns. The paths of the data sources are relative to the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference summary in JSON format. If provided, commscore will check that the computed
    /// summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output file that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A survey export to score with the standard layout, when no configuration file
    /// is given.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv, xlsx or json) The type of the input. By default, it is guessed from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file with several worksheets, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (column number or letters) The column holding an identifier for each respondent. By default, the
    /// respondents are identified by their row.
    #[clap(long, value_parser)]
    pub id_column: Option<String>,

    /// (exclude or require) How respondents with unanswered items are classified. Overrides the
    /// configuration file.
    #[clap(long, value_parser)]
    pub missing_value_policy: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
