use log::{debug, info, warn};

use attachment_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_json;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name}"))]
    ExcelMissingWorksheet { path: String, name: String },
    #[snafu(display(
        "The workbook {path} has {count} worksheets, the worksheet name must be provided"
    ))]
    ExcelTooManyWorksheets { path: String, count: usize },

    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },

    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a column or row index (number or letters), found {value}"))]
    ParsingJsonNumber { value: String },
    #[snafu(display("No sheet values found in {path}"))]
    JsonMissingValues { path: String },
    #[snafu(display("Line {lineno} of {path} is not a list of cells"))]
    JsonWrongRowType { path: String, lineno: usize },

    #[snafu(display("No header row found in {path}"))]
    MissingHeaderRow { path: String },
    #[snafu(display("Unknown provider {provider:?}: expected csv, xlsx or json"))]
    UnknownProvider { provider: String },
    #[snafu(display("No data to read: provide a configuration file or an input file"))]
    MissingInput {},
    #[snafu(display("The configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },
    #[snafu(display("Invalid schema in the configuration"))]
    InvalidSchema { source: ScoringError },
    #[snafu(display("Cannot score the answers of {source_name}"))]
    Scoring {
        source: ScoringError,
        source_name: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// A table read from a data source, with an identifier for each data row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SourceTable {
    pub source: String,
    pub ids: Vec<String>,
    pub table: RawTable,
}

struct SourceScores {
    source: String,
    ids: Vec<String>,
    result: ScoringResult,
}

fn read_source_table(root_path: &Path, ds: &DataSource) -> SurveyResult<SourceTable> {
    let p: PathBuf = root_path.join(&ds.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read survey file {:?}", p2);
    let grid = match ds.provider.as_str() {
        "csv" => io_csv::read_csv_grid(&p2)?,
        "xlsx" | "excel" => io_excel::read_excel_grid(&p2, ds)?,
        "json" => io_json::read_json_grid(&p2)?,
        x => return UnknownProviderSnafu { provider: x }.fail(),
    };
    io_common::assemble_table(&p2, grid, ds)
}

fn validate_rules(config: &SurveyConfig) -> SurveyResult<ScoringRules> {
    let schema = match &config.schema {
        Some(sc) => sc.to_schema()?,
        None => InstrumentSchema::standard(),
    };
    let missing_value_policy = match &config.rules {
        Some(r) => r.missing_value_policy()?,
        None => MissingValuePolicy::ExcludeMissing,
    };
    Ok(ScoringRules {
        schema,
        missing_value_policy,
    })
}

fn stats_to_json(groups: &[GroupStats]) -> JSValue {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    for g in groups {
        let mut columns: JSMap<String, JSValue> = JSMap::new();
        for (name, s) in g.columns.iter() {
            columns.insert(
                name.clone(),
                json!({"mean": s.mean, "std": s.std, "count": s.count}),
            );
        }
        res.insert(g.classification.name().to_string(), JSValue::Object(columns));
    }
    JSValue::Object(res)
}

fn respondents_to_json(scores: &[SourceScores], rules: &ScoringRules, labels: &Labels) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for s in scores {
        for (r, id) in s.result.respondents.iter().zip(s.ids.iter()) {
            let mut items: JSMap<String, JSValue> = JSMap::new();
            let mut sections: JSMap<String, JSValue> = JSMap::new();
            for layout in rules.schema.sections() {
                for c in s.result.columns.in_section(&layout.name) {
                    let v = json!(r.respondent.value(&c.name).get());
                    if layout.items {
                        items.insert(c.name.clone(), v);
                    } else {
                        sections.insert(c.name.clone(), v);
                    }
                }
            }
            let mut totals: JSMap<String, JSValue> = JSMap::new();
            for t in r.sections.iter() {
                totals.insert(t.section.clone(), json!(t.total));
            }
            let d = &r.dimensions;
            l.push(json!({
                "id": id,
                "source": s.source,
                "items": items,
                "sections": sections,
                "dimensions": {
                    "secure": d.secure,
                    "avoidant": d.avoidant,
                    "ambivalent": d.ambivalent
                },
                "sectionTotals": totals,
                "classification": r.classification.map(|c| c.name()),
                "label": r.classification.map(|c| labels.label(c)),
            }));
        }
    }
    l
}

fn build_summary_js(
    config: &SurveyConfig,
    rules: &ScoringRules,
    scores: &[SourceScores],
    summary: &Summary,
) -> JSValue {
    let labels = config.labels();
    let c = OutputConfig {
        survey_name: config.output_settings.survey_name.clone(),
        survey_date: config.output_settings.survey_date.clone(),
        schema_version: rules.schema.version().to_string(),
        missing_value_policy: missing_value_policy_name(rules.missing_value_policy).to_string(),
    };
    let distribution: Vec<JSValue> = summary
        .distribution
        .iter()
        .map(|cc| {
            json!({
                "classification": cc.classification.name(),
                "label": labels.label(cc.classification),
                "count": cc.count,
                "percentage": cc.percentage,
            })
        })
        .collect();
    json!({
        "config": c,
        "results": {
            "respondentCount": summary.classified + summary.unclassified,
            "classified": summary.classified,
            "unclassified": summary.unclassified,
            "respondents": respondents_to_json(scores, rules, &labels),
            "distribution": distribution,
            "itemStatistics": stats_to_json(&summary.item_statistics),
            "sectionStatistics": stats_to_json(&summary.section_statistics),
        }
    })
}

fn log_summary(summary: &Summary, labels: &Labels) {
    info!(
        "{} respondents classified, {} without classification",
        summary.classified, summary.unclassified
    );
    for cc in summary.distribution.iter() {
        info!(
            "{:>6} {:>6.1}% {}",
            cc.count,
            cc.percentage,
            labels.label(cc.classification)
        );
    }
}

fn write_output(out_path: Option<String>, contents: &str) -> SurveyResult<()> {
    match out_path {
        Some(p) if p != "stdout" => {
            info!("Writing summary to {:?}", p);
            fs::write(&p, contents).context(WritingOutputSnafu { path: p.clone() })
        }
        _ => {
            println!("{}", contents);
            Ok(())
        }
    }
}

/// Reads all the data sources, scores them and writes the summary.
///
/// If a reference summary is given, the computed summary must match it.
pub fn run_analysis(
    config: &SurveyConfig,
    root_path: &Path,
    reference_path: Option<String>,
    out_path: Option<String>,
) -> SurveyResult<()> {
    info!("config: {:?}", config);

    // Validate the rules:
    let rules = validate_rules(config)?;

    ensure!(!config.data_sources.is_empty(), MissingInputSnafu {});

    let mut scores: Vec<SourceScores> = Vec::new();
    for ds in config.data_sources.iter() {
        let st = read_source_table(root_path, ds)?;
        let result = run_scoring(&st.table, &rules).context(ScoringSnafu {
            source_name: st.source.clone(),
        })?;
        scores.push(SourceScores {
            source: st.source,
            ids: st.ids,
            result,
        });
    }

    let all: Vec<ScoredRespondent> = scores
        .iter()
        .flat_map(|s| s.result.respondents.iter().cloned())
        .collect();
    let summary = summarize(&all);
    log_summary(&summary, &config.labels());

    // Assemble the final json
    let result_js = build_summary_js(config, &rules, &scores, &summary);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out_path = out_path.or_else(|| {
        config
            .output_settings
            .output_file
            .as_ref()
            .map(|f| root_path.join(f).display().to_string())
    });
    write_output(out_path, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = reference_path {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        if summary_ref != result_js {
            let pretty_js_summary_ref =
                serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

fn load_config(config_path: &str) -> SurveyResult<(SurveyConfig, PathBuf)> {
    let config = read_config(config_path)?;
    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu { path: config_path })?
        .to_path_buf();
    Ok((config, root_p))
}

fn guess_input_type(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    if lower.ends_with(".xlsx") {
        "xlsx"
    } else if lower.ends_with(".json") {
        "json"
    } else {
        "csv"
    }
}

/// Builds a configuration from the command line only.
fn config_from_args(args: &Args, input: &str) -> SurveyConfig {
    let provider = args
        .input_type
        .clone()
        .unwrap_or_else(|| guess_input_type(input).to_string());
    SurveyConfig {
        output_settings: OutputSettings {
            survey_name: io_common::simplify_file_name(input),
            survey_date: None,
            output_file: None,
        },
        data_sources: vec![DataSource::new(
            &provider,
            input,
            args.excel_worksheet_name.clone(),
            args.id_column.clone(),
        )],
        rules: None,
        schema: None,
    }
}

pub fn run(args: &Args) -> SurveyResult<()> {
    let (mut config, root_p): (SurveyConfig, PathBuf) = match (&args.config, &args.input) {
        (Some(config_path), _) => load_config(config_path)?,
        (None, Some(input)) => (config_from_args(args, input), PathBuf::new()),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    // Options from the command line take precedence.
    if let Some(p) = &args.missing_value_policy {
        let mut rules = config.rules.clone().unwrap_or_default();
        rules.missing_value_policy = Some(p.clone());
        config.rules = Some(rules);
    }

    run_analysis(&config, &root_p, args.reference.clone(), args.out.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_analysis_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> SurveyResult<()> {
        let test_dir = option_env!("SURVEY_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"));
        info!("Running test {}", test_name);
        let (config, root_p) =
            load_config(format!("{}/{}/{}", test_dir, test_name, config_lpath).as_str())?;
        run_analysis(
            &config,
            &root_p,
            Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
            Some("stdout".to_string()),
        )
    }

    pub fn test_wrapper(test_name: &str) -> SurveyResult<()> {
        run_analysis_test(
            test_name,
            format!("{}_config.json", test_name).as_str(),
            format!("{}_expected_summary.json", test_name).as_str(),
        )
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn check(test_name: &str) {
        init();
        if let Err(e) = test_wrapper(test_name) {
            for err in snafu::ErrorCompat::iter_chain(&e) {
                eprintln!("caused by: {}", err);
            }
            panic!("test {} failed: {} ({:?})", test_name, e, e);
        }
    }

    #[test]
    fn basic() {
        check("basic");
    }

    #[test]
    fn sheet_values() {
        check("sheet_values");
    }

    #[test]
    fn narrow_export() {
        init();
        let res = test_wrapper("narrow_export");
        match res {
            Err(SurveyError::Scoring {
                source: ScoringError::Shape {
                    section,
                    missing_start,
                    end,
                    ..
                },
                ..
            }) => {
                assert_eq!(section, "sectionC");
                assert_eq!(missing_start, 50);
                assert_eq!(end, 57);
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn error_chain_names_the_missing_columns() {
        init();
        let e = match test_wrapper("narrow_export") {
            Err(e) => e,
            Ok(()) => panic!("narrow_export should fail"),
        };
        let messages: Vec<String> = snafu::ErrorCompat::iter_chain(&e)
            .map(|err| err.to_string())
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("narrow_export.csv"));
        assert!(messages[1].contains("sectionC"));
        assert!(messages[1].contains("[50, 57)"));
    }

    #[test]
    fn unknown_provider() {
        let config = SurveyConfig {
            output_settings: OutputSettings {
                survey_name: "x".to_string(),
                survey_date: None,
                output_file: None,
            },
            data_sources: vec![DataSource::new("ods", "answers.ods", None, None)],
            rules: None,
            schema: None,
        };
        let res = run_analysis(&config, Path::new(""), None, None);
        assert!(matches!(res, Err(SurveyError::UnknownProvider { .. })));
    }

    #[test]
    fn input_type_from_extension() {
        assert_eq!(guess_input_type("answers.XLSX"), "xlsx");
        assert_eq!(guess_input_type("dump/values.json"), "json");
        assert_eq!(guess_input_type("export.csv"), "csv");
        assert_eq!(guess_input_type("export"), "csv");
    }

    #[test]
    fn rules_from_config() {
        let js = json!({
            "outputSettings": {"surveyName": "test"},
            "dataSources": [],
            "rules": {"missingValuePolicy": "require"},
            "schema": {
                "version": "short-form",
                "sections": [
                    {"name": "items", "prefix": "item", "firstColumn": "C", "width": 15, "items": true},
                    {"name": "stress", "firstColumn": 18, "width": 6}
                ]
            }
        });
        let config: SurveyConfig = serde_json::from_value(js).unwrap();
        let rules = validate_rules(&config).unwrap();
        assert_eq!(rules.missing_value_policy, MissingValuePolicy::RequireAnswers);
        assert_eq!(rules.schema.version(), "short-form");
        let sections = rules.schema.sections();
        assert_eq!(sections[0].first_column, 2);
        assert_eq!(sections[1].first_column, 17);
        assert_eq!(sections[1].prefix, "stress");
        assert_eq!(rules.schema.required_width(), 23);
    }

    #[test]
    fn overlapping_schema_is_rejected() {
        let js = json!({
            "outputSettings": {"surveyName": "test"},
            "dataSources": [],
            "schema": {
                "version": "broken",
                "sections": [
                    {"name": "items", "firstColumn": "A", "width": 15, "items": true},
                    {"name": "extra", "firstColumn": "N", "width": 3}
                ]
            }
        });
        let config: SurveyConfig = serde_json::from_value(js).unwrap();
        assert!(matches!(
            validate_rules(&config),
            Err(SurveyError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn column_indexes() {
        assert_eq!(read_js_column(&json!("A")).unwrap(), 0);
        assert_eq!(read_js_column(&json!("o")).unwrap(), 14);
        assert_eq!(read_js_column(&json!("AC")).unwrap(), 28);
        assert_eq!(read_js_column(&json!("BE")).unwrap(), 56);
        assert_eq!(read_js_column(&json!(15)).unwrap(), 14);
        assert_eq!(read_js_column(&json!("2")).unwrap(), 1);
        assert!(read_js_column(&json!(0)).is_err());
        assert!(read_js_column(&json!("")).is_err());
        assert!(read_js_column(&json!(null)).is_err());
        assert!(matches!(
            read_js_column(&json!("A".repeat(40))),
            Err(SurveyError::ParsingJsonNumber { .. })
        ));
    }

    #[test]
    fn missing_value_policies() {
        assert_eq!(
            parse_missing_value_policy("exclude").unwrap(),
            MissingValuePolicy::ExcludeMissing
        );
        assert_eq!(
            parse_missing_value_policy("requireAnswers").unwrap(),
            MissingValuePolicy::RequireAnswers
        );
        assert!(parse_missing_value_policy("zero").is_err());
    }

    #[test]
    fn default_labels() {
        let labels = Labels {
            secure: Some("בטוחה".to_string()),
            ..Labels::default()
        };
        assert_eq!(labels.label(Classification::Secure), "בטוחה");
        assert_eq!(
            labels.label(Classification::Avoidant),
            "Avoidant communication"
        );
    }
}
