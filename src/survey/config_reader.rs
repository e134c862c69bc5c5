use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "surveyDate")]
    pub survey_date: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
}

/// The description of the run, as written in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "surveyDate")]
    pub survey_date: Option<String>,
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    #[serde(rename = "missingValuePolicy")]
    pub missing_value_policy: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "firstRowIndex")]
    _first_row_index: Option<JSValue>,
}

impl DataSource {
    pub fn new(
        provider: &str,
        file_path: &str,
        excel_worksheet_name: Option<String>,
        id_column_index: Option<String>,
    ) -> DataSource {
        DataSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            excel_worksheet_name,
            id_column_index: id_column_index.map(JSValue::String),
            _first_row_index: None,
        }
    }

    /// The zero-based column holding the respondent identifiers, if any.
    pub fn id_column_index_int(&self) -> SurveyResult<Option<usize>> {
        match &self.id_column_index {
            Some(x) => read_js_column(x).map(Some),
            None => Ok(None),
        }
    }

    /// The zero-based row of the header. If not provided, the header is the
    /// first non-blank row.
    pub fn first_row_index(&self) -> SurveyResult<Option<usize>> {
        match &self._first_row_index {
            Some(x) => read_js_column_number(x).map(Some),
            None => Ok(None),
        }
    }
}

/// Display names of the classifications.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Labels {
    pub secure: Option<String>,
    pub avoidant: Option<String>,
    pub ambivalent: Option<String>,
}

impl Labels {
    pub fn label(&self, c: Classification) -> String {
        let configured = match c {
            Classification::Secure => &self.secure,
            Classification::Avoidant => &self.avoidant,
            Classification::Ambivalent => &self.ambivalent,
        };
        configured.clone().unwrap_or_else(|| {
            match c {
                Classification::Secure => "Secure communication",
                Classification::Avoidant => "Avoidant communication",
                Classification::Ambivalent => "Anxious-ambivalent communication",
            }
            .to_string()
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyRules {
    #[serde(rename = "missingValuePolicy")]
    pub missing_value_policy: Option<String>,
    pub labels: Option<Labels>,
}

impl SurveyRules {
    pub fn missing_value_policy(&self) -> SurveyResult<MissingValuePolicy> {
        match self.missing_value_policy.as_deref() {
            None => Ok(MissingValuePolicy::ExcludeMissing),
            Some(p) => parse_missing_value_policy(p),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub name: String,
    pub prefix: Option<String>,
    #[serde(rename = "firstColumn")]
    pub first_column: JSValue,
    pub width: usize,
    pub items: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub version: String,
    pub sections: Vec<SectionConfig>,
}

impl SchemaConfig {
    pub fn to_schema(&self) -> SurveyResult<InstrumentSchema> {
        let mut sections: Vec<SectionLayout> = Vec::new();
        for s in self.sections.iter() {
            let first_column = read_js_column(&s.first_column)?;
            let prefix = s.prefix.clone().unwrap_or_else(|| s.name.clone());
            sections.push(SectionLayout::new(
                &s.name,
                &prefix,
                first_column,
                s.width,
                s.items.unwrap_or(false),
            ));
        }
        InstrumentSchema::new(&self.version, sections).context(InvalidSchemaSnafu {})
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSources")]
    pub data_sources: Vec<DataSource>,
    pub rules: Option<SurveyRules>,
    pub schema: Option<SchemaConfig>,
}

impl SurveyConfig {
    pub fn labels(&self) -> Labels {
        self.rules
            .as_ref()
            .and_then(|r| r.labels.clone())
            .unwrap_or_default()
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&config_str).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: String) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

pub fn parse_missing_value_policy(s: &str) -> SurveyResult<MissingValuePolicy> {
    match s {
        "exclude" | "excludeMissing" => Ok(MissingValuePolicy::ExcludeMissing),
        "require" | "requireAnswers" => Ok(MissingValuePolicy::RequireAnswers),
        _ => whatever!("unknown missing value policy: {}", s),
    }
}

pub fn missing_value_policy_name(p: MissingValuePolicy) -> &'static str {
    match p {
        MissingValuePolicy::ExcludeMissing => "exclude",
        MissingValuePolicy::RequireAnswers => "require",
    }
}

/// Reads a zero-based column index, written either as a 1-based number or
/// with Excel-style letters (`A`, `O`, `AC`).
pub fn read_js_column(x: &JSValue) -> SurveyResult<usize> {
    match x {
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            let mut idx: usize = 0;
            for c in s.to_ascii_uppercase().chars() {
                idx = idx
                    .checked_mul(26)
                    .and_then(|x| x.checked_add(c as usize - 'A' as usize + 1))
                    .context(ParsingJsonNumberSnafu {
                        value: x.to_string(),
                    })?;
            }
            Ok(idx - 1)
        }
        _ => read_js_column_number(x),
    }
}

fn read_js_column_number(x: &JSValue) -> SurveyResult<usize> {
    let n: Option<u64> = match x {
        JSValue::Number(n) => n.as_u64(),
        JSValue::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n >= 1 => Ok((n - 1) as usize),
        _ => ParsingJsonNumberSnafu {
            value: x.to_string(),
        }
        .fail(),
    }
}
