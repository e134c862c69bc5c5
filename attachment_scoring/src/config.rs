// ********* Input data structures ***********

use snafu::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

/// The raw two-dimensional table, as exported by the spreadsheet.
///
/// The header labels are not guaranteed to be unique: forms routinely repeat
/// the same question text in several sections.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> RawTable {
        RawTable { header, rows }
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// A cleaned answer. `None` means the cell was empty or had no digits.
///
/// A missing value is never turned into a zero answer. It is only skipped when
/// sums are computed.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub struct ScaleValue(pub Option<u32>);

impl ScaleValue {
    pub const MISSING: ScaleValue = ScaleValue(None);

    pub fn get(self) -> Option<u32> {
        self.0
    }

    pub fn is_missing(self) -> bool {
        self.0.is_none()
    }
}

impl From<u32> for ScaleValue {
    fn from(x: u32) -> ScaleValue {
        ScaleValue(Some(x))
    }
}

// ********* Instrument layout **********

/// Number of questions of the core questionnaire.
pub const ITEM_COUNT: usize = 15;

pub const SECURE_ITEMS: [usize; 5] = [1, 3, 7, 10, 15];
pub const AVOIDANT_ITEMS: [usize; 5] = [2, 4, 8, 12, 13];
pub const AMBIVALENT_ITEMS: [usize; 5] = [5, 6, 9, 11, 14];

/// One named block of contiguous columns in the export.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SectionLayout {
    /// The name of the section, used for the section totals.
    pub name: String,
    /// The prefix of the logical column names (`item` gives `item_1`, `item_2`...).
    pub prefix: String,
    /// Zero-based position of the first column.
    pub first_column: usize,
    pub width: usize,
    /// True for the block holding the 15 questionnaire items.
    pub items: bool,
}

impl SectionLayout {
    pub fn new(name: &str, prefix: &str, first_column: usize, width: usize, items: bool) -> Self {
        SectionLayout {
            name: name.to_string(),
            prefix: prefix.to_string(),
            first_column,
            width,
            items,
        }
    }

    pub fn end(&self) -> usize {
        self.first_column + self.width
    }
}

/// A versioned description of where each section lives in the export.
///
/// The layout is checked when it is built: exactly one items block of
/// `ITEM_COUNT` columns, no empty block, no two blocks sharing a column and
/// no two blocks with the same name.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InstrumentSchema {
    version: String,
    sections: Vec<SectionLayout>,
}

impl InstrumentSchema {
    pub const STANDARD_VERSION: &'static str = "v1";

    pub fn new(version: &str, sections: Vec<SectionLayout>) -> Result<Self, ScoringError> {
        let item_blocks: Vec<&SectionLayout> = sections.iter().filter(|s| s.items).collect();
        match item_blocks.as_slice() {
            [] => {
                return InvalidSchemaSnafu {
                    version,
                    message: "no items section",
                }
                .fail()
            }
            [s] => ensure!(
                s.width == ITEM_COUNT,
                InvalidSchemaSnafu {
                    version,
                    message: format!(
                        "items section {} has {} columns, expected {}",
                        s.name, s.width, ITEM_COUNT
                    ),
                }
            ),
            _ => {
                return InvalidSchemaSnafu {
                    version,
                    message: "more than one items section",
                }
                .fail()
            }
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        for s in sections.iter() {
            ensure!(
                s.width > 0,
                InvalidSchemaSnafu {
                    version,
                    message: format!("section {} is empty", s.name),
                }
            );
            ensure!(
                seen_names.insert(s.name.as_str()),
                InvalidSchemaSnafu {
                    version,
                    message: format!("section {} is declared twice", s.name),
                }
            );
        }

        let mut by_start: Vec<&SectionLayout> = sections.iter().collect();
        by_start.sort_by_key(|s| s.first_column);
        for pair in by_start.windows(2) {
            ensure!(
                pair[0].end() <= pair[1].first_column,
                InvalidSchemaSnafu {
                    version,
                    message: format!(
                        "sections {} and {} overlap on column {}",
                        pair[0].name, pair[1].name, pair[1].first_column
                    ),
                }
            );
        }

        Ok(InstrumentSchema {
            version: version.to_string(),
            sections,
        })
    }

    /// The layout of the form export: the items in columns O..AC, followed by
    /// the three auxiliary scales.
    pub fn standard() -> InstrumentSchema {
        InstrumentSchema {
            version: InstrumentSchema::STANDARD_VERSION.to_string(),
            sections: vec![
                SectionLayout::new("items", "item", 14, ITEM_COUNT, true),
                SectionLayout::new("sectionA", "sectionA", 29, 8, false),
                SectionLayout::new("sectionB", "sectionB", 37, 8, false),
                SectionLayout::new("sectionC", "sectionC", 45, 12, false),
            ],
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn sections(&self) -> &[SectionLayout] {
        &self.sections
    }

    /// The minimum number of columns a table must have.
    pub fn required_width(&self) -> usize {
        self.sections.iter().map(|s| s.end()).max().unwrap_or(0)
    }
}

// ********* Configuration **********

/// What to do with a dimension whose items were all left unanswered.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingValuePolicy {
    /// Missing answers are skipped in the sums. A dimension without any
    /// answer scores 0 and the respondent is classified as usual.
    ExcludeMissing,
    /// A respondent with a dimension without any answer is not classified.
    RequireAnswers,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoringRules {
    pub schema: InstrumentSchema,
    pub missing_value_policy: MissingValuePolicy,
}

impl Default for ScoringRules {
    fn default() -> Self {
        ScoringRules {
            schema: InstrumentSchema::standard(),
            missing_value_policy: MissingValuePolicy::ExcludeMissing,
        }
    }
}

// ******** Intermediate data structures *********

/// The columns of one section, as found in a given table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnRange {
    pub section: String,
    pub prefix: String,
    pub start: usize,
    /// Exclusive.
    pub end: usize,
    pub items: bool,
}

impl ColumnRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnName {
    pub name: String,
    pub section: String,
    pub column: usize,
}

/// The logical names of all the located columns, in column order within each
/// section and in schema order across sections.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnNames {
    pub entries: Vec<ColumnName>,
}

impl ColumnNames {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.column)
    }

    pub fn in_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a ColumnName> {
        self.entries.iter().filter(move |e| e.section == section)
    }
}

/// One respondent after cleaning.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Respondent {
    /// Zero-based index of the data row in the raw table (the header is not counted).
    pub row: usize,
    pub values: HashMap<String, ScaleValue>,
}

impl Respondent {
    pub fn value(&self, name: &str) -> ScaleValue {
        self.values.get(name).cloned().unwrap_or(ScaleValue::MISSING)
    }

    /// The answer to item `number` (1-based).
    pub fn item(&self, number: usize) -> ScaleValue {
        self.value(&format!("item_{}", number))
    }
}

// ******** Output data structures *********

/// The three communication styles, in tie-break priority order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Classification {
    Secure,
    Avoidant,
    Ambivalent,
}

impl Classification {
    /// The order in which ties are broken: the first one wins.
    pub const PRIORITY: [Classification; 3] = [
        Classification::Secure,
        Classification::Avoidant,
        Classification::Ambivalent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Classification::Secure => "secure",
            Classification::Avoidant => "avoidant",
            Classification::Ambivalent => "ambivalent",
        }
    }

    /// The items (1-based) that make up this dimension.
    pub fn items(self) -> &'static [usize] {
        match self {
            Classification::Secure => &SECURE_ITEMS,
            Classification::Avoidant => &AVOIDANT_ITEMS,
            Classification::Ambivalent => &AMBIVALENT_ITEMS,
        }
    }

    fn index(self) -> usize {
        match self {
            Classification::Secure => 0,
            Classification::Avoidant => 1,
            Classification::Ambivalent => 2,
        }
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct DimensionSums {
    pub secure: u32,
    pub avoidant: u32,
    pub ambivalent: u32,
    /// Number of non-missing items that went into each sum, in priority order.
    pub answered: [usize; 3],
}

impl DimensionSums {
    pub fn get(&self, c: Classification) -> u32 {
        match c {
            Classification::Secure => self.secure,
            Classification::Avoidant => self.avoidant,
            Classification::Ambivalent => self.ambivalent,
        }
    }

    pub fn answered(&self, c: Classification) -> usize {
        self.answered[c.index()]
    }

    pub(crate) fn set(&mut self, c: Classification, sum: u32, answered: usize) {
        match c {
            Classification::Secure => self.secure = sum,
            Classification::Avoidant => self.avoidant = sum,
            Classification::Ambivalent => self.ambivalent = sum,
        }
        self.answered[c.index()] = answered;
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SectionTotal {
    pub section: String,
    pub total: u32,
    pub answered: usize,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoredRespondent {
    pub respondent: Respondent,
    pub dimensions: DimensionSums,
    /// The auxiliary sections, in schema order.
    pub sections: Vec<SectionTotal>,
    /// Always set, unless the `RequireAnswers` policy rejected the respondent.
    pub classification: Option<Classification>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoringResult {
    pub schema_version: String,
    pub columns: ColumnNames,
    pub respondents: Vec<ScoredRespondent>,
}

/// Descriptive statistics of one column within one group.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Stats {
    /// Undefined when no value is present.
    pub mean: Option<f64>,
    /// Sample standard deviation. Undefined for fewer than two values.
    pub std: Option<f64>,
    pub count: usize,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ClassCount {
    pub classification: Classification,
    pub count: usize,
    pub percentage: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct GroupStats {
    pub classification: Classification,
    pub columns: Vec<(String, Stats)>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct Summary {
    pub classified: usize,
    pub unclassified: usize,
    pub distribution: Vec<ClassCount>,
    pub item_statistics: Vec<GroupStats>,
    pub section_statistics: Vec<GroupStats>,
}

/// Errors that break the structure of the computation. They abort the run.
///
/// Unreadable cells are not errors: they become missing values.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ScoringError {
    #[snafu(display(
        "table has {width} columns but section {section} needs columns [{start}, {end}): columns [{missing_start}, {end}) are missing"
    ))]
    Shape {
        section: String,
        start: usize,
        end: usize,
        width: usize,
        missing_start: usize,
    },

    #[snafu(display("column name {name} is produced by both section {first} and section {second}"))]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[snafu(display("data row {row} has {found} cells, the header has {expected}"))]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[snafu(display("invalid instrument schema {version}: {message}"))]
    InvalidSchema { version: String, message: String },

    #[snafu(display("rows cannot be scored before the header has been read"))]
    MissingHeader {},
}
