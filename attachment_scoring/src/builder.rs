pub use crate::config::*;

use log::debug;
use snafu::prelude::*;
use std::collections::HashMap;

use crate::locator::locate_columns;
use crate::normalizer::normalize;
use crate::renamer::rename_columns;
use crate::scorer::score_respondent;

/// A builder for scoring respondents one row at a time.
///
/// The header must be given first: the columns are located and named before
/// any cell is read.
///
/// ```
/// use attachment_scoring::builder::Builder;
/// use attachment_scoring::{Classification, ScoringRules};
/// # use attachment_scoring::ScoringError;
///
/// let header: Vec<String> = (0..57).map(|i| format!("Q{}", i)).collect();
/// let mut builder = Builder::new(&ScoringRules::default())?.header(&header)?;
///
/// let mut row: Vec<String> = vec!["".to_string(); 57];
/// row[14] = "5. always".to_string();
/// builder.add_row(&row)?;
///
/// let result = builder.finish()?;
/// assert_eq!(result.respondents[0].dimensions.secure, 5);
/// assert_eq!(result.respondents[0].classification, Some(Classification::Secure));
/// # Ok::<(), ScoringError>(())
/// ```
pub struct Builder {
    rules: ScoringRules,
    columns: Option<ColumnNames>,
    width: usize,
    respondents: Vec<ScoredRespondent>,
}

impl Builder {
    pub fn new(rules: &ScoringRules) -> Result<Builder, ScoringError> {
        Ok(Builder {
            rules: rules.clone(),
            columns: None,
            width: 0,
            respondents: Vec::new(),
        })
    }

    /// Sets the header of the table and resolves the layout against it.
    pub fn header(self, header: &[String]) -> Result<Builder, ScoringError> {
        let ranges = locate_columns(&self.rules.schema, header)?;
        let columns = rename_columns(&ranges)?;
        debug!(
            "Builder::header: schema {} width {}",
            self.rules.schema.version(),
            header.len()
        );
        Ok(Builder {
            rules: self.rules,
            columns: Some(columns),
            width: header.len(),
            respondents: Vec::new(),
        })
    }

    /// Cleans, scores and classifies one data row.
    pub fn add_row(&mut self, cells: &[String]) -> Result<(), ScoringError> {
        let columns = self.columns.as_ref().context(MissingHeaderSnafu {})?;
        let row = self.respondents.len();
        ensure!(
            cells.len() == self.width,
            RaggedRowSnafu {
                row,
                expected: self.width,
                found: cells.len(),
            }
        );
        let values: HashMap<String, ScaleValue> = columns
            .entries
            .iter()
            .map(|c| (c.name.clone(), normalize(&cells[c.column])))
            .collect();
        let respondent = Respondent { row, values };
        let scored = score_respondent(respondent, columns, &self.rules);
        self.respondents.push(scored);
        Ok(())
    }

    pub fn finish(self) -> Result<ScoringResult, ScoringError> {
        let columns = self.columns.context(MissingHeaderSnafu {})?;
        Ok(ScoringResult {
            schema_version: self.rules.schema.version().to_string(),
            columns,
            respondents: self.respondents,
        })
    }
}
