mod aggregator;
pub mod builder;
mod classifier;
mod config;
mod locator;
pub mod manual;
mod normalizer;
mod renamer;
mod scorer;

use log::info;

pub use crate::aggregator::{describe, summarize};
pub use crate::classifier::{classify, classify_sums};
pub use crate::config::*;
pub use crate::locator::locate_columns;
pub use crate::normalizer::normalize;
pub use crate::renamer::rename_columns;
pub use crate::scorer::{score, score_respondent, section_score};

use crate::builder::Builder;

/// Cleans, scores and classifies all the respondents of a table.
///
/// Arguments:
/// * `table` the raw export: a header and rows of cells of the same width
/// * `rules` the layout of the instrument and the missing value policy
///
/// Structural problems (a table too narrow for the layout, colliding names,
/// ragged rows) abort the whole computation. Unreadable cells are missing
/// values and never fail.
pub fn run_scoring(table: &RawTable, rules: &ScoringRules) -> Result<ScoringResult, ScoringError> {
    info!(
        "run_scoring: processing {} rows of {} columns with schema {}, policy {:?}",
        table.rows.len(),
        table.width(),
        rules.schema.version(),
        rules.missing_value_policy
    );
    let mut builder = Builder::new(rules)?.header(&table.header)?;
    for row in table.rows.iter() {
        builder.add_row(row)?;
    }
    let result = builder.finish()?;

    for c in Classification::PRIORITY {
        let count = result
            .respondents
            .iter()
            .filter(|r| r.classification == Some(c))
            .count();
        info!("run_scoring: {:>5} {}", count, c);
    }
    let unclassified = result
        .respondents
        .iter()
        .filter(|r| r.classification.is_none())
        .count();
    if unclassified > 0 {
        info!("run_scoring: {:>5} without classification", unclassified);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<String>>) -> RawTable {
        let header: Vec<String> = (0..57).map(|i| format!("Question {}", i)).collect();
        RawTable::new(header, rows)
    }

    fn row(items: &[&str]) -> Vec<String> {
        let mut cells: Vec<String> = vec!["".to_string(); 57];
        cells[0] = "2024/03/01 10:00:00".to_string();
        for (idx, v) in items.iter().enumerate() {
            cells[14 + idx] = v.to_string();
        }
        for (idx, cell) in cells.iter_mut().enumerate().skip(29) {
            *cell = format!("{}", 1 + idx % 4);
        }
        cells
    }

    #[test]
    fn end_to_end() {
        let _ = env_logger::builder().is_test(true).try_init();
        let t = table(vec![row(&[
            "4", "3", "5", "2", "1", "5", "4", "3", "2", "1", "4", "3", "5", "2", "4",
        ])]);
        let result = run_scoring(&t, &ScoringRules::default()).unwrap();
        assert_eq!(result.schema_version, "v1");
        assert_eq!(result.respondents.len(), 1);
        let r = &result.respondents[0];
        assert_eq!(r.dimensions.secure, 18);
        assert_eq!(r.dimensions.avoidant, 16);
        assert_eq!(r.dimensions.ambivalent, 14);
        assert_eq!(r.classification, Some(Classification::Secure));
        assert_eq!(r.respondent.item(3), ScaleValue(Some(5)));

        // Columns 29..57 cycle through 1 + idx % 4.
        let totals: Vec<(&str, u32)> = r
            .sections
            .iter()
            .map(|s| (s.section.as_str(), s.total))
            .collect();
        assert_eq!(
            totals,
            vec![("sectionA", 20), ("sectionB", 20), ("sectionC", 30)]
        );
    }

    #[test]
    fn text_answers() {
        let t = table(vec![row(&[
            "1. never",
            "5. always",
            "1. never",
            "5. always",
            "3. sometimes",
            "",
            "1. never",
            "5. always",
            "n/a",
            "2",
            "3",
            "5. always",
            "4. often",
            "2. rarely",
            "1. never",
        ])]);
        let result = run_scoring(&t, &ScoringRules::default()).unwrap();
        let r = &result.respondents[0];
        assert_eq!(r.dimensions.secure, 1 + 1 + 1 + 2 + 1);
        assert_eq!(r.dimensions.avoidant, 5 + 5 + 5 + 5 + 4);
        assert_eq!(r.dimensions.ambivalent, 3 + 3 + 2);
        assert_eq!(r.dimensions.answered, [5, 5, 3]);
        assert_eq!(r.classification, Some(Classification::Avoidant));
        assert!(r.respondent.item(6).is_missing());
        assert!(r.respondent.item(9).is_missing());
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let t = table(vec![row(&["4000000000 times"; 15])]);
        let result = run_scoring(&t, &ScoringRules::default()).unwrap();
        let r = &result.respondents[0];
        assert_eq!(r.respondent.item(1), ScaleValue(Some(4_000_000_000)));
        assert_eq!(r.dimensions.secure, u32::MAX);
        assert_eq!(r.dimensions.avoidant, u32::MAX);
        assert_eq!(r.dimensions.ambivalent, u32::MAX);
        assert_eq!(r.classification, Some(Classification::Secure));
    }

    #[test]
    fn structural_errors_abort() {
        let mut t = table(vec![row(&["1"; 15]), row(&["2"; 15])]);
        t.rows[1].push("extra".to_string());
        let err = run_scoring(&t, &ScoringRules::default()).unwrap_err();
        assert_eq!(
            err,
            ScoringError::RaggedRow {
                row: 1,
                expected: 57,
                found: 58
            }
        );

        let narrow = RawTable::new(vec!["a".to_string(); 30], vec![]);
        assert!(matches!(
            run_scoring(&narrow, &ScoringRules::default()),
            Err(ScoringError::Shape { .. })
        ));
    }

    #[test]
    fn no_rows() {
        let result = run_scoring(&table(vec![]), &ScoringRules::default()).unwrap();
        assert!(result.respondents.is_empty());
        assert_eq!(result.columns.entries.len(), 43);
        assert_eq!(summarize(&result.respondents).classified, 0);
    }

    #[test]
    fn invalid_schemas() {
        let overlapping = InstrumentSchema::new(
            "broken",
            vec![
                SectionLayout::new("items", "item", 0, ITEM_COUNT, true),
                SectionLayout::new("extra", "extra", 10, 4, false),
            ],
        );
        assert!(matches!(
            overlapping,
            Err(ScoringError::InvalidSchema { .. })
        ));

        let short_items = InstrumentSchema::new(
            "short",
            vec![SectionLayout::new("items", "item", 0, 10, true)],
        );
        assert!(matches!(
            short_items,
            Err(ScoringError::InvalidSchema { .. })
        ));

        let no_items = InstrumentSchema::new(
            "none",
            vec![SectionLayout::new("extra", "extra", 0, 3, false)],
        );
        assert!(no_items.is_err());

        let empty = InstrumentSchema::new(
            "empty",
            vec![
                SectionLayout::new("items", "item", 0, ITEM_COUNT, true),
                SectionLayout::new("extra", "extra", 20, 0, false),
            ],
        );
        assert!(empty.is_err());

        let twice = InstrumentSchema::new(
            "twice",
            vec![
                SectionLayout::new("items", "item", 0, ITEM_COUNT, true),
                SectionLayout::new("extra", "a", 20, 2, false),
                SectionLayout::new("extra", "b", 22, 2, false),
            ],
        );
        assert!(twice.is_err());
    }

    #[test]
    fn schema_with_colliding_prefixes() {
        let schema = InstrumentSchema::new(
            "collide",
            vec![
                SectionLayout::new("items", "item", 0, ITEM_COUNT, true),
                SectionLayout::new("extra", "item", 15, 2, false),
            ],
        )
        .unwrap();
        let rules = ScoringRules {
            schema,
            missing_value_policy: MissingValuePolicy::ExcludeMissing,
        };
        let t = RawTable::new(vec!["".to_string(); 17], vec![]);
        assert!(matches!(
            run_scoring(&t, &rules),
            Err(ScoringError::DuplicateName { .. })
        ));
    }
}
