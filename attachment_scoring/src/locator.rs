use log::debug;
use snafu::prelude::*;

use crate::config::*;

/// Finds the columns of every section of the schema in the header of a table.
///
/// The positions come from the schema only: the labels of the header are not
/// inspected, since the form repeats question texts across sections. A header
/// that is too narrow for a section is an error, extra trailing columns are
/// ignored.
pub fn locate_columns(
    schema: &InstrumentSchema,
    header: &[String],
) -> Result<Vec<ColumnRange>, ScoringError> {
    let width = header.len();
    let mut ranges: Vec<ColumnRange> = Vec::new();
    for section in schema.sections() {
        let (start, end) = (section.first_column, section.end());
        ensure!(
            end <= width,
            ShapeSnafu {
                section: &section.name,
                start,
                end,
                width,
                missing_start: start.max(width),
            }
        );
        debug!(
            "locate_columns: section {} -> [{}, {}) first label: {:?}",
            section.name,
            start,
            end,
            header.get(start)
        );
        ranges.push(ColumnRange {
            section: section.name.clone(),
            prefix: section.prefix.clone(),
            start,
            end,
            items: section.items,
        });
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: usize) -> Vec<String> {
        (0..width).map(|i| format!("col {}", i)).collect()
    }

    #[test]
    fn standard_layout() {
        let ranges = locate_columns(&InstrumentSchema::standard(), &header(57)).unwrap();
        let spans: Vec<(&str, usize, usize)> = ranges
            .iter()
            .map(|r| (r.section.as_str(), r.start, r.end))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("items", 14, 29),
                ("sectionA", 29, 37),
                ("sectionB", 37, 45),
                ("sectionC", 45, 57)
            ]
        );
        assert_eq!(ranges[0].len(), ITEM_COUNT);
        assert!(ranges[0].items);
        // Contiguous and disjoint.
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn wider_table_is_accepted() {
        let ranges = locate_columns(&InstrumentSchema::standard(), &header(70)).unwrap();
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[3].end, 57);
    }

    #[test]
    fn narrow_table_reports_missing_range() {
        let err = locate_columns(&InstrumentSchema::standard(), &header(56)).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Shape {
                section: "sectionC".to_string(),
                start: 45,
                end: 57,
                width: 56,
                missing_start: 56,
            }
        );
    }

    #[test]
    fn table_without_items() {
        let err = locate_columns(&InstrumentSchema::standard(), &header(10)).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Shape {
                section: "items".to_string(),
                start: 14,
                end: 29,
                width: 10,
                missing_start: 14,
            }
        );
        assert!(err.to_string().contains("[14, 29)"));
    }

    #[test]
    fn custom_schema() {
        let schema = InstrumentSchema::new(
            "compact",
            vec![
                SectionLayout::new("items", "item", 1, ITEM_COUNT, true),
                SectionLayout::new("mood", "mood", 16, 3, false),
            ],
        )
        .unwrap();
        assert_eq!(schema.required_width(), 19);
        let ranges = locate_columns(&schema, &header(19)).unwrap();
        assert_eq!(ranges[1].start, 16);
        assert_eq!(ranges[1].len(), 3);
    }
}
