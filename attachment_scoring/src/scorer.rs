use log::debug;

use crate::classifier::classify_sums;
use crate::config::*;

/// Adds up answers. The total saturates at `u32::MAX` instead of wrapping.
fn saturating_total(values: &[u32]) -> u32 {
    values.iter().fold(0u32, |acc, x| acc.saturating_add(*x))
}

/// Sums the items of each dimension. Missing answers are skipped.
pub fn score(respondent: &Respondent) -> DimensionSums {
    let mut sums = DimensionSums::default();
    for c in Classification::PRIORITY {
        let values: Vec<u32> = c
            .items()
            .iter()
            .filter_map(|number| respondent.item(*number).get())
            .collect();
        sums.set(c, saturating_total(&values), values.len());
    }
    sums
}

/// Sums all the answers of an auxiliary section. Missing answers are skipped.
pub fn section_score(respondent: &Respondent, columns: &ColumnNames, section: &str) -> SectionTotal {
    let values: Vec<u32> = columns
        .in_section(section)
        .filter_map(|c| respondent.value(&c.name).get())
        .collect();
    SectionTotal {
        section: section.to_string(),
        total: saturating_total(&values),
        answered: values.len(),
    }
}

/// Computes all the scores of one respondent and classifies it.
pub fn score_respondent(
    respondent: Respondent,
    columns: &ColumnNames,
    rules: &ScoringRules,
) -> ScoredRespondent {
    let dimensions = score(&respondent);
    let sections: Vec<SectionTotal> = rules
        .schema
        .sections()
        .iter()
        .filter(|s| !s.items)
        .map(|s| section_score(&respondent, columns, &s.name))
        .collect();
    let classification = classify_sums(&dimensions, rules.missing_value_policy);
    debug!(
        "score_respondent: row {}: {:?} -> {:?}",
        respondent.row, dimensions, classification
    );
    ScoredRespondent {
        respondent,
        dimensions,
        sections,
        classification,
    }
}
