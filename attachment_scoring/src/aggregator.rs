use log::debug;

use crate::config::*;

/// Groups the scored respondents by classification and describes each group.
///
/// Respondents without a classification are only counted. The distribution is
/// sorted by decreasing count, groups with the same count in priority order.
pub fn summarize(respondents: &[ScoredRespondent]) -> Summary {
    let classified: Vec<&ScoredRespondent> = respondents
        .iter()
        .filter(|r| r.classification.is_some())
        .collect();
    let total = classified.len();

    let mut distribution: Vec<ClassCount> = Vec::new();
    let mut item_statistics: Vec<GroupStats> = Vec::new();
    let mut section_statistics: Vec<GroupStats> = Vec::new();

    // Section names, in the order of first appearance.
    let mut section_names: Vec<String> = Vec::new();
    for r in classified.iter() {
        for s in r.sections.iter() {
            if !section_names.contains(&s.section) {
                section_names.push(s.section.clone());
            }
        }
    }

    for c in Classification::PRIORITY {
        let group: Vec<&ScoredRespondent> = classified
            .iter()
            .filter(|r| r.classification == Some(c))
            .cloned()
            .collect();
        if group.is_empty() {
            continue;
        }
        distribution.push(ClassCount {
            classification: c,
            count: group.len(),
            percentage: (group.len() as f64 * 100.0) / total as f64,
        });

        let items: Vec<(String, Stats)> = (1..=ITEM_COUNT)
            .map(|number| {
                let values: Vec<f64> = group
                    .iter()
                    .filter_map(|r| r.respondent.item(number).get())
                    .map(|x| x as f64)
                    .collect();
                (format!("item_{}", number), describe(&values))
            })
            .collect();
        item_statistics.push(GroupStats {
            classification: c,
            columns: items,
        });

        let sections: Vec<(String, Stats)> = section_names
            .iter()
            .map(|name| {
                let values: Vec<f64> = group
                    .iter()
                    .filter_map(|r| r.sections.iter().find(|s| s.section == *name))
                    .map(|s| s.total as f64)
                    .collect();
                (name.clone(), describe(&values))
            })
            .collect();
        section_statistics.push(GroupStats {
            classification: c,
            columns: sections,
        });
    }

    // Stable: equal counts keep the priority order.
    distribution.sort_by(|a, b| b.count.cmp(&a.count));
    debug!("summarize: distribution {:?}", distribution);

    Summary {
        classified: total,
        unclassified: respondents.len() - total,
        distribution,
        item_statistics,
        section_statistics,
    }
}

/// Mean, sample standard deviation and count.
pub fn describe(values: &[f64]) -> Stats {
    let count = values.len();
    if count == 0 {
        return Stats {
            mean: None,
            std: None,
            count,
        };
    }
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        None
    } else {
        let var = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (count - 1) as f64;
        Some(var.sqrt())
    };
    Stats {
        mean: Some(mean),
        std,
        count,
    }
}
