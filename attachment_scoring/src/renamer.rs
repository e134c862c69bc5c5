use log::debug;
use std::collections::HashMap;

use crate::config::*;

/// Gives a stable logical name to every located column.
///
/// Position `i` (zero-based) of the items range is named `item_{i+1}`, and
/// position `i` of any other range `{prefix}_{i+1}`. Two columns receiving
/// the same name is an error: the layout does not match the instrument.
pub fn rename_columns(ranges: &[ColumnRange]) -> Result<ColumnNames, ScoringError> {
    // Name -> section that produced it
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut entries: Vec<ColumnName> = Vec::new();
    for range in ranges {
        for (idx, column) in (range.start..range.end).enumerate() {
            let name = if range.items {
                format!("item_{}", idx + 1)
            } else {
                format!("{}_{}", range.prefix, idx + 1)
            };
            if let Some(first) = owners.get(&name) {
                return DuplicateNameSnafu {
                    name: &name,
                    first,
                    second: &range.section,
                }
                .fail();
            }
            owners.insert(name.clone(), range.section.clone());
            entries.push(ColumnName {
                name,
                section: range.section.clone(),
                column,
            });
        }
    }
    debug!("rename_columns: {} columns named", entries.len());
    Ok(ColumnNames { entries })
}
