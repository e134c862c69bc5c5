use std::path::Path;

use crate::survey::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Brings a row to the width of the header.
///
/// Spreadsheet exports drop trailing empty cells, so short rows are padded.
/// Extra cells are dropped only when they are empty: anything else is left for
/// the scoring to reject.
pub fn fit_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() < width {
        row.resize(width, String::new());
    } else if row.len() > width && is_blank(&row[width..]) {
        row.truncate(width);
    }
    row
}

/// Splits the cells of a sheet into a header and data rows, and assigns an
/// identifier to each data row.
///
/// Row numbers follow the spreadsheet convention: the first row is 1. Blank
/// rows after the header are skipped.
pub fn assemble_table(
    path: &str,
    grid: Vec<Vec<String>>,
    cfs: &DataSource,
) -> SurveyResult<SourceTable> {
    let default_id = make_default_id(path);
    let id_idx_o = cfs.id_column_index_int()?;

    let header_idx = match cfs.first_row_index()? {
        Some(idx) => idx,
        None => grid
            .iter()
            .position(|row| !is_blank(row))
            .context(MissingHeaderRowSnafu { path })?,
    };

    let mut iter = grid.into_iter().enumerate().skip(header_idx);
    let (_, header) = iter.next().context(MissingHeaderRowSnafu { path })?;
    let header: Vec<String> = header
        .iter()
        .map(|s| s.trim_start_matches('\u{feff}').to_string())
        .collect();
    let width = header.len();
    debug!("assemble_table: header width {} at row {}", width, header_idx + 1);

    let mut ids: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut skipped = 0;
    for (idx, row) in iter {
        let lineno = idx + 1;
        if is_blank(&row) {
            skipped += 1;
            continue;
        }
        let id = match id_idx_o.and_then(|id_idx| row.get(id_idx)) {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => default_id(lineno),
        };
        debug!("assemble_table: lineno: {:?} id: {:?}", lineno, id);
        ids.push(id);
        rows.push(fit_row(row, width));
    }
    if skipped > 0 {
        warn!("assemble_table: {}: skipped {} blank rows", path, skipped);
    }
    info!("assemble_table: {}: {} respondents", path, rows.len());

    Ok(SourceTable {
        source: simplify_file_name(path),
        ids,
        table: RawTable::new(header, rows),
    })
}
