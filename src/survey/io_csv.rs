// Primitives for reading CSV files.

use crate::survey::*;

/// Reads all the lines of a CSV file as rows of cells, the header included.
///
/// Lines may have different lengths: the rows are brought to the width of the
/// header later.
pub fn read_csv_grid(path: &str) -> SurveyResult<Vec<Vec<String>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_grid: lineno: {:?} cells: {:?}", lineno, line.len());
        res.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(res)
}
