use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::*;

/// Reads the cells of a worksheet as strings.
pub fn read_excel_grid(path: &str, cfs: &DataSource) -> SurveyResult<Vec<Vec<String>>> {
    let wrange = get_range(path, cfs)?;
    debug!(
        "read_excel_grid: path: {:?} start: {:?} size: {:?}",
        path,
        wrange.start(),
        wrange.get_size()
    );
    Ok(range_to_grid(&wrange))
}

/// Calamine trims the empty rows and columns around the data. They are put
/// back so that positions match the spreadsheet (column A is index 0).
pub fn range_to_grid(wrange: &calamine::Range<DataType>) -> Vec<Vec<String>> {
    let (row_offset, col_offset) = wrange
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let mut res: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for row in wrange.rows() {
        let mut cells: Vec<String> = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        res.push(cells);
    }
    res
}

/// Renders a cell the way it is displayed. Whole numbers have no decimal part.
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(f) => f.to_string(),
        DataType::Empty => String::new(),
        DataType::Error(e) => {
            warn!("cell_to_string: error cell {:?}", e);
            String::new()
        }
    }
}

fn get_range(path: &str, cfs: &DataSource) -> SurveyResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(ExcelMissingWorksheetSnafu {
                path,
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", &path, &worksheet_name);
                Ok(wrange.clone())
            }
            l => ExcelTooManyWorksheetsSnafu {
                path,
                count: l.len(),
            }
            .fail(),
        }
    }
}
