// Sheet values exported as JSON.
//
// Two shapes are accepted: a plain array of rows, or the object returned by
// the Google Sheets API, with the rows in a `values` field.

use crate::survey::*;

pub fn read_json_grid(path: &str) -> SurveyResult<Vec<Vec<String>>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    values_to_grid(path, &js)
}

pub fn values_to_grid(path: &str, js: &JSValue) -> SurveyResult<Vec<Vec<String>>> {
    let rows = match js {
        JSValue::Array(rows) => rows,
        JSValue::Object(obj) => obj
            .get("values")
            .and_then(|v| v.as_array())
            .context(JsonMissingValuesSnafu { path })?,
        _ => return JsonMissingValuesSnafu { path }.fail(),
    };
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let cells = row.as_array().context(JsonWrongRowTypeSnafu {
            path,
            lineno: idx + 1,
        })?;
        res.push(cells.iter().map(json_cell_to_string).collect());
    }
    Ok(res)
}

fn json_cell_to_string(v: &JSValue) -> String {
    match v {
        JSValue::String(s) => s.clone(),
        JSValue::Number(n) => n.to_string(),
        JSValue::Bool(b) => b.to_string(),
        JSValue::Null => String::new(),
        x => {
            warn!("json_cell_to_string: unexpected cell {:?}", x);
            x.to_string()
        }
    }
}
