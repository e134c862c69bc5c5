use log::debug;

use crate::config::ScaleValue;

/// Reads the answer hidden in a raw cell.
///
/// Only the first run of ASCII digits matters: `"3. some difficulties"` is 3,
/// `"12abc34"` is 12. There is no decimal handling, so `"3.5"` reads as 3.
/// A cell without digits, or with a run too large for a scale value, is
/// missing.
pub fn normalize(raw: &str) -> ScaleValue {
    let start = match raw.find(|c: char| c.is_ascii_digit()) {
        Some(idx) => idx,
        None => return ScaleValue::MISSING,
    };
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    match rest[..end].parse::<u32>() {
        Ok(x) => ScaleValue(Some(x)),
        Err(e) => {
            debug!("normalize: dropping {:?}: {}", raw, e);
            ScaleValue::MISSING
        }
    }
}
