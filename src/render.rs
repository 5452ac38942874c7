//! Placeholder substitution
//!
//! Every literal `%key%` in a payload is replaced by the value of `key`.
//! Unknown markers are left as they are. Substitution is a single left-to-right
//! pass over the original payload: inserted values are never rescanned, so a
//! value that itself contains `%other%` comes out verbatim and the result does
//! not depend on the order in which keys are visited.

use crate::context::Params;

/// Render `payload` against `params`
pub fn render(payload: &str, params: &Params) -> String {
    if params.is_empty() || !payload.contains('%') {
        return payload.to_string();
    }

    // Longest marker first so that a key which extends another wins at the same offset
    let mut markers: Vec<(String, &str)> = params
        .iter()
        .map(|(key, value)| (format!("%{}%", key), value.as_str()))
        .collect();
    markers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut output = String::with_capacity(payload.len());
    let mut rest = payload;
    while let Some(offset) = rest.find('%') {
        output.push_str(&rest[..offset]);
        rest = &rest[offset..];

        match markers.iter().find(|(marker, _)| rest.starts_with(marker.as_str())) {
            Some((marker, value)) => {
                output.push_str(value);
                rest = &rest[marker.len()..];
            }
            None => {
                output.push('%');
                rest = &rest[1..];
            }
        }
    }
    output.push_str(rest);
    output
}
