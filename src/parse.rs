//! Tolerant extraction of JSON from free-form model output.
//!
//! Models wrap JSON in prose, code fences, or both. The strategy here is:
//! strict decode of the whole text, then of the text with code fences
//! stripped, then every balanced `{...}` / `[...]` span in order of its
//! opening bracket. The first span that decodes wins, so an undecodable
//! outer span falls through to the spans nested inside it.

use serde_json::{Map, Value};

/// Upper bound on bracket spans tried per response.
const MAX_CANDIDATES: usize = 64;

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ```` marker.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the optional language tag along with the rest of the fence line.
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| {
                c.is_ascii_alphanumeric() || c == '_' || c == '-'
            }),
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Best-effort decode of a JSON object from model output.
pub fn parse_json_object(text: &str) -> Option<Map<String, Value>> {
    match first_decodable(text, |v| v.is_object())? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Best-effort decode of a JSON array from model output.
pub fn parse_json_array(text: &str) -> Option<Vec<Value>> {
    match first_decodable(text, |v| v.is_array())? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Decode the span from the first `[` to the last `]`.
///
/// Weaker than [`parse_json_array`]: a stray bracket in surrounding prose
/// breaks it. Used where a response is expected to be a bare list.
pub fn extract_bracketed_array(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn first_decodable(text: &str, accept: impl Fn(&Value) -> bool) -> Option<Value> {
    let decode = |candidate: &str| {
        serde_json::from_str::<Value>(candidate)
            .ok()
            .filter(|value| accept(value))
    };

    if let Some(value) = decode(text.trim()) {
        return Some(value);
    }

    let unfenced = strip_code_fences(text);
    if let Some(value) = decode(unfenced) {
        return Some(value);
    }

    json_candidates(unfenced)
        .take(MAX_CANDIDATES)
        .find_map(decode)
}

/// Balanced bracket spans, ordered by the position of their opening bracket.
fn json_candidates(text: &str) -> impl Iterator<Item = &str> {
    let mut spans = bracket_spans(text);
    spans.sort_unstable_by_key(|&(start, _)| start);
    spans
        .into_iter()
        .map(move |(start, end)| &text[start..=end])
}

/// One pass over `text`, recording `(open, close)` byte indices as each
/// bracket closes.
///
/// Quotes only count inside an open bracket, so prose around the JSON can
/// contain stray `"`. A mismatched closer discards every open bracket.
fn bracket_spans(text: &str) -> Vec<(usize, usize)> {
    let mut open: Vec<(usize, char)> = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for (index, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' if !open.is_empty() => in_string = !in_string,
            '{' | '[' if !in_string => open.push((index, ch)),
            '}' | ']' if !in_string => {
                let expected = if ch == '}' { '{' } else { '[' };
                match open.pop() {
                    Some((start, opener)) if opener == expected => spans.push((start, index)),
                    Some(_) => open.clear(),
                    None => {}
                }
            }
            _ => {}
        }
    }

    spans
}

/// Truncate to at most `max` characters, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

/// Read a string field, ignoring blank values.
pub fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read an array-of-strings field. Non-string elements are skipped.
pub fn string_list_field(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    map.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}
