//! Structured extraction — best-effort repair of near-JSON model output
//! followed by required-key validation.
//!
//! Models are instructed to emit a flat JSON object, but in practice wrap
//! it in prose ("Sure! {...} Hope this helps!"), fence it in markdown,
//! leave trailing commas, use single quotes or bare keys, or stop
//! mid-object at the token limit. The repair pipeline here tolerates all
//! of those. The contract is modest: valid JSON in → same structure out;
//! near-JSON in → best-effort structure out; garbage in → parse failure.
//! Exact repair behavior on pathological input is not part of the
//! contract and may change.
//!
//! Purely textual, no side effects. Missing/malformed data is returned as
//! an [`ExtractionFailure`] value, never raised past this boundary.

use serde_json::{Map, Value};

use crate::error::ExtractionFailure;
use crate::record::StructuredRecord;

/// Parse/repair `raw` into a structured record and verify every key in
/// `required_keys` is present at the top level.
pub fn extract(
    raw: &str,
    required_keys: &[&str],
) -> std::result::Result<StructuredRecord, ExtractionFailure> {
    let record = repair_and_parse(raw).ok_or(ExtractionFailure::Unparseable)?;

    let missing = record.missing_keys(required_keys);
    if !missing.is_empty() {
        return Err(ExtractionFailure::MissingKeys(missing));
    }

    Ok(record)
}

/// The repair pipeline: each stage is tried only if the previous one did
/// not yield a top-level object.
fn repair_and_parse(raw: &str) -> Option<StructuredRecord> {
    let trimmed = raw.trim();

    if let Some(map) = parse_object(trimmed) {
        return Some(StructuredRecord::from_map(map));
    }

    let defenced = strip_code_fences(trimmed);
    if let Some(map) = parse_object(defenced.trim()) {
        return Some(StructuredRecord::from_map(map));
    }

    let candidate = candidate_object(defenced)?;
    if let Some(map) = parse_object(&candidate) {
        return Some(StructuredRecord::from_map(map));
    }

    parse_object(&repair(&candidate)).map(StructuredRecord::from_map)
}

fn parse_object(s: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// If the text contains a markdown code fence, return the fenced body.
fn strip_code_fences(s: &str) -> &str {
    let Some(open) = s.find("```") else {
        return s;
    };
    // Skip the fence line itself (```json, ``` etc.)
    let after_fence = &s[open + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];

    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// Slice out the first balanced top-level object, string-aware.
///
/// Drops surrounding prose. If the object never closes (output cut off at
/// the token limit), returns everything from the opening brace; the repair
/// pass closes it.
fn candidate_object(s: &str) -> Option<String> {
    let start = s.find('{')?;
    let bytes = &s[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in bytes.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(bytes[..i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    Some(bytes.to_string())
}

/// One-pass textual repair of common model JSON mistakes:
/// single-quoted strings, bare (unquoted) keys and values, Python/JS
/// literals, trailing commas, and unterminated strings/objects.
fn repair(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut chars = input.chars().peekable();
    // Closing delimiters still owed at end of input
    let mut open: Vec<char> = Vec::new();
    // A comma is held back until we know it isn't trailing
    let mut pending_comma = false;

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                flush_comma(&mut out, &mut pending_comma);
                copy_string(&mut out, &mut chars, c);
            }
            '{' => {
                flush_comma(&mut out, &mut pending_comma);
                open.push('}');
                out.push(c);
            }
            '[' => {
                flush_comma(&mut out, &mut pending_comma);
                open.push(']');
                out.push(c);
            }
            '}' | ']' => {
                pending_comma = false;
                if open.last() == Some(&c) {
                    open.pop();
                }
                out.push(c);
            }
            ',' => pending_comma = true,
            ':' => out.push(c),
            c if c.is_whitespace() => {
                if !pending_comma {
                    out.push(c);
                }
            }
            c if c.is_ascii_digit() || c == '-' => {
                flush_comma(&mut out, &mut pending_comma);
                out.push(c);
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_digit() || matches!(n, '.' | 'e' | 'E' | '+' | '-') {
                        out.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                flush_comma(&mut out, &mut pending_comma);
                let mut word = String::new();
                word.push(c);
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' {
                        word.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&normalize_word(&word));
            }
            // Anything else outside a string is noise
            _ => {}
        }
    }

    for closer in open.iter().rev() {
        out.push(*closer);
    }
    out
}

fn flush_comma(out: &mut String, pending: &mut bool) {
    if *pending {
        out.push(',');
        *pending = false;
    }
}

/// Copy a string literal, converting single-quote delimiters to double
/// quotes and closing it if the input ends mid-string.
fn copy_string(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    delim: char,
) {
    out.push('"');
    let mut escaped = false;
    for c in chars.by_ref() {
        if escaped {
            if c == '\'' {
                // \' is not a JSON escape; drop the backslash
                out.pop();
            }
            out.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                escaped = true;
            }
            c if c == delim => {
                out.push('"');
                return;
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    // Input ended inside the string
    out.push('"');
}

/// Map bare words to JSON literals; anything else becomes a quoted string
/// (covers unquoted keys and unquoted text values alike).
fn normalize_word(word: &str) -> String {
    match word {
        "true" | "True" => "true".into(),
        "false" | "False" => "false".into(),
        "null" | "None" | "NaN" | "undefined" => "null".into(),
        other => format!("\"{other}\""),
    }
}
