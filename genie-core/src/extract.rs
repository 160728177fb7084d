//! Tolerant extraction of a JSON object from free-form model output.
//!
//! Models are asked for "JSON only" but routinely wrap the object in a
//! markdown code fence or surround it with a sentence of prose. This module
//! finds the object without guessing at string offsets: it skips past a fence
//! opener if one is present, then scans for the first balanced `{ ... }` while
//! keeping track of string literals and escapes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No JSON object found in response")]
    NoJson,

    #[error("JSON object starting at byte {0} is never closed")]
    Unbalanced(usize),
}

/// Return the slice of `text` holding the first complete JSON object.
///
/// Fenced content wins over the surrounding text. When nothing after the
/// fence opens an object the whole reply is searched instead.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractError> {
    if let Some(body_start) = fence_body_start(text) {
        match find_object(text, body_start) {
            Err(ExtractError::NoJson) => {}
            other => return other,
        }
    }
    find_object(text, 0)
}

/// Byte offset just past the first markdown fence and its info string.
///
/// The closing fence is never searched for: the object scanner stops at the
/// matching brace, so a fence marker inside a string value cannot cut it short.
fn fence_body_start(text: &str) -> Option<usize> {
    let open = text.find("```")? + 3;
    let info_len = text[open..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(text.len() - open);
    Some(open + info_len)
}

fn find_object(text: &str, from: usize) -> Result<&str, ExtractError> {
    let start = from + text[from..].find('{').ok_or(ExtractError::NoJson)?;
    let candidate = &text[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in candidate.char_indices() {
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
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&candidate[..=i]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unbalanced(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        let text = r#"{"dish_name": "Dosa"}"#;
        assert_eq!(extract_json_object(text).unwrap(), text);
    }

    #[test]
    fn test_json_fence() {
        let text = "```json\n{\"dish_name\": \"Dosa\"}\n```";
        assert_eq!(extract_json_object(text).unwrap(), r#"{"dish_name": "Dosa"}"#);
    }

    #[test]
    fn test_plain_fence_without_language() {
        let text = "```\n{\"a\": 1}\n```\n";
        assert_eq!(extract_json_object(text).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_surrounding_prose() {
        let text = "Sure! Here is the dish:\n{\"a\": {\"b\": 2}}\nEnjoy your meal.";
        assert_eq!(extract_json_object(text).unwrap(), r#"{"a": {"b": 2}}"#);
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"{"note": "use {curly} braces and a \"quoted\" }", "n": 1} trailing"#;
        assert_eq!(
            extract_json_object(text).unwrap(),
            r#"{"note": "use {curly} braces and a \"quoted\" }", "n": 1}"#
        );
    }

    #[test]
    fn test_fence_marker_inside_fenced_string() {
        let text = "```json\n{\"tip\": \"wrap code in ``` fences\", \"n\": 1}\n```";
        assert_eq!(
            extract_json_object(text).unwrap(),
            r#"{"tip": "wrap code in ``` fences", "n": 1}"#
        );
    }

    #[test]
    fn test_unbalanced_offset_is_absolute() {
        let text = "Here:\n```json\n{\"a\": [1, 2]";
        assert_eq!(extract_json_object(text), Err(ExtractError::Unbalanced(14)));
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "```json\n{\"a\": [1, 2]}";
        assert_eq!(extract_json_object(text).unwrap(), r#"{"a": [1, 2]}"#);
    }

    #[test]
    fn test_fence_without_object_falls_back_to_text() {
        let text = "```text\nno json here\n```\n{\"a\": 1}";
        assert_eq!(extract_json_object(text).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_no_json() {
        assert_eq!(
            extract_json_object("I could not identify this dish."),
            Err(ExtractError::NoJson)
        );
        assert_eq!(extract_json_object(""), Err(ExtractError::NoJson));
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(
            extract_json_object(r#"result: {"a": {"b": 1}"#),
            Err(ExtractError::Unbalanced(8))
        );
    }

    #[test]
    fn test_multibyte_text() {
        let text = "பதில்: {\"name\": \"இட்லி\"} முடிந்தது";
        assert_eq!(extract_json_object(text).unwrap(), "{\"name\": \"இட்லி\"}");
    }
}
