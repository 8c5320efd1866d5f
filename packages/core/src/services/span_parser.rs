//! Rich-Text Span Resolution
//!
//! Property values arrive in the service's compact span encoding:
//!
//! ```text
//! [
//!   ["Hello, "],
//!   ["world", [["b"], ["a", "https://example.com"]]]
//! ]
//! ```
//!
//! Each span is `[text]` or `[text, [attribute, ...]]`; each attribute is
//! `[code]` or `[code, value]`.
//!
//! The resolver is a trait so callers can substitute their own;
//! `NotionSpanParser` is the default implementation.

use serde_json::Value;

use crate::models::{TextAttr, TextSpan};
use crate::services::SpanParseError;

/// Turns a raw property value into an ordered span sequence
pub trait SpanResolver: Send + Sync {
    /// Parse `raw` into spans, failing on structurally invalid input
    fn parse_spans(&self, raw: &Value) -> Result<Vec<TextSpan>, SpanParseError>;
}

/// Default resolver for the service's span encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct NotionSpanParser;

impl SpanResolver for NotionSpanParser {
    fn parse_spans(&self, raw: &Value) -> Result<Vec<TextSpan>, SpanParseError> {
        let spans = raw.as_array().ok_or(SpanParseError::NotAnArray {
            found: json_kind(raw),
        })?;

        spans
            .iter()
            .enumerate()
            .map(|(index, span)| parse_span(index, span))
            .collect()
    }
}

fn parse_span(index: usize, raw: &Value) -> Result<TextSpan, SpanParseError> {
    let parts = raw.as_array().ok_or_else(|| {
        SpanParseError::invalid_span(index, format!("expected array, got {}", json_kind(raw)))
    })?;

    let text = match parts.first() {
        Some(Value::String(text)) => text.clone(),
        Some(other) => {
            return Err(SpanParseError::invalid_span(
                index,
                format!("text must be a string, got {}", json_kind(other)),
            ))
        }
        None => return Err(SpanParseError::invalid_span(index, "span is empty")),
    };

    let attrs = match parts.get(1) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(attrs)) => attrs
            .iter()
            .enumerate()
            .map(|(attr_index, attr)| parse_attr(index, attr_index, attr))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(SpanParseError::invalid_span(
                index,
                format!("attributes must be an array, got {}", json_kind(other)),
            ))
        }
    };

    Ok(TextSpan { text, attrs })
}

fn parse_attr(span: usize, index: usize, raw: &Value) -> Result<TextAttr, SpanParseError> {
    let parts = raw.as_array().ok_or_else(|| {
        SpanParseError::invalid_attribute(
            span,
            index,
            format!("expected array, got {}", json_kind(raw)),
        )
    })?;

    let code = match parts.first() {
        Some(Value::String(code)) => code.as_str(),
        Some(other) => {
            return Err(SpanParseError::invalid_attribute(
                span,
                index,
                format!("code must be a string, got {}", json_kind(other)),
            ))
        }
        None => {
            return Err(SpanParseError::invalid_attribute(
                span,
                index,
                "attribute is empty",
            ))
        }
    };
    let value = parts.get(1);

    // Valued attributes whose value is a plain string
    let string_value = || -> Result<String, SpanParseError> {
        match value {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(SpanParseError::invalid_attribute(
                span,
                index,
                format!("'{}' value must be a string, got {}", code, json_kind(other)),
            )),
            None => Err(SpanParseError::invalid_attribute(
                span,
                index,
                format!("'{}' requires a value", code),
            )),
        }
    };

    let attr = match code {
        "b" => TextAttr::Bold,
        "i" => TextAttr::Italic,
        "s" => TextAttr::Strikethrough,
        "c" => TextAttr::Code,
        "_" => TextAttr::Underline,
        "a" => TextAttr::Link(string_value()?),
        "u" => TextAttr::User(string_value()?),
        "p" => TextAttr::Page(string_value()?),
        "h" => TextAttr::Highlight(string_value()?),
        "m" => TextAttr::Comment(string_value()?),
        "e" => TextAttr::Equation(string_value()?),
        "d" => match value {
            Some(date @ Value::Object(_)) => TextAttr::Date(date.clone()),
            Some(other) => {
                return Err(SpanParseError::invalid_attribute(
                    span,
                    index,
                    format!("'d' value must be an object, got {}", json_kind(other)),
                ))
            }
            None => {
                return Err(SpanParseError::invalid_attribute(
                    span,
                    index,
                    "'d' requires a value",
                ))
            }
        },
        other => TextAttr::Unknown {
            code: other.to_string(),
            value: value.cloned(),
        },
    };
    Ok(attr)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: Value) -> Result<Vec<TextSpan>, SpanParseError> {
        NotionSpanParser.parse_spans(&raw)
    }

    #[test]
    fn test_plain_spans() {
        let spans = parse(json!([["Hello, "], ["world"]])).unwrap();
        assert_eq!(spans, vec![TextSpan::new("Hello, "), TextSpan::new("world")]);
    }

    #[test]
    fn test_empty_array_is_no_spans() {
        assert!(parse(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_attributes() {
        let spans = parse(json!([
            ["styled", [["b"], ["i"], ["s"], ["c"], ["_"], ["h", "red"]]],
            ["link", [["a", "https://example.com"]]],
            ["‣", [["u", "user-1"]]],
            ["‣", [["p", "page-1"]]],
            ["‣", [["d", {"type": "date", "start_date": "2021-01-01"}]]],
            ["note", [["m", "discussion-1"]]],
            ["⁍", [["e", "x^2"]]]
        ]))
        .unwrap();

        assert_eq!(
            spans[0].attrs,
            vec![
                TextAttr::Bold,
                TextAttr::Italic,
                TextAttr::Strikethrough,
                TextAttr::Code,
                TextAttr::Underline,
                TextAttr::Highlight("red".into()),
            ]
        );
        assert_eq!(spans[1].link(), Some("https://example.com"));
        assert_eq!(spans[2].attrs, vec![TextAttr::User("user-1".into())]);
        assert_eq!(spans[3].attrs, vec![TextAttr::Page("page-1".into())]);
        assert_eq!(
            spans[4].attrs,
            vec![TextAttr::Date(json!({"type": "date", "start_date": "2021-01-01"}))]
        );
        assert_eq!(spans[5].attrs, vec![TextAttr::Comment("discussion-1".into())]);
        assert_eq!(spans[6].attrs, vec![TextAttr::Equation("x^2".into())]);
    }

    #[test]
    fn test_unknown_attribute_is_kept() {
        let spans = parse(json!([["x", [["z", 42]]]])).unwrap();
        assert_eq!(
            spans[0].attrs,
            vec![TextAttr::Unknown {
                code: "z".into(),
                value: Some(json!(42)),
            }]
        );
    }

    #[test]
    fn test_not_an_array() {
        assert_eq!(
            parse(json!("Yes")),
            Err(SpanParseError::NotAnArray { found: "string" })
        );
        assert_eq!(
            parse(json!(null)),
            Err(SpanParseError::NotAnArray { found: "null" })
        );
    }

    #[test]
    fn test_invalid_spans() {
        assert!(matches!(
            parse(json!([["ok"], "bad"])),
            Err(SpanParseError::InvalidSpan { index: 1, .. })
        ));
        assert!(matches!(
            parse(json!([[]])),
            Err(SpanParseError::InvalidSpan { index: 0, .. })
        ));
        assert!(matches!(
            parse(json!([[7]])),
            Err(SpanParseError::InvalidSpan { index: 0, .. })
        ));
        assert!(matches!(
            parse(json!([["x", "b"]])),
            Err(SpanParseError::InvalidSpan { index: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_attributes() {
        assert!(matches!(
            parse(json!([["x", [["a"]]]])),
            Err(SpanParseError::InvalidAttribute { span: 0, attr: 0, .. })
        ));
        assert!(matches!(
            parse(json!([["x"], ["y", [["b"], [1]]]])),
            Err(SpanParseError::InvalidAttribute { span: 1, attr: 1, .. })
        ));
        assert!(matches!(
            parse(json!([["x", [["d", "2021-01-01"]]]])),
            Err(SpanParseError::InvalidAttribute { span: 0, attr: 0, .. })
        ));
    }
}
