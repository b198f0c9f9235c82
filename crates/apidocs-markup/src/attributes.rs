//! Tag attribute list parsing.
//!
//! Parses the inside of `{% name ... %}` after the name:
//!
//! - `key="value"` / `key='value'` - string (`\` escapes the next character)
//! - `key=true`, `key=3`, `key=word` - boolean, integer, or bare string
//! - `key` - boolean flag set to `true`
//! - `#id` / `.class` - shorthand for `id` and `class` (classes accumulate)

use crate::error::MarkupError;
use crate::node::{AttrValue, Attributes};

/// Parse an attribute list.
///
/// `line` is only used for error reporting.
pub(crate) fn parse_attributes(input: &str, line: usize) -> Result<Attributes, MarkupError> {
    let mut attrs = Attributes::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let (word, tail) = split_word(after);
            if word.is_empty() {
                return Err(error(line, "empty `#` id shorthand".to_owned()));
            }
            attrs.insert("id".to_owned(), AttrValue::from(word));
            rest = tail;
        } else if let Some(after) = rest.strip_prefix('.') {
            let (word, tail) = split_word(after);
            if word.is_empty() {
                return Err(error(line, "empty `.` class shorthand".to_owned()));
            }
            match attrs.get_mut("class") {
                Some(AttrValue::String(classes)) => {
                    classes.push(' ');
                    classes.push_str(word);
                }
                _ => {
                    attrs.insert("class".to_owned(), AttrValue::from(word));
                }
            }
            rest = tail;
        } else {
            let key_len = rest.find(|c: char| !is_key_char(c)).unwrap_or(rest.len());
            if key_len == 0 {
                let unexpected = rest.chars().next().unwrap_or_default();
                return Err(error(
                    line,
                    format!("unexpected character `{unexpected}` in attributes"),
                ));
            }
            let (key, tail) = rest.split_at(key_len);
            if let Some(value_src) = tail.strip_prefix('=') {
                let (value, tail) = parse_value(value_src, key, line)?;
                attrs.insert(key.to_owned(), value);
                rest = tail;
            } else {
                attrs.insert(key.to_owned(), AttrValue::Bool(true));
                rest = tail;
            }
        }

        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return Err(error(
                line,
                format!("expected whitespace between attributes, found `{rest}`"),
            ));
        }
        rest = rest.trim_start();
    }

    Ok(attrs)
}

fn parse_value<'a>(
    src: &'a str,
    key: &str,
    line: usize,
) -> Result<(AttrValue, &'a str), MarkupError> {
    let Some(quote) = src.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        let (word, tail) = split_word(src);
        if word.is_empty() {
            return Err(error(line, format!("missing value for attribute `{key}`")));
        }
        return Ok((bare_value(word), tail));
    };

    let mut value = String::new();
    let mut chars = src.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            if let Some((_, escaped)) = chars.next() {
                value.push(escaped);
            }
        } else if c == quote {
            return Ok((AttrValue::String(value), &src[i + c.len_utf8()..]));
        } else {
            value.push(c);
        }
    }

    Err(error(
        line,
        format!("unterminated string for attribute `{key}`"),
    ))
}

fn bare_value(word: &str) -> AttrValue {
    match word {
        "true" => AttrValue::Bool(true),
        "false" => AttrValue::Bool(false),
        _ => word
            .parse::<i64>()
            .map_or_else(|_| AttrValue::from(word), AttrValue::Integer),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    s.split_at(end)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn error(line: usize, message: String) -> MarkupError {
    MarkupError::Attribute { line, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Attributes {
        parse_attributes(input, 1).unwrap()
    }

    #[test]
    fn test_empty() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn test_quoted_strings() {
        let attrs = parse(r#"label="cURL" title='Create an invoice'"#);
        assert_eq!(attrs["label"], AttrValue::from("cURL"));
        assert_eq!(attrs["title"], AttrValue::from("Create an invoice"));
    }

    #[test]
    fn test_escaped_quote() {
        let attrs = parse(r#"label="Say \"hi\"""#);
        assert_eq!(attrs["label"], AttrValue::from(r#"Say "hi""#));
    }

    #[test]
    fn test_typed_bare_values() {
        let attrs = parse("open=true closed=false depth=3 type=warning");
        assert_eq!(attrs["open"], AttrValue::Bool(true));
        assert_eq!(attrs["closed"], AttrValue::Bool(false));
        assert_eq!(attrs["depth"], AttrValue::Integer(3));
        assert_eq!(attrs["type"], AttrValue::from("warning"));
    }

    #[test]
    fn test_quoted_number_stays_string() {
        let attrs = parse(r#"version="2""#);
        assert_eq!(attrs["version"], AttrValue::from("2"));
    }

    #[test]
    fn test_flag() {
        let attrs = parse("collapsible label=\"x\"");
        assert_eq!(attrs["collapsible"], AttrValue::Bool(true));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_id_and_classes() {
        let attrs = parse("#intro .wide .muted");
        assert_eq!(attrs["id"], AttrValue::from("intro"));
        assert_eq!(attrs["class"], AttrValue::from("wide muted"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_attributes(r#"label="oops"#, 7).unwrap_err();
        assert!(matches!(err, MarkupError::Attribute { line: 7, .. }));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_missing_value() {
        let err = parse_attributes("label= other", 2).unwrap_err();
        assert!(err.to_string().contains("missing value"));
    }

    #[test]
    fn test_garbage_after_quoted_value() {
        let err = parse_attributes(r#"label="a"b"#, 1).unwrap_err();
        assert!(err.to_string().contains("expected whitespace"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse_attributes("=x", 1).unwrap_err();
        assert!(err.to_string().contains("unexpected character `=`"));
    }
}
