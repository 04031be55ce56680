//! Pattern grammar.
//!
//! A pattern string is split on single spaces into raw elements. Each raw
//! element becomes one [`Element`]:
//!
//! ```text
//! say          → Token("say")        literal word, must equal the input word
//! {text}       → Value("text")       captures the input word (or the rest of the line)
//! {text?}      → Value("text", opt)  like Value, but may be absent from the input
//! ```
//!
//! There is no escaping and no nesting. Keys must be unique within a pattern.

use std::collections::HashSet;
use std::fmt;

use tracing::trace;

use crate::error::{CompileError, CompileResult};

/// The two kinds of pattern element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A literal word compared for equality against the input.
    Token,
    /// A named capture.
    Value,
}

impl ElementKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Value => "value",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One position in a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    key: String,
    kind: ElementKind,
    optional: bool,
}

impl Element {
    /// Creates a token element matching `word` literally.
    pub fn token(word: impl Into<String>) -> Self {
        Self {
            key: word.into(),
            kind: ElementKind::Token,
            optional: false,
        }
    }

    /// Creates a value element capturing under `key`.
    pub fn value(key: impl Into<String>, optional: bool) -> Self {
        Self {
            key: key.into(),
            kind: ElementKind::Value,
            optional,
        }
    }

    /// The element key. For tokens this is the literal word.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The element kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Whether the element may be absent from the input. Always `false` for tokens.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns `true` for token elements.
    pub fn is_token(&self) -> bool {
        self.kind == ElementKind::Token
    }

    /// Returns `true` for value elements.
    pub fn is_value(&self) -> bool {
        self.kind == ElementKind::Value
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.optional) {
            (ElementKind::Token, _) => f.write_str(&self.key),
            (ElementKind::Value, false) => write!(f, "{{{}}}", self.key),
            (ElementKind::Value, true) => write!(f, "{{{}?}}", self.key),
        }
    }
}

/// Parses a full pattern string into its ordered elements.
///
/// Fails on the first malformed element, or when a key repeats.
pub fn parse_elements(source: &str) -> CompileResult<Vec<Element>> {
    let mut elements = Vec::new();
    let mut keys = HashSet::new();

    for (position, raw) in source.split(' ').enumerate() {
        let element = parse_element(raw, position)?;
        if !keys.insert(element.key.clone()) {
            return Err(CompileError::duplicate_key(element.key));
        }
        elements.push(element);
    }

    trace!(pattern = source, elements = elements.len(), "Parsed pattern");
    Ok(elements)
}

/// Parses one raw element found at `position` in the pattern.
pub fn parse_element(raw: &str, position: usize) -> CompileResult<Element> {
    if raw.is_empty() {
        return Err(CompileError::EmptyElement { position });
    }

    if let Some(rest) = raw.strip_prefix('{') {
        let inner = rest
            .strip_suffix('}')
            .ok_or_else(|| CompileError::missing_closing_bracket(raw))?;

        let (key, optional) = match inner.strip_suffix('?') {
            Some(key) => (key, true),
            None => (inner, false),
        };

        if key.is_empty() {
            return Err(CompileError::missing_key_name(raw));
        }
        return Ok(Element::value(key, optional));
    }

    if raw.ends_with('}') {
        return Err(CompileError::missing_opening_bracket(raw));
    }

    Ok(Element::token(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_and_value() {
        let elements = parse_elements("say {text}").unwrap();
        assert_eq!(
            elements,
            vec![Element::token("say"), Element::value("text", false)]
        );
        assert!(elements[0].is_token());
        assert!(elements[1].is_value());
        assert!(!elements[1].is_optional());
    }

    #[test]
    fn test_parse_optional_value() {
        let elements = parse_elements("say {text?}").unwrap();
        assert_eq!(elements[1].key(), "text");
        assert_eq!(elements[1].kind(), ElementKind::Value);
        assert!(elements[1].is_optional());
    }

    #[test]
    fn test_parse_only_tokens() {
        let elements = parse_elements("hi lol").unwrap();
        assert_eq!(elements, vec![Element::token("hi"), Element::token("lol")]);
    }

    #[test]
    fn test_missing_key_name() {
        assert_eq!(
            parse_elements("{}"),
            Err(CompileError::missing_key_name("{}"))
        );
        assert_eq!(
            parse_elements("say {?}"),
            Err(CompileError::missing_key_name("{?}"))
        );
    }

    #[test]
    fn test_missing_closing_bracket() {
        assert_eq!(
            parse_elements("{text"),
            Err(CompileError::missing_closing_bracket("{text"))
        );
        assert!(matches!(
            parse_elements("{"),
            Err(CompileError::MissingClosingBracket { .. })
        ));
    }

    #[test]
    fn test_missing_opening_bracket() {
        assert_eq!(
            parse_elements("text}"),
            Err(CompileError::missing_opening_bracket("text}"))
        );
        assert!(matches!(
            parse_elements("}"),
            Err(CompileError::MissingOpeningBracket { .. })
        ));
    }

    #[test]
    fn test_duplicate_key() {
        assert_eq!(
            parse_elements("{a} {a}"),
            Err(CompileError::duplicate_key("a"))
        );
        // A token and a value share the key namespace.
        assert_eq!(
            parse_elements("a {a}"),
            Err(CompileError::duplicate_key("a"))
        );
    }

    #[test]
    fn test_empty_elements_rejected() {
        assert_eq!(
            parse_elements(""),
            Err(CompileError::EmptyElement { position: 0 })
        );
        assert_eq!(
            parse_elements("say  {text}"),
            Err(CompileError::EmptyElement { position: 1 })
        );
    }

    #[test]
    fn test_array_syntax_is_a_plain_key() {
        let elements = parse_elements("say {[3]a}").unwrap();
        assert_eq!(elements[1], Element::value("[3]a", false));
    }

    #[test]
    fn test_display_round_trips_source() {
        for source in ["say {text}", "say {text?}", "hi lol"] {
            let rendered: Vec<String> = parse_elements(source)
                .unwrap()
                .iter()
                .map(ToString::to_string)
                .collect();
            assert_eq!(rendered.join(" "), source);
        }
    }
}
