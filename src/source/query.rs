//! Operator list parsing
//!
//! `git://host/repo.git?branch=next?pull` carries two operators, applied in
//! order. They are separated by `?`; `&` is accepted as well. A key may
//! repeat.

/// One `key` or `key=value` token from a reference's operator list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    raw: String,
    parts: Vec<String>,
}

impl Operator {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parts: raw.split('=').map(str::to_string).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.parts[0]
    }

    /// The token exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The value of a `key=value` token; `None` for a bare key or for a token
    /// with more than one `=`.
    pub fn value(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [_, value] => Some(value),
            _ => None,
        }
    }

    /// Whether the token is a bare key.
    pub fn is_flag(&self) -> bool {
        self.parts.len() == 1
    }
}

/// Split a reference into its base and its ordered operators.
///
/// Empty tokens (`??`, a trailing `?`) are dropped.
pub fn split(reference: &str) -> (&str, Vec<Operator>) {
    let mut tokens = reference.split('?');
    let base = tokens.next().unwrap_or(reference);
    let operators = tokens
        .flat_map(|t| t.split('&'))
        .filter(|t| !t.is_empty())
        .map(Operator::parse)
        .collect();
    (base, operators)
}
