//! Keyword recovery from host-templated search SQL.
//!
//! The host renders each search keyword into its free-text clause as a `LIKE`
//! literal, wrapped either in percent signs (`'%term%'`) or in a brace-delimited
//! placeholder that stands in for the percent sign (`'{a1b2}term{a1b2}'`). The
//! scanner walks every string literal in the fragment, decodes it with the
//! string rules of the store's dialect, and keeps the ones that carry a marker
//! of the same kind on both ends.

use std::{iter::Peekable, str::CharIndices};

use crate::{Dialect, error::ScanError};

/// Extracts the distinct search keywords from a templated SQL fragment.
///
/// Keywords are returned in first-seen order. A fragment without marked
/// literals yields an empty list. Backslashes inside literals are string
/// escapes only for [`Dialect::MySql`]; SQLite keeps them verbatim, so they
/// reach the `LIKE` unescaping stage untouched.
pub fn extract_keywords(fragment: &str, dialect: Dialect) -> Result<Vec<String>, ScanError> {
    let literals = Scanner::new(fragment, dialect).literals()?;

    let mut keywords: Vec<String> = Vec::new();
    for literal in literals {
        let Some(keyword) = unwrap_markers(&literal) else {
            continue;
        };
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    Ok(keywords)
}

/// Walks a SQL fragment collecting decoded string literals.
struct Scanner<'a> {
    /// The original fragment.
    input: &'a str,
    /// String-literal rules.
    dialect: Dialect,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given fragment.
    fn new(input: &'a str, dialect: Dialect) -> Self {
        Self {
            input,
            dialect,
            chars: input.char_indices().peekable(),
        }
    }

    /// Returns every string literal in the fragment, decoded.
    fn literals(mut self) -> Result<Vec<String>, ScanError> {
        let mut literals = Vec::new();
        while let Some((pos, ch)) = self.chars.next() {
            if ch == '\'' {
                literals.push(self.read_literal(pos)?);
            }
        }
        Ok(literals)
    }

    /// Reads a literal whose opening quote sat at `start`.
    ///
    /// `''` decodes to a quote. Under MySQL rules `\'` does too, and backslash
    /// sequences that are `LIKE` escapes (`\%`, `\_`) keep their backslash for
    /// the marker stage.
    fn read_literal(&mut self, start: usize) -> Result<String, ScanError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '\'')) => {
                    if self.chars.next_if(|&(_, c)| c == '\'').is_some() {
                        value.push('\'');
                    } else {
                        return Ok(value);
                    }
                }
                Some((_, '\\')) if self.dialect == Dialect::MySql => match self.chars.next() {
                    Some((_, c @ ('%' | '_'))) => {
                        value.push('\\');
                        value.push(c);
                    }
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, c)) => value.push(c),
                    None => break,
                },
                Some((_, c)) => value.push(c),
                None => break,
            }
        }
        Err(ScanError::new(
            "unterminated string literal",
            start,
            self.input,
        ))
    }
}

/// Strips matching markers from a decoded literal, returning the keyword.
fn unwrap_markers(literal: &str) -> Option<String> {
    if literal.starts_with('{') {
        return unwrap_placeholder(literal);
    }
    let inner = literal.strip_prefix('%')?.strip_suffix('%')?;
    if ends_with_escape(inner) {
        return None;
    }
    Some(unescape_like(inner))
}

/// Handles the `{placeholder}keyword{placeholder}` form.
fn unwrap_placeholder(literal: &str) -> Option<String> {
    let close = literal.find('}')?;
    let placeholder = &literal[..=close];
    let name = &placeholder[1..close];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    if literal.len() < placeholder.len() * 2 {
        return None;
    }
    let inner = literal
        .strip_prefix(placeholder)?
        .strip_suffix(placeholder)?;
    Some(unescape_like(&inner.replace(placeholder, "%")))
}

/// Returns true if the text ends in an odd run of backslashes.
fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Undoes backslash `LIKE` escaping.
fn unescape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}
