//! Free-text search tokenizer.
//!
//! Splits a search string on whitespace while keeping double-quoted phrases
//! together. Quoted tokens keep their quotes and request an exact match;
//! bare words request a substring match. The words `AND` and `OR`
//! (any case) between two terms become the connective of the term that
//! follows them.
//!
//! Malformed connectives never fail the search. A connective with no term
//! before or after it is dropped, and when several connectives appear in a
//! row only the last one is kept. Each case is logged at `warn`.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref TOKEN_PATTERN: Regex =
        Regex::new(r#""[^"]*"|\S+"#).expect("token pattern is a valid regex");
}

/// Boolean operator linking a term to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    fn parse(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("AND") {
            Some(Self::And)
        } else if word.eq_ignore_ascii_case("OR") {
            Some(Self::Or)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Quoted term, compared with equality.
    Full,
    /// Bare term, compared with substring containment.
    Partial,
}

/// One search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Term exactly as written, quotes included.
    pub raw: String,
    pub mode: MatchMode,
    /// `None` for the first term and for terms written next to each other.
    pub connective: Option<Connective>,
}

impl Token {
    fn new(raw: &str, connective: Option<Connective>) -> Self {
        let mode = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            MatchMode::Full
        } else {
            MatchMode::Partial
        };
        Self {
            raw: raw.to_string(),
            mode,
            connective,
        }
    }

    /// Literal to match against, with the surrounding quotes of a full-match
    /// term stripped.
    pub fn term(&self) -> &str {
        match self.mode {
            MatchMode::Full => &self.raw[1..self.raw.len() - 1],
            MatchMode::Partial => &self.raw,
        }
    }

    pub fn is_full_match(&self) -> bool {
        self.mode == MatchMode::Full
    }
}

/// Tokenize a search string. Empty or blank input yields no tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut pending: Option<Connective> = None;

    for m in TOKEN_PATTERN.find_iter(input) {
        let raw = m.as_str();

        if let Some(connective) = Connective::parse(raw) {
            if tokens.is_empty() {
                tracing::warn!(
                    connective = %connective,
                    "Malformed search query: connective without a preceding term ignored"
                );
                continue;
            }
            if let Some(previous) = pending.replace(connective) {
                tracing::warn!(
                    dropped = %previous,
                    kept = %connective,
                    "Malformed search query: consecutive connectives"
                );
            }
            continue;
        }

        let token = Token::new(raw, pending);
        if token.term().is_empty() {
            tracing::debug!("Skipping empty quoted search term");
            continue;
        }
        pending = None;
        tokens.push(token);
    }

    if let Some(connective) = pending {
        tracing::warn!(
            connective = %connective,
            "Malformed search query: trailing connective ignored"
        );
    }

    tokens
}

/// Render tokens back into a search string that tokenizes to the same tokens.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        if let Some(connective) = token.connective {
            out.push_str(connective.as_str());
            out.push(' ');
        }
        out.push_str(&token.raw);
    }
    out
}
