//! Braid word tokenizer.
//!
//! A braid word is a whitespace-separated list of generator tokens:
//!
//! ```text
//! token     := "s" index [ "^-1" ]
//! index     := [1-9][0-9]*
//! ```
//!
//! Token order is braid composition order and is preserved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BraidError, BraidResult};

/// Suffix marking an inverse generator.
const INVERSE_SUFFIX: &str = "^-1";

/// A single braid generator occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BraidToken {
    /// Generator index, always `>= 1`.
    pub generator: u32,
    /// Whether this is the inverse crossing.
    pub inverse: bool,
}

impl BraidToken {
    /// A positive crossing `sN`.
    pub fn new(generator: u32) -> Self {
        Self {
            generator,
            inverse: false,
        }
    }

    /// An inverse crossing `sN^-1`.
    pub fn inverse(generator: u32) -> Self {
        Self {
            generator,
            inverse: true,
        }
    }

    /// Signed crossing contribution to the writhe.
    #[inline]
    pub fn sign(&self) -> i64 {
        if self.inverse { -1 } else { 1 }
    }

    /// Parse one token, reporting it verbatim on failure.
    fn parse_token(raw: &str) -> BraidResult<Self> {
        let grammar_error = || BraidError::Grammar {
            token: raw.to_string(),
        };

        let body = raw.strip_prefix('s').ok_or_else(grammar_error)?;
        let (digits, inverse) = match body.strip_suffix(INVERSE_SUFFIX) {
            Some(digits) => (digits, true),
            None => (body, false),
        };

        let mut chars = digits.chars();
        match chars.next() {
            Some('1'..='9') => {}
            _ => return Err(grammar_error()),
        }
        if !chars.all(|c| c.is_ascii_digit()) {
            return Err(grammar_error());
        }

        let generator = digits.parse::<u32>().map_err(|_| grammar_error())?;
        Ok(Self { generator, inverse })
    }
}

impl fmt::Display for BraidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "s{}{INVERSE_SUFFIX}", self.generator)
        } else {
            write!(f, "s{}", self.generator)
        }
    }
}

/// An ordered braid word.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedBraid(Vec<BraidToken>);

impl ParsedBraid {
    /// Build from tokens directly.
    pub fn from_tokens(tokens: Vec<BraidToken>) -> Self {
        Self(tokens)
    }

    /// The tokens in composition order.
    pub fn tokens(&self) -> &[BraidToken] {
        &self.0
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the word has no tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, BraidToken> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ParsedBraid {
    type Item = &'a BraidToken;
    type IntoIter = std::slice::Iter<'a, BraidToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ParsedBraid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

impl FromStr for ParsedBraid {
    type Err = BraidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_braid_word(s)
    }
}

/// Parse a braid word into tokens.
///
/// Fails with [`BraidError::EmptyInput`] on blank input and with
/// [`BraidError::Grammar`] naming the first malformed token.
pub fn parse_braid_word(braid_word: &str) -> BraidResult<ParsedBraid> {
    if braid_word.trim().is_empty() {
        return Err(BraidError::EmptyInput);
    }

    braid_word
        .split_whitespace()
        .map(BraidToken::parse_token)
        .collect::<BraidResult<Vec<_>>>()
        .map(ParsedBraid)
}
