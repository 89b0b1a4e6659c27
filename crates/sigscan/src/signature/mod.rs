//! Byte signatures with wildcards
//!
//! A [`Signature`] is compiled once from text and then matched read-only
//! against any number of memory windows. Two textual encodings produce the
//! same token stream:
//!
//! - IDA style: `"48 8D 0D ?? ?? ?? ?? E8"` (compact `"488D0D????"` and single
//!   `?` wildcards are accepted too)
//! - code style: a raw byte array plus a mask such as `"xxx????x"`

mod mask;
mod parse;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One position of a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// The memory byte must equal this value
    Byte(u8),
    /// Any byte matches
    Wildcard,
}

impl Token {
    #[inline]
    pub fn matches(self, byte: u8) -> bool {
        match self {
            Token::Byte(value) => value == byte,
            Token::Wildcard => true,
        }
    }

    pub fn value(self) -> Option<u8> {
        match self {
            Token::Byte(value) => Some(value),
            Token::Wildcard => None,
        }
    }
}

/// A compiled, non-empty byte pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    tokens: Vec<Token>,
}

impl Signature {
    /// Compile an IDA-style signature string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSignature`] for empty input, characters other
    /// than hex digits, `?` and whitespace, or a group with an odd number of
    /// digits.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_tokens(parse::parse_tokens(text)?)
    }

    /// Compile a byte array with a parallel `x`/`?` mask.
    pub fn from_bytes_and_mask(bytes: &[u8], mask: &str) -> Result<Self> {
        Self::from_tokens(mask::tokens_from_mask(bytes, mask)?)
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::MalformedSignature(
                "signature has no tokens".to_string(),
            ));
        }
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of bytes a matching window spans
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; compilation rejects empty signatures.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of exact (non-wildcard) bytes
    pub fn exact_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, Token::Byte(_)))
            .count()
    }

    /// Position and value of the first exact byte, if any
    pub fn anchor(&self) -> Option<(usize, u8)> {
        self.tokens
            .iter()
            .enumerate()
            .find_map(|(index, token)| token.value().map(|value| (index, value)))
    }

    /// Check whether `window` starts with bytes satisfying every token.
    ///
    /// Windows shorter than the signature never match.
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() >= self.tokens.len()
            && self
                .tokens
                .iter()
                .zip(window)
                .all(|(token, &byte)| token.matches(byte))
    }

    /// Render as the byte array + `x`/`?` mask encoding.
    ///
    /// Wildcard positions are emitted as `0x00`.
    pub fn to_mask(&self) -> (Vec<u8>, String) {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Byte(value) => (*value, 'x'),
                Token::Wildcard => (0, '?'),
            })
            .unzip()
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, token) in self.tokens.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            match token {
                Token::Byte(value) => write!(f, "{:02X}", value)?,
                Token::Wildcard => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_wildcards() {
        let sig = Signature::parse("48 8D 0D ?? ?? ?? ??").unwrap();
        assert_eq!(sig.len(), 7);
        assert_eq!(sig.tokens()[0], Token::Byte(0x48));
        assert_eq!(sig.tokens()[1], Token::Byte(0x8D));
        assert_eq!(sig.tokens()[2], Token::Byte(0x0D));
        assert_eq!(sig.tokens()[3], Token::Wildcard);
        assert_eq!(sig.exact_count(), 3);
    }

    #[test]
    fn test_display_is_canonical() {
        let sig = Signature::parse("48 8d 0d ? 5? ff").unwrap();
        assert_eq!(sig.to_string(), "48 8D 0D ?? ?? FF");
        assert_eq!(Signature::parse(&sig.to_string()).unwrap(), sig);
    }

    #[test]
    fn test_both_encodings_agree() {
        let text = Signature::parse("55 8B ?? E8").unwrap();
        let masked = Signature::from_bytes_and_mask(&[0x55, 0x8B, 0x00, 0xE8], "xx?x").unwrap();
        assert_eq!(text, masked);

        let (bytes, mask) = text.to_mask();
        assert_eq!(bytes, vec![0x55, 0x8B, 0x00, 0xE8]);
        assert_eq!(mask, "xx?x");
    }

    #[test]
    fn test_anchor_skips_leading_wildcards() {
        let sig = Signature::parse("?? ?? E8 ??").unwrap();
        assert_eq!(sig.anchor(), Some((2, 0xE8)));

        let all_wild = Signature::parse("?? ??").unwrap();
        assert_eq!(all_wild.anchor(), None);
    }

    #[test]
    fn test_matches_window() {
        let sig = Signature::parse("55 ?? E8").unwrap();
        assert!(sig.matches(&[0x55, 0x00, 0xE8]));
        assert!(sig.matches(&[0x55, 0xFF, 0xE8, 0x90]));
        assert!(!sig.matches(&[0x55, 0xFF, 0xE9]));
        assert!(!sig.matches(&[0x55, 0xFF]));
    }

    #[test]
    fn test_from_tokens_rejects_empty() {
        assert!(matches!(
            Signature::from_tokens(Vec::new()),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let sig: Signature = "E8 ?? ?? ?? ??".parse().unwrap();
        assert_eq!(sig.len(), 5);
        assert!("E8 ZZ".parse::<Signature>().is_err());
    }
}
