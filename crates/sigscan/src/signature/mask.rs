//! Byte array + mask encoding (`"\x55\x8B\x00\xE8"`, `"xx?x"`)

use super::Token;
use crate::error::{Error, Result};

pub(super) fn tokens_from_mask(bytes: &[u8], mask: &str) -> Result<Vec<Token>> {
    if mask.is_empty() {
        return Err(Error::MalformedSignature("mask is empty".to_string()));
    }

    if mask.len() != bytes.len() {
        return Err(Error::MalformedSignature(format!(
            "mask has {} characters but {} bytes were given",
            mask.len(),
            bytes.len()
        )));
    }

    mask.bytes()
        .zip(bytes)
        .map(|(m, &byte)| match m {
            b'x' | b'X' => Ok(Token::Byte(byte)),
            b'?' => Ok(Token::Wildcard),
            other => Err(Error::MalformedSignature(format!(
                "invalid mask character '{}'",
                other.escape_ascii()
            ))),
        })
        .collect()
}
