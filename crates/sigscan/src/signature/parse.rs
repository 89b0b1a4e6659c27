//! Tokenizer for IDA-style signature text

use super::Token;
use crate::error::{Error, Result};

const WILDCARD: u8 = b'?';

pub(super) fn parse_tokens(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    for group in text.split_whitespace() {
        if let Some(c) = group
            .chars()
            .find(|c| !c.is_ascii_hexdigit() && *c != '?')
        {
            return Err(Error::MalformedSignature(format!(
                "invalid character '{}' in token '{}'",
                c, group
            )));
        }

        if group == "?" {
            tokens.push(Token::Wildcard);
            continue;
        }

        let digits = group.as_bytes();
        if digits.len() % 2 != 0 {
            return Err(Error::MalformedSignature(format!(
                "token '{}' has an odd number of digits",
                group
            )));
        }

        tokens.extend(digits.chunks_exact(2).map(|pair| byte_token(pair[0], pair[1])));
    }

    if tokens.is_empty() {
        return Err(Error::MalformedSignature("signature is empty".to_string()));
    }

    Ok(tokens)
}

/// A wildcard in either nibble makes the whole byte a wildcard.
fn byte_token(high: u8, low: u8) -> Token {
    if high == WILDCARD || low == WILDCARD {
        return Token::Wildcard;
    }
    match (nibble(high), nibble(low)) {
        (Some(h), Some(l)) => Token::Byte(h << 4 | l),
        _ => Token::Wildcard,
    }
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 0xA),
        b'A'..=b'F' => Some(c - b'A' + 0xA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced() {
        let tokens = parse_tokens("55 8B ?? E8").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Byte(0x55),
                Token::Byte(0x8B),
                Token::Wildcard,
                Token::Byte(0xE8)
            ]
        );
    }

    #[test]
    fn test_parse_compact_groups() {
        assert_eq!(
            parse_tokens("558B??E8").unwrap(),
            parse_tokens("55 8B ?? E8").unwrap()
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_tokens("ab CD eF").unwrap(), parse_tokens("AB CD EF").unwrap());
    }

    #[test]
    fn test_single_question_mark_is_wildcard() {
        assert_eq!(
            parse_tokens("E8 ? ? ? ?").unwrap(),
            parse_tokens("E8 ?? ?? ?? ??").unwrap()
        );
    }

    #[test]
    fn test_half_wildcard_is_whole_wildcard() {
        assert_eq!(parse_tokens("5? ?B").unwrap(), vec![Token::Wildcard, Token::Wildcard]);
    }

    #[test]
    fn test_extra_whitespace_is_ignored() {
        assert_eq!(
            parse_tokens("  48\t8D \n 0D  ").unwrap(),
            vec![Token::Byte(0x48), Token::Byte(0x8D), Token::Byte(0x0D)]
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(parse_tokens(""), Err(Error::MalformedSignature(_))));
        assert!(matches!(parse_tokens("   \t"), Err(Error::MalformedSignature(_))));
    }

    #[test]
    fn test_rejects_odd_grouping() {
        assert!(parse_tokens("5").is_err());
        assert!(parse_tokens("55 8").is_err());
        assert!(parse_tokens("558").is_err());
        assert!(parse_tokens("55 ???").is_err());
    }

    #[test]
    fn test_rejects_invalid_characters() {
        assert!(parse_tokens("55 GG").is_err());
        assert!(parse_tokens("0x55").is_err());
        assert!(parse_tokens("55,8B").is_err());
        assert!(parse_tokens("55 8B *").is_err());
        assert!(parse_tokens("55 é").is_err());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "48 8B 05 ?? ?? ?? ?? 48 85 C0 74 ? 8B 88";
        assert_eq!(parse_tokens(text).unwrap(), parse_tokens(text).unwrap());
    }
}
