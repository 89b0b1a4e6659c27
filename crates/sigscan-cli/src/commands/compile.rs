//! Compile command implementation.
//!
//! Parses a signature without touching any process and prints the forms
//! other tools accept.

use anyhow::Result;
use sigscan::Signature;

/// Run the compile command
pub fn run(text: &str) -> Result<()> {
    let signature = Signature::parse(text)?;
    for line in describe(&signature) {
        println!("{}", line);
    }
    Ok(())
}

pub fn describe(signature: &Signature) -> Vec<String> {
    let (bytes, mask) = signature.to_mask();
    let escaped: String = bytes.iter().map(|b| format!("\\x{:02X}", b)).collect();

    vec![
        format!("Signature: {}", signature),
        format!("Length:    {} ({} exact)", signature.len(), signature.exact_count()),
        format!("Bytes:     {}", escaped),
        format!("Mask:      {}", mask),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_compact_signature() {
        let signature = Signature::parse("488D0D????").unwrap();
        assert_eq!(
            describe(&signature),
            vec![
                "Signature: 48 8D 0D ?? ??",
                "Length:    5 (3 exact)",
                "Bytes:     \\x48\\x8D\\x0D\\x00\\x00",
                "Mask:      xxx??",
            ]
        );
    }
}
