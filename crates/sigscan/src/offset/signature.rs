use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::resolve::RelativeInstruction;
use crate::signature::Signature;

/// One way of locating an address: scan for `pattern`, step `offset` bytes
/// from the match, then optionally follow a relative operand, dereference
/// a pointer and add `addend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSignature {
    pub pattern: String,
    #[serde(default)]
    pub offset: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<RelativeInstruction>,
    #[serde(default)]
    pub deref: bool,
    #[serde(default)]
    pub addend: i64,
}

impl CodeSignature {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            offset: 0,
            relative: None,
            deref: false,
            addend: 0,
        }
    }

    pub fn signature(&self) -> Result<Signature> {
        Signature::parse(&self.pattern)
    }
}

/// A named address with alternative signatures, tried in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub name: String,
    pub signatures: Vec<CodeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    /// Module the signatures are scanned in, e.g. `engine.dll`
    pub module: String,
    pub entries: Vec<SignatureEntry>,
}

impl SignatureSet {
    pub fn entry(&self, name: &str) -> Option<&SignatureEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// Compile every pattern, reporting the first malformed one.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            for signature in &entry.signatures {
                signature.signature()?;
                if let Some(form) = signature.relative {
                    form.validate()?;
                }
            }
        }
        Ok(())
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<SignatureSet> {
    let content = fs::read_to_string(&path)?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &SignatureSet) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}
