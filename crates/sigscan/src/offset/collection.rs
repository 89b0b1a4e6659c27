use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Addresses produced by evaluating a [`SignatureSet`](super::SignatureSet)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOffsets {
    pub module: String,
    pub base: u64,
    pub addresses: BTreeMap<String, u64>,
    /// Entries none of whose signatures produced an address
    pub missing: Vec<String>,
}

impl ResolvedOffsets {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.addresses.get(name).copied()
    }

    /// Address relative to the module base, if it lies above it
    pub fn rva(&self, name: &str) -> Option<u64> {
        self.get(name)?.checked_sub(self.base)
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
