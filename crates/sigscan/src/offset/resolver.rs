//! Evaluate named signatures against a module

use tracing::{debug, warn};

use super::{CodeSignature, ResolvedOffsets, SignatureEntry, SignatureSet};
use crate::error::{Error, Result};
use crate::memory::{ModuleInfo, ReadMemory, Snapshot};
use crate::scan::RemoteScanner;

/// Resolves [`SignatureEntry`]s inside one module.
///
/// The module is copied once, on first use, and every signature is matched
/// against that snapshot. Pointer dereferences go to the live reader since
/// their targets usually live outside the image.
pub struct SignatureResolver<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    module: ModuleInfo,
    snapshot: Option<Snapshot>,
}

impl<'a, R: ReadMemory + ?Sized> SignatureResolver<'a, R> {
    pub fn new(reader: &'a R, module: ModuleInfo) -> Self {
        Self {
            reader,
            module,
            snapshot: None,
        }
    }

    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    fn snapshot(&mut self) -> Result<&Snapshot> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => RemoteScanner::new(self.reader).snapshot(self.module.base, self.module.size)?,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    /// Apply one signature. `Ok(None)` means the pattern did not match.
    pub fn resolve_signature(&mut self, code: &CodeSignature) -> Result<Option<u64>> {
        let signature = code.signature()?;
        let snapshot = self.snapshot()?;

        let Some(matched) = snapshot.region().find(&signature) else {
            return Ok(None);
        };

        let mut address = matched.wrapping_add_signed(code.offset);
        if let Some(form) = code.relative {
            address = form.resolve(snapshot, address)?;
        }
        if code.deref {
            address = self.reader.read_u64(address)?;
        }
        Ok(Some(address.wrapping_add_signed(code.addend)))
    }

    /// Try each alternative in order; the first that yields an address wins.
    pub fn resolve_entry(&mut self, entry: &SignatureEntry) -> Result<u64> {
        for code in &entry.signatures {
            match self.resolve_signature(code) {
                Ok(Some(address)) => {
                    debug!(
                        "  {}: selected 0x{:X} (signature: {})",
                        entry.name, address, code.pattern
                    );
                    return Ok(address);
                }
                Ok(None) => {
                    debug!("  {}: no match for {}", entry.name, code.pattern);
                }
                Err(e @ (Error::OutOfBounds { .. } | Error::MemoryReadFailed { .. })) => {
                    warn!(
                        "{}: signature {} matched but could not be followed: {}",
                        entry.name, code.pattern, e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::EntryNotResolved(format!(
            "no signature for '{}' matched in {}",
            entry.name, self.module.name
        )))
    }

    /// Resolve every entry, collecting the ones that failed in `missing`.
    ///
    /// Malformed patterns and snapshot failures abort the whole run.
    pub fn resolve_all(&mut self, set: &SignatureSet) -> Result<ResolvedOffsets> {
        debug!(
            "Resolving {} signature entries in {}",
            set.entries.len(),
            self.module.name
        );

        let mut offsets = ResolvedOffsets {
            module: self.module.name.clone(),
            base: self.module.base,
            ..Default::default()
        };

        for entry in &set.entries {
            match self.resolve_entry(entry) {
                Ok(address) => {
                    offsets.addresses.insert(entry.name.clone(), address);
                }
                Err(Error::EntryNotResolved(message)) => {
                    warn!("{}", message);
                    offsets.missing.push(entry.name.clone());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(offsets)
    }
}
