//! Scanning another process's module through a local snapshot

use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::{ReadMemory, Snapshot};
use crate::signature::Signature;

/// Snapshot `[module_base, module_base + module_size)` from `reader` and
/// return the target-process address of the first match.
///
/// # Errors
///
/// [`Error::ModuleNotFound`] for a null base and [`Error::SnapshotRead`]
/// when the copy does not complete; matching never runs on a partial copy.
pub fn scan_remote<R: ReadMemory + ?Sized>(
    reader: &R,
    module_base: u64,
    module_size: usize,
    signature: &Signature,
) -> Result<Option<u64>> {
    RemoteScanner::new(reader).scan(module_base, module_size, signature)
}

pub struct RemoteScanner<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
}

impl<'a, R: ReadMemory + ?Sized> RemoteScanner<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Copy the module into a buffer owned by the returned [`Snapshot`].
    pub fn snapshot(&self, module_base: u64, module_size: usize) -> Result<Snapshot> {
        if module_base == 0 {
            return Err(Error::ModuleNotFound("null module base".to_string()));
        }
        Snapshot::capture(self.reader, module_base, module_size)
    }

    pub fn scan(
        &self,
        module_base: u64,
        module_size: usize,
        signature: &Signature,
    ) -> Result<Option<u64>> {
        if module_size == 0 && module_base != 0 {
            return Ok(None);
        }

        let snapshot = self.snapshot(module_base, module_size)?;
        let found = snapshot.region().find(signature);
        debug!(
            "Remote scan of {:#x} bytes at 0x{:X} for {}: {:X?}",
            module_size, module_base, signature, found
        );
        Ok(found)
    }

    /// Every match in the module, ascending
    pub fn scan_all(
        &self,
        module_base: u64,
        module_size: usize,
        signature: &Signature,
    ) -> Result<Vec<u64>> {
        if module_size == 0 && module_base != 0 {
            return Ok(Vec::new());
        }

        let snapshot = self.snapshot(module_base, module_size)?;
        let found = snapshot.region().find_all(signature);
        debug!(
            "Remote scan of {:#x} bytes at 0x{:X} for {}: {} matches",
            module_size,
            module_base,
            signature,
            found.len()
        );
        Ok(found)
    }
}
