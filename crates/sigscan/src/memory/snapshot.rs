//! Local copies of foreign memory

use tracing::debug;

use super::{MemoryRegion, ReadMemory};
use crate::error::{Error, Result};

/// A read-only copy of `[base, base + len)` taken from a [`ReadMemory`]
/// source at one point in time.
///
/// The copy is owned by the snapshot and released when it is dropped.
/// There is no write path back to the source.
#[derive(Debug, Clone)]
pub struct Snapshot {
    base: u64,
    data: Vec<u8>,
}

impl Snapshot {
    /// Copy exactly `size` bytes starting at `base`.
    ///
    /// # Errors
    ///
    /// A buffer that cannot be allocated or any failure of the underlying
    /// read, including a short read, is reported as [`Error::SnapshotRead`];
    /// no partially filled snapshot is ever returned.
    pub fn capture<R: ReadMemory + ?Sized>(reader: &R, base: u64, size: usize) -> Result<Self> {
        let failed = |message: String| Error::SnapshotRead {
            address: base,
            size,
            message,
        };

        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|e| failed(e.to_string()))?;
        data.resize(size, 0);
        reader
            .read_into(base, &mut data)
            .map_err(|e| failed(e.to_string()))?;

        debug!("Captured snapshot of {:#x} bytes at 0x{:X}", size, base);
        Ok(Self { base, data })
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn region(&self) -> MemoryRegion<'_> {
        MemoryRegion::new(self.base, &self.data)
    }
}

impl ReadMemory for Snapshot {
    fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        self.region().read_into(address, buffer)
    }
}
