//! In-memory [`ReadMemory`] for tests
//!
//! Memory is a set of segments; a read succeeds only when the whole request
//! falls inside one segment, which makes truncated or unmapped reads easy to
//! simulate.

use super::ReadMemory;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct MockMemoryReader {
    segments: Vec<(u64, Vec<u8>)>,
}

impl ReadMemory for MockMemoryReader {
    fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        for (base, data) in &self.segments {
            let Some(offset) = address.checked_sub(*base) else {
                continue;
            };
            let Ok(offset) = usize::try_from(offset) else {
                continue;
            };
            if offset
                .checked_add(buffer.len())
                .is_some_and(|end| end <= data.len())
            {
                buffer.copy_from_slice(&data[offset..offset + buffer.len()]);
                return Ok(());
            }
        }

        Err(Error::MemoryReadFailed {
            address,
            message: format!("{} bytes not mapped", buffer.len()),
        })
    }
}

#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    segments: Vec<(u64, Vec<u8>)>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `data` at `base`
    pub fn segment(mut self, base: u64, data: Vec<u8>) -> Self {
        self.segments.push((base, data));
        self
    }

    /// Map `data` at `base` and patch a little-endian `i32` at `address`.
    ///
    /// Panics if `address` does not fall inside the segment; test-only helper.
    pub fn segment_with_i32(self, base: u64, mut data: Vec<u8>, address: u64, value: i32) -> Self {
        let offset = (address - base) as usize;
        data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self.segment(base, data)
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            segments: self.segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_within_segment() {
        let reader = MockMemoryBuilder::new()
            .segment(0x1000, vec![1, 2, 3, 4])
            .build();
        assert_eq!(reader.read_bytes(0x1001, 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_read_crossing_segment_end_fails() {
        let reader = MockMemoryBuilder::new()
            .segment(0x1000, vec![1, 2, 3, 4])
            .build();
        assert!(reader.read_bytes(0x1002, 4).is_err());
        assert!(reader.read_bytes(0x0FFF, 1).is_err());
    }

    #[test]
    fn test_segment_with_i32() {
        let reader = MockMemoryBuilder::new()
            .segment_with_i32(0x1000, vec![0; 16], 0x1004, -2)
            .build();
        assert_eq!(reader.read_i32(0x1004).unwrap(), -2);
    }
}
