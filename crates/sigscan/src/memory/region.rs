//! Length-tagged view of memory at a known base address

use super::ReadMemory;
use crate::error::{Error, Result};
use crate::scan;
use crate::signature::Signature;

/// Bytes that live at `[base, base + len)` in some address space.
///
/// Every accessor is bounds-checked against `len`; an out-of-range request
/// is reported as [`Error::OutOfBounds`] and never touches memory.
#[derive(Debug, Clone, Copy)]
pub struct MemoryRegion<'a> {
    base: u64,
    bytes: &'a [u8],
}

impl<'a> MemoryRegion<'a> {
    pub fn new(base: u64, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// One past the last address, saturating at `u64::MAX`
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.bytes.len() as u64)
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn contains(&self, address: u64) -> bool {
        self.offset_of(address, 1).is_ok()
    }

    pub fn get(&self, address: u64) -> Result<u8> {
        let offset = self.offset_of(address, 1)?;
        Ok(self.bytes[offset])
    }

    pub fn slice(&self, address: u64, len: usize) -> Result<&'a [u8]> {
        let offset = self.offset_of(address, len)?;
        Ok(&self.bytes[offset..offset + len])
    }

    /// Address of the first (lowest) match of `signature`
    pub fn find(&self, signature: &Signature) -> Option<u64> {
        scan::find_first(self.bytes, signature).and_then(|offset| self.address_at(offset))
    }

    /// Addresses of every match, ascending
    pub fn find_all(&self, signature: &Signature) -> Vec<u64> {
        scan::find_all(self.bytes, signature)
            .into_iter()
            .map_while(|offset| self.address_at(offset))
            .collect()
    }

    /// Bytes that would sit past `u64::MAX` have no address.
    fn address_at(&self, offset: usize) -> Option<u64> {
        self.base.checked_add(offset as u64)
    }

    fn offset_of(&self, address: u64, len: usize) -> Result<usize> {
        let out_of_bounds = || Error::OutOfBounds { address, len };

        let offset = address.checked_sub(self.base).ok_or_else(out_of_bounds)?;
        let offset = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.bytes.len() {
            return Err(out_of_bounds());
        }
        Ok(offset)
    }
}

impl ReadMemory for MemoryRegion<'_> {
    fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        buffer.copy_from_slice(self.slice(address, buffer.len())?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTES: [u8; 8] = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80];

    #[test]
    fn test_bounds_checked_get() {
        let region = MemoryRegion::new(0x1000, &BYTES);
        assert_eq!(region.get(0x1000).unwrap(), 0x10);
        assert_eq!(region.get(0x1007).unwrap(), 0x80);
        assert!(matches!(region.get(0x1008), Err(Error::OutOfBounds { .. })));
        assert!(matches!(region.get(0xFFF), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_slice_at_edges() {
        let region = MemoryRegion::new(0x1000, &BYTES);
        assert_eq!(region.slice(0x1004, 4).unwrap(), &[0x50, 0x60, 0x70, 0x80]);
        assert_eq!(region.slice(0x1008, 0).unwrap(), &[] as &[u8]);
        assert!(region.slice(0x1005, 4).is_err());
        assert!(region.slice(u64::MAX, 2).is_err());
    }

    #[test]
    fn test_find_near_top_of_address_space() {
        let region = MemoryRegion::new(u64::MAX - 1, &[0x90, 0x00, 0x90]);
        let nop = Signature::parse("90").unwrap();
        assert_eq!(region.find(&nop), Some(u64::MAX - 1));
        assert_eq!(region.find_all(&nop), vec![u64::MAX - 1]);

        // Only match would be at u64::MAX + 1
        let region = MemoryRegion::new(u64::MAX - 1, &[0x00, 0x00, 0x90]);
        assert_eq!(region.find(&nop), None);
        assert!(region.find_all(&nop).is_empty());
        assert!(region.contains(u64::MAX));
        assert_eq!(region.get(u64::MAX).unwrap(), 0x00);
    }

    #[test]
    fn test_empty_region() {
        let region = MemoryRegion::new(0x1000, &[]);
        assert!(region.is_empty());
        assert!(!region.contains(0x1000));
        assert!(region.get(0x1000).is_err());
    }

    #[test]
    fn test_read_memory_impl() {
        let region = MemoryRegion::new(0x1000, &BYTES);
        assert_eq!(region.read_u32(0x1000).unwrap(), 0x4030_2010);
        assert_eq!(region.read_u64(0x1000).unwrap(), 0x8070_6050_4030_2010);
        assert!(region.read_u64(0x1001).is_err());
    }

    #[test]
    fn test_find_translates_to_region_address() {
        let region = MemoryRegion::new(0x7FF0_0000, &BYTES);
        let sig = Signature::parse("40 ?? 60").unwrap();
        assert_eq!(region.find(&sig), Some(0x7FF0_0003));
        assert_eq!(region.find_all(&sig), vec![0x7FF0_0003]);
    }
}
