use crate::error::Result;

/// A source of bytes addressed in some process's address space.
///
/// `read_into` must either fill the whole buffer or fail; implementations
/// never hand back a partially written buffer as success.
pub trait ReadMemory {
    fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()>;

    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        self.read_into(address, &mut buffer)?;
        Ok(buffer)
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        let mut bytes = [0u8; 4];
        self.read_into(address, &mut bytes)?;
        Ok(i32::from_le_bytes(bytes))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_into(address, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        let mut bytes = [0u8; 8];
        self.read_into(address, &mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }
}

impl<R: ReadMemory + ?Sized> ReadMemory for &R {
    fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        (**self).read_into(address, buffer)
    }
}
