//! Scanning modules mapped into the calling process

use tracing::debug;

use crate::memory::{MemoryRegion, is_readable_local};
use crate::signature::Signature;

/// Find the first match of `signature` in `[module_base, module_base +
/// module_size)` of the calling process.
///
/// A null base, a zero size, a range that wraps the address space or one
/// that is not entirely mapped readable returns `None` without touching
/// memory. Reads never go past the end of the range.
///
/// # Safety
///
/// The range must not be unmapped or made unreadable by another thread
/// while the call runs. Images held by the loader (see
/// [`ModuleInfo::find_local`](crate::memory::ModuleInfo::find_local))
/// satisfy this.
pub unsafe fn scan_local(module_base: u64, module_size: usize, signature: &Signature) -> Option<u64> {
    let address = usize::try_from(module_base).ok()?;
    if !is_readable_local(module_base, module_size) {
        debug!(
            "Local range 0x{:X}+{:#x} is not readable, skipping scan",
            module_base, module_size
        );
        return None;
    }

    // SAFETY: checked readable above, and kept mapped per the caller's contract.
    let bytes = unsafe { std::slice::from_raw_parts(address as *const u8, module_size) };
    let found = MemoryRegion::new(module_base, bytes).find(signature);

    debug!(
        "Local scan of {:#x} bytes at 0x{:X} for {}: {:X?}",
        module_size, module_base, signature, found
    );
    found
}

#[cfg(target_os = "windows")]
pub use self::pinned::LocalModule;

#[cfg(target_os = "windows")]
mod pinned {
    use windows::Win32::Foundation::{FreeLibrary, HMODULE};
    use windows::Win32::System::LibraryLoader::GetModuleHandleExW;
    use windows::core::HSTRING;

    use crate::error::{Error, Result};
    use crate::memory::{MemoryRegion, ModuleInfo};
    use crate::resolve;
    use crate::signature::Signature;

    /// A module of the calling process, pinned loaded for the lifetime of
    /// this value.
    pub struct LocalModule {
        info: ModuleInfo,
        handle: HMODULE,
    }

    impl LocalModule {
        pub fn find(name: &str) -> Result<Self> {
            let wide = HSTRING::from(name);
            let mut handle = HMODULE::default();
            // SAFETY: `handle` is a valid out pointer; flags 0 takes a reference.
            unsafe { GetModuleHandleExW(0, &wide, &mut handle) }
                .map_err(|e| Error::ModuleNotFound(format!("{}: {}", name, e)))?;

            let info = match ModuleInfo::find_local(name) {
                Ok(info) => info,
                Err(e) => {
                    // SAFETY: releases the reference taken above.
                    unsafe {
                        let _ = FreeLibrary(handle);
                    }
                    return Err(e);
                }
            };
            Ok(Self { info, handle })
        }

        pub fn info(&self) -> &ModuleInfo {
            &self.info
        }

        pub fn region(&self) -> MemoryRegion<'_> {
            // SAFETY: the loader maps the whole image and the reference held
            // in `handle` keeps it mapped while `self` is borrowed.
            let bytes = unsafe {
                std::slice::from_raw_parts(self.info.base as usize as *const u8, self.info.size)
            };
            MemoryRegion::new(self.info.base, bytes)
        }

        pub fn scan(&self, signature: &Signature) -> Option<u64> {
            self.region().find(signature)
        }

        pub fn resolve_relative(&self, instruction_start: u64) -> Result<u64> {
            resolve::resolve_relative(&self.region(), instruction_start)
        }
    }

    impl Drop for LocalModule {
        fn drop(&mut self) {
            // SAFETY: balances the GetModuleHandleExW reference.
            unsafe {
                let _ = FreeLibrary(self.handle);
            }
        }
    }

}
