//! Readability checks for the calling process's own address space

/// Whether every byte of `[base, base + size)` is mapped readable in the
/// calling process right now.
///
/// Empty and wrapping ranges are never readable.
pub fn is_readable_local(base: u64, size: usize) -> bool {
    if base == 0 || size == 0 {
        return false;
    }
    match base.checked_add(size as u64) {
        Some(end) => imp::is_readable(base, end),
        None => false,
    }
}

#[cfg(target_os = "windows")]
mod imp {
    use std::ffi::c_void;

    use windows::Win32::System::Memory::{
        MEM_COMMIT, MEMORY_BASIC_INFORMATION, PAGE_EXECUTE_READ, PAGE_EXECUTE_READWRITE,
        PAGE_EXECUTE_WRITECOPY, PAGE_GUARD, PAGE_NOACCESS, PAGE_PROTECTION_FLAGS, PAGE_READONLY,
        PAGE_READWRITE, PAGE_WRITECOPY, VirtualQuery,
    };

    fn readable(protect: PAGE_PROTECTION_FLAGS) -> bool {
        let readable = PAGE_READONLY.0
            | PAGE_READWRITE.0
            | PAGE_WRITECOPY.0
            | PAGE_EXECUTE_READ.0
            | PAGE_EXECUTE_READWRITE.0
            | PAGE_EXECUTE_WRITECOPY.0;
        protect.0 & (PAGE_GUARD.0 | PAGE_NOACCESS.0) == 0 && protect.0 & readable != 0
    }

    pub fn is_readable(base: u64, end: u64) -> bool {
        let mut cursor = base;
        while cursor < end {
            let mut info = MEMORY_BASIC_INFORMATION::default();
            // SAFETY: `info` is a valid out buffer of the size passed.
            let written = unsafe {
                VirtualQuery(
                    Some(cursor as usize as *const c_void),
                    &mut info,
                    std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
                )
            };
            if written == 0 || info.State != MEM_COMMIT || !readable(info.Protect) {
                return false;
            }

            let region_end = (info.BaseAddress as u64).saturating_add(info.RegionSize as u64);
            if region_end <= cursor {
                return false;
            }
            cursor = region_end;
        }
        true
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use tracing::debug;

    use crate::memory::maps::{covers_readable, parse_maps};

    pub fn is_readable(base: u64, end: u64) -> bool {
        match std::fs::read_to_string("/proc/self/maps") {
            Ok(content) => covers_readable(&parse_maps(&content), base, end),
            Err(e) => {
                debug!("Failed to read /proc/self/maps: {}", e);
                false
            }
        }
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod imp {
    pub fn is_readable(_base: u64, _end: u64) -> bool {
        false
    }
}
