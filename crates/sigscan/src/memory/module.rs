//! Module lookup: name → base address and image size

use tracing::debug;

use crate::error::{Error, Result};

/// A loaded image in some process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub base: u64,
    pub size: usize,
}

impl ModuleInfo {
    /// A null base means the loader did not find the module.
    pub fn new(name: &str, base: u64, size: usize) -> Result<Self> {
        if base == 0 {
            return Err(Error::ModuleNotFound(format!("{} (null base)", name)));
        }
        Ok(Self {
            name: name.to_string(),
            base,
            size,
        })
    }

    /// One past the last byte of the image
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.size as u64)
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.base && address < self.end()
    }

    /// Look up `name` in the calling process's module table.
    pub fn find_local(name: &str) -> Result<Self> {
        let module = imp::find_local(name)?;
        debug!(
            "Local module {}: base 0x{:X}, size {:#x}",
            module.name, module.base, module.size
        );
        Ok(module)
    }

    /// Look up `name` in the module table of process `pid`.
    pub fn find_remote(pid: u32, name: &str) -> Result<Self> {
        let module = imp::find_remote(pid, name)?;
        debug!(
            "Module {} in pid {}: base 0x{:X}, size {:#x}",
            module.name, pid, module.base, module.size
        );
        Ok(module)
    }
}

#[cfg(target_os = "windows")]
mod imp {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW, TH32CS_SNAPMODULE,
        TH32CS_SNAPMODULE32,
    };
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::System::ProcessStatus::{GetModuleInformation, MODULEINFO};
    use windows::Win32::System::Threading::GetCurrentProcess;
    use windows::core::HSTRING;

    use super::ModuleInfo;
    use crate::error::{Error, Result};

    pub fn find_local(name: &str) -> Result<ModuleInfo> {
        let wide = HSTRING::from(name);
        // SAFETY: GetModuleHandleW reads the null-terminated name only.
        let module = unsafe { GetModuleHandleW(&wide) }
            .map_err(|e| Error::ModuleNotFound(format!("{}: {}", name, e)))?;

        let mut info = MODULEINFO::default();
        // SAFETY: `info` is a valid MODULEINFO and its size is passed along.
        unsafe {
            GetModuleInformation(
                GetCurrentProcess(),
                module,
                &mut info,
                std::mem::size_of::<MODULEINFO>() as u32,
            )
        }
        .map_err(|e| Error::ModuleNotFound(format!("{}: {}", name, e)))?;

        ModuleInfo::new(name, info.lpBaseOfDll as u64, info.SizeOfImage as usize)
    }

    pub fn find_remote(pid: u32, name: &str) -> Result<ModuleInfo> {
        // SAFETY: plain values in, owned snapshot handle out.
        let snapshot =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        // SAFETY: `entry` is a valid MODULEENTRY32W with dwSize set.
        unsafe {
            if Module32FirstW(snapshot, &mut entry).is_ok() {
                loop {
                    let len = entry
                        .szModule
                        .iter()
                        .position(|&c| c == 0)
                        .unwrap_or(entry.szModule.len());
                    let module_name = String::from_utf16_lossy(&entry.szModule[..len]);
                    if module_name.eq_ignore_ascii_case(name) {
                        found = Some((entry.modBaseAddr as u64, entry.modBaseSize as usize));
                        break;
                    }
                    if Module32NextW(snapshot, &mut entry).is_err() {
                        break;
                    }
                }
            }
            let _ = CloseHandle(snapshot);
        }

        let (base, size) = found
            .ok_or_else(|| Error::ModuleNotFound(format!("{} in pid {}", name, pid)))?;
        ModuleInfo::new(name, base, size)
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use std::fs;
    use std::io::ErrorKind;

    use super::ModuleInfo;
    use crate::error::{Error, Result};
    use crate::memory::maps::{module_span, parse_maps};

    pub fn find_local(name: &str) -> Result<ModuleInfo> {
        find_in_maps("/proc/self/maps", name)
    }

    pub fn find_remote(pid: u32, name: &str) -> Result<ModuleInfo> {
        find_in_maps(&format!("/proc/{}/maps", pid), name)
    }

    fn find_in_maps(path: &str, name: &str) -> Result<ModuleInfo> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ProcessNotFound(path.to_string()),
            _ => Error::Io(e),
        })?;

        let (start, end) = module_span(&parse_maps(&content), name)
            .ok_or_else(|| Error::ModuleNotFound(format!("{} in {}", name, path)))?;
        ModuleInfo::new(name, start, (end - start) as usize)
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod imp {
    use super::ModuleInfo;
    use crate::error::{Error, Result};

    pub fn find_local(name: &str) -> Result<ModuleInfo> {
        Err(Error::ModuleNotFound(format!(
            "{}: module lookup is not supported on this platform",
            name
        )))
    }

    pub fn find_remote(_pid: u32, name: &str) -> Result<ModuleInfo> {
        find_local(name)
    }
}
