//! Read access to another process's memory

use tracing::debug;

use super::ReadMemory;
use crate::error::Result;

/// A handle opened with read-memory rights on a target process.
///
/// The OS handle is closed when this value is dropped.
pub struct ProcessHandle {
    pub pid: u32,
    inner: imp::RawHandle,
}

impl ProcessHandle {
    pub fn open(pid: u32) -> Result<Self> {
        let inner = imp::RawHandle::open(pid)?;
        debug!("Opened process {} for reading", pid);
        Ok(Self { pid, inner })
    }

    /// Open the calling process itself through the same read path used for
    /// foreign processes.
    pub fn current() -> Result<Self> {
        Self::open(std::process::id())
    }
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle").field("pid", &self.pid).finish()
    }
}

impl ReadMemory for ProcessHandle {
    fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.inner.read_into(address, buffer)
    }
}

#[cfg(target_os = "windows")]
mod imp {
    use std::ffi::c_void;

    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
    };

    use crate::error::{Error, Result};

    pub struct RawHandle(HANDLE);

    // SAFETY: a process handle is a kernel object reference that may be used
    // from any thread; ReadProcessMemory does not mutate shared state.
    unsafe impl Send for RawHandle {}
    unsafe impl Sync for RawHandle {}

    impl RawHandle {
        pub fn open(pid: u32) -> Result<Self> {
            // SAFETY: OpenProcess only takes plain values.
            let handle = unsafe {
                OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_LIMITED_INFORMATION, false, pid)
            }
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;
            Ok(Self(handle))
        }

        pub fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
            let mut read = 0usize;
            // SAFETY: `buffer` is valid for writes of `buffer.len()` bytes and
            // the kernel validates the remote range.
            unsafe {
                ReadProcessMemory(
                    self.0,
                    address as usize as *const c_void,
                    buffer.as_mut_ptr() as *mut c_void,
                    buffer.len(),
                    Some(&mut read),
                )
            }
            .map_err(|e| Error::MemoryReadFailed {
                address,
                message: e.to_string(),
            })?;

            if read != buffer.len() {
                return Err(Error::MemoryReadFailed {
                    address,
                    message: format!("short read: {} of {} bytes", read, buffer.len()),
                });
            }
            Ok(())
        }
    }

    impl Drop for RawHandle {
        fn drop(&mut self) {
            // SAFETY: the handle was returned by OpenProcess and is closed once.
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use std::fs::File;
    use std::io::ErrorKind;
    use std::os::unix::fs::FileExt;

    use crate::error::{Error, Result};

    /// `/proc/<pid>/mem`, read with positioned reads
    pub struct RawHandle(File);

    impl RawHandle {
        pub fn open(pid: u32) -> Result<Self> {
            let path = format!("/proc/{}/mem", pid);
            let file = File::open(&path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::ProcessNotFound(format!("pid {}", pid)),
                _ => Error::ProcessOpenFailed(format!("{}: {}", path, e)),
            })?;
            Ok(Self(file))
        }

        pub fn read_into(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
            self.0
                .read_exact_at(buffer, address)
                .map_err(|e| Error::MemoryReadFailed {
                    address,
                    message: e.to_string(),
                })
        }
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod imp {
    use crate::error::{Error, Result};

    pub struct RawHandle;

    impl RawHandle {
        pub fn open(pid: u32) -> Result<Self> {
            Err(Error::ProcessOpenFailed(format!(
                "pid {}: process memory access is not supported on this platform",
                pid
            )))
        }

        pub fn read_into(&self, address: u64, _buffer: &mut [u8]) -> Result<()> {
            Err(Error::MemoryReadFailed {
                address,
                message: "unsupported platform".to_string(),
            })
        }
    }
}
