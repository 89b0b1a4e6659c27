//! # sigscan
//!
//! Byte-signature scanning for loaded module images.
//!
//! This crate provides:
//! - A signature compiler for IDA-style (`"48 8D 0D ?? ?? ?? ??"`) and
//!   byte + mask (`"xxx????"`) patterns
//! - A local scanner for modules mapped into the calling process
//! - A remote scanner that matches against a snapshot of another process's
//!   module
//! - RIP-relative operand resolution
//! - Named signature sets loaded from JSON
//!
//! ```
//! use sigscan::{MemoryRegion, Signature, resolve_relative};
//!
//! let code = [0x90, 0x48, 0x8D, 0x0D, 0x10, 0x00, 0x00, 0x00, 0xC3];
//! let region = MemoryRegion::new(0x1000, &code);
//!
//! let signature = Signature::parse("48 8D 0D ?? ?? ?? ??").unwrap();
//! let lea = region.find(&signature).unwrap();
//! assert_eq!(lea, 0x1001);
//! assert_eq!(resolve_relative(&region, lea).unwrap(), 0x1001 + 7 + 0x10);
//! ```

pub mod error;
pub mod memory;
pub mod offset;
pub mod resolve;
pub mod scan;
pub mod signature;

pub use error::{Error, Result};
pub use memory::{MemoryRegion, ModuleInfo, ProcessHandle, ReadMemory, Snapshot};
pub use offset::{
    CodeSignature, ResolvedOffsets, SignatureEntry, SignatureResolver, SignatureSet,
    load_signatures, save_signatures,
};
pub use resolve::{RelativeInstruction, relative_target, resolve_relative};
#[cfg(target_os = "windows")]
pub use scan::LocalModule;
pub use scan::{RemoteScanner, find_all, find_first, scan_local, scan_remote};
pub use signature::{Signature, Token};
