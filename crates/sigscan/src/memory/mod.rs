mod access;
pub mod maps;
mod module;
mod process;
mod reader;
mod region;
mod snapshot;

// Mock memory reader for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use access::is_readable_local;
pub use module::ModuleInfo;
pub use process::ProcessHandle;
pub use reader::ReadMemory;
pub use region::MemoryRegion;
pub use snapshot::Snapshot;

#[doc(hidden)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
