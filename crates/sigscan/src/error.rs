use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to snapshot {size:#x} bytes at {address:#x}: {message}")]
    SnapshotRead {
        address: u64,
        size: usize,
        message: String,
    },

    #[error("Read of {len} bytes at {address:#x} is outside the region")]
    OutOfBounds { address: u64, len: usize },

    #[error(
        "Invalid relative instruction form: displacement at +{disp_offset} does not fit in {instr_len} bytes"
    )]
    InvalidInstructionForm { disp_offset: usize, instr_len: usize },

    #[error("Failed to resolve signature entry: {0}")]
    EntryNotResolved(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if this error came from a failed or out-of-range memory read
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            Error::SnapshotRead { .. } | Error::OutOfBounds { .. } | Error::MemoryReadFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_error_is_read_failure() {
        let err = Error::SnapshotRead {
            address: 0x1000,
            size: 0x200,
            message: "partial copy".to_string(),
        };
        assert!(err.is_read_failure());
        assert!(Error::OutOfBounds { address: 0, len: 4 }.is_read_failure());
        assert!(!Error::MalformedSignature("empty".to_string()).is_read_failure());
    }

    #[test]
    fn test_snapshot_error_message() {
        let err = Error::SnapshotRead {
            address: 0x1000,
            size: 0x20,
            message: "denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to snapshot 0x20 bytes at 0x1000: denied"
        );
    }
}
