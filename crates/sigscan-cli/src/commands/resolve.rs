//! Resolve command implementation.

use super::hex_utils::{format_hex_address, parse_hex_address};
use anyhow::Result;
use sigscan::{ProcessHandle, ReadMemory, resolve_relative};

/// Run the resolve command
pub fn run(pid: u32, address: &str) -> Result<()> {
    let address = parse_hex_address(address)?;
    let process = ProcessHandle::open(pid)?;

    let instruction = process.read_bytes(address, 7)?;
    let target = resolve_relative(&process, address)?;

    println!("Instruction: {}", format_hex_address(address));
    println!("Bytes:       {:02X?}", instruction);
    println!("Target:      {}", format_hex_address(target));

    Ok(())
}
