//! Hexdump command implementation.
//!
//! Displays raw bytes around a match, e.g. to check what a signature landed
//! on or to read a displacement by eye.
//!
//! # Output Format
//!
//! ```text
//! 0x7FF610001000: 48 8D 0D 10 00 00 00 E8  01 02 03 04 C3 CC CC CC  |H...............|
//! ```

use super::hex_utils::parse_hex_address;
use anyhow::Result;
use sigscan::{ProcessHandle, ReadMemory};

/// Run the hexdump command
pub fn run(pid: u32, address: &str, size: usize, ascii: bool) -> Result<()> {
    let address = parse_hex_address(address)?;
    let process = ProcessHandle::open(pid)?;
    let bytes = process.read_bytes(address, size)?;

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();
    for line in format_hexdump(address, &bytes, ascii) {
        println!("{}", line);
    }

    Ok(())
}

/// Render `bytes` as 16-byte rows labelled with their absolute address.
pub fn format_hexdump(address: u64, bytes: &[u8], ascii: bool) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:X}: ", address.wrapping_add(i as u64 * 16));

            for j in 0..16 {
                if j == 8 {
                    line.push(' ');
                }
                match chunk.get(j) {
                    Some(byte) => line.push_str(&format!("{:02X} ", byte)),
                    None => line.push_str("   "),
                }
            }

            if ascii {
                line.push_str(" |");
                for byte in chunk {
                    line.push(if (0x20..0x7F).contains(byte) {
                        *byte as char
                    } else {
                        '.'
                    });
                }
                for _ in chunk.len()..16 {
                    line.push(' ');
                }
                line.push('|');
            }

            line.trim_end().to_string()
        })
        .collect()
}
