//! Scan command implementation.

use super::hex_utils::{format_hex_address, parse_hex_bytes, parse_hex_offset};
use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use sigscan::{ModuleInfo, ProcessHandle, RemoteScanner, Signature, resolve_relative};
use tracing::info;

pub struct ScanOptions {
    pub pid: u32,
    pub module: String,
    pub pattern: Option<String>,
    pub bytes: Option<String>,
    pub mask: Option<String>,
    pub all: bool,
    pub resolve: Option<String>,
}

/// Build a signature from either `--pattern` or `--bytes` + `--mask`.
pub fn build_signature(
    pattern: Option<&str>,
    bytes: Option<&str>,
    mask: Option<&str>,
) -> Result<Signature> {
    match (pattern, bytes, mask) {
        (Some(pattern), None, None) => Ok(Signature::parse(pattern)?),
        (None, Some(bytes), Some(mask)) => {
            let bytes = parse_hex_bytes(bytes)?;
            Ok(Signature::from_bytes_and_mask(&bytes, mask)?)
        }
        (None, None, None) => bail!("No signature specified. Use --pattern or --bytes with --mask"),
        _ => bail!("Use either --pattern or --bytes with --mask, not both"),
    }
}

/// Run the scan command
pub fn run(options: ScanOptions) -> Result<()> {
    let signature = build_signature(
        options.pattern.as_deref(),
        options.bytes.as_deref(),
        options.mask.as_deref(),
    )?;
    let resolve_offset = options.resolve.as_deref().map(parse_hex_offset).transpose()?;

    let process = ProcessHandle::open(options.pid)?;
    let module = ModuleInfo::find_remote(options.pid, &options.module)?;
    info!(
        "Scanning {} (base: 0x{:X}, size: {:#x}) in process {}",
        module.name, module.base, module.size, process.pid
    );

    let scanner = RemoteScanner::new(&process);
    let snapshot = scanner.snapshot(module.base, module.size)?;
    let region = snapshot.region();

    let matches = if options.all {
        region.find_all(&signature)
    } else {
        region.find(&signature).into_iter().collect()
    };

    if matches.is_empty() {
        println!("{} {}", "Not found:".red(), signature);
        return Ok(());
    }

    for address in &matches {
        print!(
            "{} {} ({}+0x{:X})",
            "Found:".green(),
            format_hex_address(*address),
            module.name,
            address - module.base
        );

        if let Some(offset) = resolve_offset {
            let instruction = address.wrapping_add_signed(offset);
            match resolve_relative(&snapshot, instruction) {
                Ok(target) => print!(" -> {}", format_hex_address(target).cyan()),
                Err(e) => print!(" -> {}", e.yellow()),
            }
        }
        println!();
    }

    if options.all {
        println!();
        println!("{} match(es)", matches.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_pattern() {
        let signature = build_signature(Some("48 8D 0D ?? ?? ?? ??"), None, None).unwrap();
        assert_eq!(signature.len(), 7);
    }

    #[test]
    fn test_build_from_bytes_and_mask() {
        let signature = build_signature(None, Some("488D0D00000000"), Some("xxx????")).unwrap();
        assert_eq!(signature, Signature::parse("48 8D 0D ?? ?? ?? ??").unwrap());
    }

    #[test]
    fn test_build_requires_a_signature() {
        assert!(build_signature(None, None, None).is_err());
        assert!(build_signature(Some("55"), Some("55"), Some("x")).is_err());
        assert!(build_signature(None, Some("55 8B"), Some("x")).is_err());
    }
}
