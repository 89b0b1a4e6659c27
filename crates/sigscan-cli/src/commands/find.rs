//! Find command implementation.
//!
//! Loads a signature set and resolves every entry against the module it
//! names.

use anyhow::Result;
use owo_colors::OwoColorize;
use sigscan::{ModuleInfo, ProcessHandle, ResolvedOffsets, SignatureResolver, load_signatures};
use std::path::Path;
use tracing::info;

/// Run the find command
pub fn run(pid: u32, signatures: &Path, json: bool) -> Result<()> {
    let set = load_signatures(signatures)?;
    set.validate()?;
    info!(
        "Loaded {} entries for {} from {:?}",
        set.entries.len(),
        set.module,
        signatures
    );

    let process = ProcessHandle::open(pid)?;
    let module = ModuleInfo::find_remote(pid, &set.module)?;

    let mut resolver = SignatureResolver::new(&process, module);
    let offsets = resolver.resolve_all(&set)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&offsets)?);
        return Ok(());
    }

    println!("{} (base: 0x{:X})", offsets.module, offsets.base);
    println!();
    for line in render_table(&offsets) {
        println!("{}", line);
    }
    for name in &offsets.missing {
        println!("  {:<24} {}", name, "not found".red());
    }

    println!();
    if offsets.is_complete() {
        println!("{}", "All entries resolved".green());
    } else {
        println!(
            "{}",
            format!(
                "{} of {} entries resolved",
                offsets.addresses.len(),
                offsets.addresses.len() + offsets.missing.len()
            )
            .yellow()
        );
    }

    Ok(())
}

/// One line per resolved entry: name, absolute address and module offset
pub fn render_table(offsets: &ResolvedOffsets) -> Vec<String> {
    offsets
        .addresses
        .iter()
        .map(|(name, address)| match offsets.rva(name) {
            Some(rva) => format!("  {:<24} 0x{:X} (+0x{:X})", name, address, rva),
            None => format!("  {:<24} 0x{:X}", name, address),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_sorted_by_name() {
        let mut offsets = ResolvedOffsets {
            module: "engine.dll".to_string(),
            base: 0x1_4000_0000,
            ..Default::default()
        };
        offsets.addresses.insert("viewMatrix".to_string(), 0x1_4000_2000);
        offsets.addresses.insert("cvar".to_string(), 0x1_4000_1107);
        // Outside the image, e.g. after a pointer dereference
        offsets.addresses.insert("heap".to_string(), 0x2000);

        let lines = render_table(&offsets);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("cvar"));
        assert!(lines[0].ends_with("0x140001107 (+0x1107)"));
        assert!(lines[1].trim_start().starts_with("heap"));
        assert!(lines[1].ends_with("0x2000"));
        assert!(lines[2].ends_with("(+0x2000)"));
    }
}
