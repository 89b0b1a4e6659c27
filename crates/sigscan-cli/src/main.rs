use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sigscan")]
#[command(about = "Byte-signature scanner for process modules")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a module of another process for a signature
    Scan {
        #[arg(long, env = "SIGSCAN_PID")]
        pid: u32,

        /// Module name, e.g. engine.dll
        #[arg(short, long)]
        module: String,

        /// IDA-style signature ("48 8D 0D ?? ?? ?? ??")
        #[arg(short, long, conflicts_with_all = ["bytes", "mask"])]
        pattern: Option<String>,

        /// Raw bytes in hex, used together with --mask
        #[arg(long, requires = "mask")]
        bytes: Option<String>,

        /// Mask of 'x' (exact) and '?' (wildcard), one per byte
        #[arg(long, requires = "bytes")]
        mask: Option<String>,

        /// Print every match instead of the first
        #[arg(long)]
        all: bool,

        /// Resolve the relative instruction at match + OFFSET (hex)
        #[arg(long, value_name = "OFFSET", allow_hyphen_values = true)]
        resolve: Option<String>,
    },

    /// Resolve a RIP-relative instruction in another process
    Resolve {
        #[arg(long, env = "SIGSCAN_PID")]
        pid: u32,

        /// Instruction address (hex)
        #[arg(short, long)]
        address: String,
    },

    /// Evaluate a JSON signature set against a process
    Find {
        #[arg(long, env = "SIGSCAN_PID")]
        pid: u32,

        /// Signature set file
        #[arg(short, long, default_value = "signatures.json")]
        signatures: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump raw bytes from another process
    Hexdump {
        #[arg(long, env = "SIGSCAN_PID")]
        pid: u32,

        /// Start address (hex)
        #[arg(short, long)]
        address: String,

        /// Number of bytes
        #[arg(short, long, default_value_t = 0x80)]
        size: usize,

        /// Show ASCII column
        #[arg(long)]
        ascii: bool,
    },

    /// Parse a signature and print its canonical and mask forms
    Compile {
        signature: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sigscan=info".parse()?))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Scan {
            pid,
            module,
            pattern,
            bytes,
            mask,
            all,
            resolve,
        } => commands::scan::run(commands::scan::ScanOptions {
            pid,
            module,
            pattern,
            bytes,
            mask,
            all,
            resolve,
        }),
        Command::Resolve { pid, address } => commands::resolve::run(pid, &address),
        Command::Find {
            pid,
            signatures,
            json,
        } => commands::find::run(pid, &signatures, json),
        Command::Hexdump {
            pid,
            address,
            size,
            ascii,
        } => commands::hexdump::run(pid, &address, size, ascii),
        Command::Compile { signature } => commands::compile::run(&signature),
    }
}
