//! CLI command implementations.

pub mod compile;
pub mod find;
pub mod hex_utils;
pub mod hexdump;
pub mod resolve;
pub mod scan;
