//! Signature matching over byte buffers
//!
//! Both scanners share one algorithm: candidate start positions are tried in
//! ascending order and the first full match wins. When the signature has an
//! exact byte, `memchr` jumps straight to the next position where that byte
//! can sit; the result is the same as trying every position.

mod local;
mod remote;

pub use local::scan_local;
#[cfg(target_os = "windows")]
pub use local::LocalModule;
pub use remote::{RemoteScanner, scan_remote};

use crate::signature::Signature;

/// Offset of the leftmost match of `signature` in `haystack`.
///
/// Never reads outside `haystack`; buffers shorter than the signature
/// (including empty ones) yield `None`.
///
/// This is a forward walk over every start position, not a skip table.
/// The only shortcut is `memchr` moving to the next occurrence of the
/// first exact byte, which passes over exactly the positions that byte
/// already rules out. Results are identical to checking each position in
/// turn.
pub fn find_first(haystack: &[u8], signature: &Signature) -> Option<usize> {
    Candidates::new(haystack, signature).next()
}

/// Offsets of every match, ascending. Matches may overlap.
pub fn find_all(haystack: &[u8], signature: &Signature) -> Vec<usize> {
    Candidates::new(haystack, signature).collect()
}

struct Candidates<'a> {
    haystack: &'a [u8],
    signature: &'a Signature,
    anchor: Option<(usize, u8)>,
    /// Next start position to try
    next: usize,
    /// Last start position whose window fits, or `None` if nothing fits
    last: Option<usize>,
}

impl<'a> Candidates<'a> {
    fn new(haystack: &'a [u8], signature: &'a Signature) -> Self {
        Self {
            haystack,
            signature,
            anchor: signature.anchor(),
            next: 0,
            last: haystack.len().checked_sub(signature.len()),
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let last = self.last?;

        while self.next <= last {
            let start = match self.anchor {
                Some((index, byte)) => {
                    // The anchor byte of a candidate at `s` sits at `s + index`
                    let window = &self.haystack[self.next + index..=last + index];
                    match memchr::memchr(byte, window) {
                        Some(found) => self.next + found,
                        None => {
                            self.next = last + 1;
                            return None;
                        }
                    }
                }
                None => self.next,
            };

            self.next = start + 1;
            let window = &self.haystack[start..start + self.signature.len()];
            if self.signature.matches(window) {
                return Some(start);
            }
        }

        None
    }
}
