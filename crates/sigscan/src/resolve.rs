//! RIP-relative operand resolution
//!
//! x64 instructions such as `lea rcx, [rip+disp32]` (`48 8D 0D xx xx xx xx`)
//! encode their target as a signed 32-bit displacement from the address of
//! the *next* instruction:
//!
//! ```text
//! start      start+3          start+7
//! |48 8D 0D | d0 d1 d2 d3 |  <next instruction>
//! target = start + 7 + disp
//! ```
//!
//! No opcode bytes are checked. Callers are expected to pass an address that
//! came from a signature match plus a known offset.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// Offset of the displacement inside a `48 8D /r disp32` style instruction
pub const DISPLACEMENT_OFFSET: usize = 3;
/// Length of that instruction
pub const INSTRUCTION_LENGTH: usize = 7;

/// Where the 32-bit displacement sits and how long the instruction is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeInstruction {
    pub disp_offset: usize,
    pub instr_len: usize,
}

impl Default for RelativeInstruction {
    fn default() -> Self {
        Self {
            disp_offset: DISPLACEMENT_OFFSET,
            instr_len: INSTRUCTION_LENGTH,
        }
    }
}

impl RelativeInstruction {
    /// `call rel32` / `jmp rel32` (`E8`/`E9 xx xx xx xx`)
    pub const fn rel32_branch() -> Self {
        Self {
            disp_offset: 1,
            instr_len: 5,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self
            .disp_offset
            .checked_add(4)
            .is_none_or(|end| end > self.instr_len)
        {
            return Err(Error::InvalidInstructionForm {
                disp_offset: self.disp_offset,
                instr_len: self.instr_len,
            });
        }
        Ok(())
    }

    /// Read the displacement of the instruction at `instruction_start` and
    /// return the absolute target.
    pub fn resolve<R: ReadMemory + ?Sized>(&self, memory: &R, instruction_start: u64) -> Result<u64> {
        self.validate()?;
        let disp = memory.read_i32(instruction_start.wrapping_add(self.disp_offset as u64))?;
        Ok(self.target(instruction_start, disp))
    }

    pub fn target(&self, instruction_start: u64, disp: i32) -> u64 {
        instruction_start
            .wrapping_add(self.instr_len as u64)
            .wrapping_add_signed(disp as i64)
    }
}

/// Resolve a 7-byte RIP-relative instruction: `start + 7 + disp32@(start+3)`.
pub fn resolve_relative<R: ReadMemory + ?Sized>(memory: &R, instruction_start: u64) -> Result<u64> {
    RelativeInstruction::default().resolve(memory, instruction_start)
}

/// Pure arithmetic behind [`resolve_relative`]
pub fn relative_target(instruction_start: u64, disp: i32) -> u64 {
    RelativeInstruction::default().target(instruction_start, disp)
}
