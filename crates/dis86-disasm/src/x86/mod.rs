//! 16/32-bit x86 instruction decoder.
//!
//! Covers the 8086 through the Pentium:
//! - Segment, lock, repeat and size-override prefixes
//! - One-byte and `0F` two-byte opcode tables with ModRM.reg groups
//! - ModR/M and SIB effective addresses at both address widths
//! - x87 escapes `D8`-`DF`
//! - A separate 8086 opcode map with that part's aliases

mod decoder;
pub mod modrm;
pub mod opcodes;
pub mod prefix;
pub mod x87;

pub use decoder::{CpuModel, DecoderConfig, X86Disassembler, MAX_INSTRUCTION_LENGTH};
pub use modrm::{modrm_address, AddressingMode, ModRm, ModRmAddress, Sib};
