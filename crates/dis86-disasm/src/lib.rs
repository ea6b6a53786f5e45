//! # dis86-disasm
//!
//! Table-driven decoder for 16- and 32-bit x86 machine code, covering the
//! 8086 through Pentium integer sets and the x87 FPU.
//!
//! - [`X86Disassembler`] turns bytes into [`Instruction`](dis86_core::Instruction) values
//! - [`format_instruction`] renders them as Intel-style assembly text
//! - [`BoundaryScanner`] finds where the instruction ending at an address starts
//! - [`Listing`] produces debugger-style listing lines over a memory view

pub mod display;
pub mod error;
pub mod listing;
pub mod scanner;
pub mod source;
pub mod traits;
pub mod x86;

pub use display::{format_instruction, Disassembly};
pub use error::DecodeError;
pub use listing::{DebugTarget, Listing, ListingLine};
pub use scanner::BoundaryScanner;
pub use source::{ByteSource, CodeMemory, MemoryImage, MemorySource, SliceSource};
pub use traits::Disassembler;
pub use x86::{CpuModel, DecoderConfig, X86Disassembler, MAX_INSTRUCTION_LENGTH};
