//! # dis86-core
//!
//! Instruction model for the dis86 x86 disassembler. This crate defines the
//! types a decoded 16/32-bit x86 instruction is made of: operations,
//! operand shapes, effective widths, segments, and register names.
//!
//! Decoding and rendering live in `dis86-disasm`; nothing here touches a
//! byte stream.

pub mod error;
pub mod instruction;
pub mod operand;
pub mod register;

pub use error::Error;
pub use instruction::{Instruction, InstructionData, Operation};
pub use operand::{AddressSize, JumpCondition, Operand, OperandMode, OperandSize};
pub use register::{RegisterValue, RegisterWidth, Segment};
