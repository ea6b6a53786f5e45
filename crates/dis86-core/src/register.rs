//! Register identifiers, name tables, and width-tagged register values.
//!
//! General purpose registers are identified by their 3-bit encoding. The
//! same id names a different register depending on the operand width it is
//! read at (`0` is `al`, `ax` or `eax`), so operands carry an id plus a size
//! and the name is picked at render time.

use std::fmt;

use crate::{Error, OperandSize};

// x86 register ids
pub mod x86 {
    // 8-bit
    pub const AL: u8 = 0;
    pub const CL: u8 = 1;
    pub const DL: u8 = 2;
    pub const BL: u8 = 3;
    pub const AH: u8 = 4;
    pub const CH: u8 = 5;
    pub const DH: u8 = 6;
    pub const BH: u8 = 7;

    // 16-bit
    pub const AX: u8 = 0;
    pub const CX: u8 = 1;
    pub const DX: u8 = 2;
    pub const BX: u8 = 3;
    pub const SP: u8 = 4;
    pub const BP: u8 = 5;
    pub const SI: u8 = 6;
    pub const DI: u8 = 7;

    // 32-bit
    pub const EAX: u8 = 0;
    pub const ECX: u8 = 1;
    pub const EDX: u8 = 2;
    pub const EBX: u8 = 3;
    pub const ESP: u8 = 4;
    pub const EBP: u8 = 5;
    pub const ESI: u8 = 6;
    pub const EDI: u8 = 7;

    // Extended 32-bit set, only reachable through the debugger register list
    pub const EIP: u8 = 8;
    pub const EFLAGS: u8 = 9;
    pub const CR0: u8 = 10;
    pub const CR2: u8 = 11;
    pub const CR3: u8 = 12;
    pub const CR4: u8 = 13;
    pub const DR0: u8 = 14;
    pub const DR7: u8 = 21;
    pub const TR3: u8 = 22;
    pub const TR7: u8 = 26;
}

/// Byte register names, indexed by encoding.
pub const REG8_NAMES: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];

/// Word register names, indexed by encoding.
pub const REG16_NAMES: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];

/// Doubleword register names, followed by the control, debug and test registers.
pub const REG32_NAMES: [&str; 27] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "eip", "eflags", "cr0", "cr2", "cr3",
    "cr4", "dr0", "dr1", "dr2", "dr3", "dr4", "dr5", "dr6", "dr7", "tr3", "tr4", "tr5", "tr6",
    "tr7",
];

/// Returns the name of general purpose register `id` read at `size`.
///
/// Sizes wider than 32 bits have no general purpose register of their own
/// in this ISA subset and fall back to the 32-bit names.
pub fn gpr_name(id: u8, size: OperandSize) -> &'static str {
    let id = usize::from(id);
    match size {
        OperandSize::Size8 => REG8_NAMES.get(id).copied().unwrap_or("?"),
        OperandSize::Size16 => REG16_NAMES.get(id).copied().unwrap_or("?"),
        _ => REG32_NAMES.get(id).copied().unwrap_or("?"),
    }
}

/// Segment registers, in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    ES = 0,
    CS = 1,
    SS = 2,
    #[default]
    DS = 3,
    FS = 4,
    GS = 5,
}

impl Segment {
    /// All segment registers, in encoding order.
    pub const ALL: [Segment; 6] = [
        Segment::ES,
        Segment::CS,
        Segment::SS,
        Segment::DS,
        Segment::FS,
        Segment::GS,
    ];

    /// Returns the lowercase register name.
    pub const fn name(self) -> &'static str {
        match self {
            Segment::ES => "es",
            Segment::CS => "cs",
            Segment::SS => "ss",
            Segment::DS => "ds",
            Segment::FS => "fs",
            Segment::GS => "gs",
        }
    }
}

impl TryFrom<u8> for Segment {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Segment::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(Error::InvalidSegment(index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Width of a register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterWidth {
    Byte,
    Word,
    Dword,
    Qword,
}

/// A register value that carries its own width.
///
/// Debugger front ends read and write registers of mixed widths through one
/// list. Each value keeps its width so conversions happen explicitly at the
/// boundary rather than by reinterpreting a wide slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterValue {
    Byte(u8),
    Word(u16),
    Dword(u32),
    Qword(u64),
}

impl RegisterValue {
    /// Builds a value of the given width, truncating `raw` to fit.
    pub fn truncating(width: RegisterWidth, raw: u64) -> Self {
        match width {
            RegisterWidth::Byte => RegisterValue::Byte(raw as u8),
            RegisterWidth::Word => RegisterValue::Word(raw as u16),
            RegisterWidth::Dword => RegisterValue::Dword(raw as u32),
            RegisterWidth::Qword => RegisterValue::Qword(raw),
        }
    }

    /// Returns the width tag.
    pub fn width(&self) -> RegisterWidth {
        match self {
            RegisterValue::Byte(_) => RegisterWidth::Byte,
            RegisterValue::Word(_) => RegisterWidth::Word,
            RegisterValue::Dword(_) => RegisterWidth::Dword,
            RegisterValue::Qword(_) => RegisterWidth::Qword,
        }
    }

    /// Zero-extends the value to 64 bits.
    pub fn zero_extended(&self) -> u64 {
        match *self {
            RegisterValue::Byte(v) => u64::from(v),
            RegisterValue::Word(v) => u64::from(v),
            RegisterValue::Dword(v) => u64::from(v),
            RegisterValue::Qword(v) => v,
        }
    }

    fn mismatch(&self, requested: RegisterWidth) -> Error {
        Error::WidthMismatch {
            actual: self.width(),
            requested,
        }
    }
}

impl TryFrom<RegisterValue> for u8 {
    type Error = Error;

    fn try_from(value: RegisterValue) -> Result<Self, Self::Error> {
        match value {
            RegisterValue::Byte(v) => Ok(v),
            other => Err(other.mismatch(RegisterWidth::Byte)),
        }
    }
}

impl TryFrom<RegisterValue> for u16 {
    type Error = Error;

    fn try_from(value: RegisterValue) -> Result<Self, Self::Error> {
        match value {
            RegisterValue::Word(v) => Ok(v),
            other => Err(other.mismatch(RegisterWidth::Word)),
        }
    }
}

impl TryFrom<RegisterValue> for u32 {
    type Error = Error;

    fn try_from(value: RegisterValue) -> Result<Self, Self::Error> {
        match value {
            RegisterValue::Dword(v) => Ok(v),
            other => Err(other.mismatch(RegisterWidth::Dword)),
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RegisterValue::Byte(v) => write!(f, "{:02X}", v),
            RegisterValue::Word(v) => write!(f, "{:04X}", v),
            RegisterValue::Dword(v) => write!(f, "{:08X}", v),
            RegisterValue::Qword(v) => write!(f, "{:016X}", v),
        }
    }
}
