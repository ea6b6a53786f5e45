//! Instruction operand types.

use crate::Segment;

/// Width of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandSize {
    Size8,
    #[default]
    Size16,
    Size32,
    Size64,
    Size80,
}

impl OperandSize {
    /// Returns the width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            OperandSize::Size8 => 8,
            OperandSize::Size16 => 16,
            OperandSize::Size32 => 32,
            OperandSize::Size64 => 64,
            OperandSize::Size80 => 80,
        }
    }

    /// Returns the `ptr` keyword used for memory operands of this width.
    pub const fn ptr_name(self) -> &'static str {
        match self {
            OperandSize::Size8 => "byte",
            OperandSize::Size16 => "word",
            OperandSize::Size32 => "dword",
            OperandSize::Size64 => "qword",
            OperandSize::Size80 => "tword",
        }
    }

    /// Returns the string-instruction mnemonic suffix (`b`, `w` or `d`).
    pub const fn suffix(self) -> &'static str {
        match self {
            OperandSize::Size8 => "b",
            OperandSize::Size16 => "w",
            _ => "d",
        }
    }

    /// Toggles between 16 and 32 bits, as an operand-size prefix does.
    pub const fn toggled(self) -> Self {
        match self {
            OperandSize::Size16 => OperandSize::Size32,
            _ => OperandSize::Size16,
        }
    }
}

/// Width of effective-address computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressSize {
    #[default]
    Size16,
    Size32,
}

impl AddressSize {
    /// Returns the width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            AddressSize::Size16 => 16,
            AddressSize::Size32 => 32,
        }
    }

    /// Toggles between 16 and 32 bits, as an address-size prefix does.
    pub const fn toggled(self) -> Self {
        match self {
            AddressSize::Size16 => AddressSize::Size32,
            AddressSize::Size32 => AddressSize::Size16,
        }
    }
}

/// Branch condition, in the order the condition suffixes are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JumpCondition {
    Always,
    Overflow,
    NotOverflow,
    Sign,
    NotSign,
    Equal,
    NotEqual,
    Below,
    AboveOrEqual,
    BelowOrEqual,
    Above,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Parity,
    NotParity,
    CXZero,
}

impl JumpCondition {
    /// Returns the mnemonic fragment appended to `j`, `set`, `cmov` and `loop`.
    pub const fn suffix(self) -> &'static str {
        match self {
            JumpCondition::Always => "",
            JumpCondition::Overflow => "o",
            JumpCondition::NotOverflow => "no",
            JumpCondition::Sign => "s",
            JumpCondition::NotSign => "ns",
            JumpCondition::Equal => "e",
            JumpCondition::NotEqual => "ne",
            JumpCondition::Below => "b",
            JumpCondition::AboveOrEqual => "ae",
            JumpCondition::BelowOrEqual => "be",
            JumpCondition::Above => "a",
            JumpCondition::Less => "l",
            JumpCondition::GreaterOrEqual => "ge",
            JumpCondition::LessOrEqual => "le",
            JumpCondition::Greater => "g",
            JumpCondition::Parity => "p",
            JumpCondition::NotParity => "np",
            JumpCondition::CXZero => "cxz",
        }
    }

    /// Returns the condition encoded in the low nibble of a `Jcc`, `SETcc`
    /// or `CMOVcc` opcode.
    pub const fn from_cc(cc: u8) -> Self {
        match cc & 0xF {
            0x0 => JumpCondition::Overflow,
            0x1 => JumpCondition::NotOverflow,
            0x2 => JumpCondition::Below,
            0x3 => JumpCondition::AboveOrEqual,
            0x4 => JumpCondition::Equal,
            0x5 => JumpCondition::NotEqual,
            0x6 => JumpCondition::BelowOrEqual,
            0x7 => JumpCondition::Above,
            0x8 => JumpCondition::Sign,
            0x9 => JumpCondition::NotSign,
            0xA => JumpCondition::Parity,
            0xB => JumpCondition::NotParity,
            0xC => JumpCondition::Less,
            0xD => JumpCondition::GreaterOrEqual,
            0xE => JumpCondition::LessOrEqual,
            _ => JumpCondition::Greater,
        }
    }
}

/// Where an operand's value comes from.
///
/// Values fixed by the opcode (a register, a constant, a condition) are held
/// in the variant. Values taken from the instruction stream (immediates,
/// displacements, ModRM fields) live in [`InstructionData`](crate::InstructionData).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandMode {
    /// Slot unused.
    #[default]
    None,
    /// Immediate baked into the opcode, e.g. the `1` of `shl al, 1`.
    Constant(u32),
    /// General purpose register fixed by the opcode, read at the operand size.
    Register(u8),
    /// Memory addressed by a string register (`esi` or `edi`).
    RegisterIndirect(u8),
    /// Segment register fixed by the opcode.
    SegmentRegister(Segment),
    /// Immediate from the instruction stream.
    Immediate,
    /// Second immediate (`enter`).
    Immediate2,
    /// Signed displacement relative to the next instruction.
    Relative,
    /// Direct memory offset (`mov al, [moffs]`).
    Memory,
    /// Far pointer `segment:offset`.
    FarAddress,
    /// Register selected by ModRM.reg.
    ModRmReg,
    /// Register or memory selected by ModRM.mod and ModRM.rm.
    ModRmRm,
    /// General register selected by ModRM.rm whatever the mod field says
    /// (`mov eax, cr0`). Never has a SIB byte or displacement.
    ModRmRmRegister,
    /// Segment register selected by ModRM.reg.
    ModRmSegmentReg,
    /// Control register selected by ModRM.reg.
    ModRmControlRegister,
    /// Debug register selected by ModRM.reg.
    ModRmDebugRegister,
    /// Test register selected by ModRM.reg.
    ModRmTestRegister,
    /// x87 stack register `st(i)`.
    FpRegister(u8),
    /// Branch condition, consumed by the mnemonic rather than printed as an operand.
    JumpCondition(JumpCondition),
}

/// An instruction operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    /// Where the value comes from.
    pub mode: OperandMode,
    /// Effective width of the value.
    pub size: OperandSize,
}

impl Operand {
    /// Creates an operand.
    pub const fn new(mode: OperandMode, size: OperandSize) -> Self {
        Self { mode, size }
    }

    /// Returns true if the slot is unused.
    pub fn is_none(&self) -> bool {
        matches!(self.mode, OperandMode::None)
    }
}
