//! x86 prefix handling.

use dis86_core::{Operation, Segment};

/// A single prefix byte's meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// Segment override (`26 2E 36 3E 64 65`).
    Segment(Segment),
    /// `F0`
    Lock,
    /// `F3`
    Rep,
    /// `F2`
    RepNe,
    /// `66`
    OperandSize,
    /// `67`
    AddressSize,
}

impl Prefix {
    /// Returns the prefix encoded by `byte`, if it is one.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x26 => Prefix::Segment(Segment::ES),
            0x2E => Prefix::Segment(Segment::CS),
            0x36 => Prefix::Segment(Segment::SS),
            0x3E => Prefix::Segment(Segment::DS),
            0x64 => Prefix::Segment(Segment::FS),
            0x65 => Prefix::Segment(Segment::GS),
            0xF0 => Prefix::Lock,
            0xF2 => Prefix::RepNe,
            0xF3 => Prefix::Rep,
            0x66 => Prefix::OperandSize,
            0x67 => Prefix::AddressSize,
            _ => return None,
        })
    }

    /// Returns the table marker for this prefix.
    pub const fn operation(self) -> Operation {
        match self {
            Prefix::Segment(_) => Operation::SegmentPrefix,
            Prefix::Lock => Operation::LockPrefix,
            Prefix::Rep => Operation::RepPrefix,
            Prefix::RepNe => Operation::RepNePrefix,
            Prefix::OperandSize => Operation::OperandSizePrefix,
            Prefix::AddressSize => Operation::AddressSizePrefix,
        }
    }
}

/// Prefix state accumulated ahead of the opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prefixes {
    /// LOCK prefix (0xF0)
    pub lock: bool,
    /// Some repeat prefix (0xF2 or 0xF3)
    pub rep: bool,
    /// The last repeat prefix was 0xF2
    pub repne: bool,
    /// Segment override
    pub segment: Option<Segment>,
    /// Operand size override (0x66)
    pub operand_size: bool,
    /// Address size override (0x67)
    pub address_size: bool,
}

impl Prefixes {
    /// Records one prefix. Repeat and segment prefixes follow the last one
    /// seen; the size overrides are flags, so repeating them changes nothing.
    pub fn apply(&mut self, prefix: Prefix) {
        match prefix {
            Prefix::Segment(segment) => self.segment = Some(segment),
            Prefix::Lock => self.lock = true,
            Prefix::Rep => {
                self.rep = true;
                self.repne = false;
            }
            Prefix::RepNe => {
                self.rep = true;
                self.repne = true;
            }
            Prefix::OperandSize => self.operand_size = true,
            Prefix::AddressSize => self.address_size = true,
        }
    }
}
