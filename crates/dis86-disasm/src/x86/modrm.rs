//! ModR/M and SIB byte decoding.
//!
//! Effective-address forms are looked up in one 32-entry table per address
//! width, indexed by `mod << 3 | rm`. Register ids in the 16-bit table are
//! word register ids, those in the 32-bit table doubleword ids.

use dis86_core::register::x86;
use dis86_core::{AddressSize, Segment};

/// Decoded ModR/M byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    /// Mod field (2 bits)
    pub mod_: u8,
    /// Reg field (3 bits)
    pub reg: u8,
    /// R/M field (3 bits)
    pub rm: u8,
}

impl ModRm {
    /// Parse a ModR/M byte.
    pub const fn parse(byte: u8) -> Self {
        Self {
            mod_: (byte >> 6) & 0x3,
            reg: (byte >> 3) & 0x7,
            rm: byte & 0x7,
        }
    }

    /// Returns true if this ModR/M encodes a register operand (mod=11).
    pub const fn is_register(&self) -> bool {
        self.mod_ == 0b11
    }

    /// Index into a 72-entry x87 table: the reg field for memory forms,
    /// `8 + (modrm & 0x3F)` for register forms.
    pub const fn fpu_index(&self) -> usize {
        if self.is_register() {
            8 + ((self.reg as usize) << 3 | self.rm as usize)
        } else {
            self.reg as usize
        }
    }
}

/// Decoded SIB byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sib {
    /// Scale (2 bits) - actual scale is 1 << scale
    pub scale: u8,
    /// Index register (3 bits)
    pub index: u8,
    /// Base register (3 bits)
    pub base: u8,
}

impl Sib {
    /// Parse a SIB byte.
    pub const fn parse(byte: u8) -> Self {
        Self {
            scale: (byte >> 6) & 0x3,
            index: (byte >> 3) & 0x7,
            base: byte & 0x7,
        }
    }

    /// Returns the actual scale factor (1, 2, 4, or 8).
    pub const fn scale_factor(&self) -> u8 {
        1 << self.scale
    }

    /// Index `100` means no index register.
    pub const fn has_index(&self) -> bool {
        self.index != x86::ESP
    }

    /// Base `101` under mod `00` means no base; a 32-bit displacement
    /// follows instead.
    pub const fn has_base(&self, mod_: u8) -> bool {
        self.base != x86::EBP || mod_ != 0
    }
}

/// Shape of a ModR/M effective-address form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// `mod == 11`, the operand is a register.
    Register,
    /// Displacement only.
    Direct,
    /// `[base]`
    Indirect,
    /// `[base + disp]`
    Indexed,
    /// `[base + index]`
    BasedIndexed,
    /// `[base + index + disp]`
    BasedIndexedDisplacement,
    /// A SIB byte follows.
    Sib,
}

/// One row of a ModR/M table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModRmAddress {
    pub mode: AddressingMode,
    /// Base register id, or the register itself for `Register`.
    pub base: u8,
    /// Index register id for the based-indexed forms.
    pub index: Option<u8>,
    /// Displacement bytes following ModR/M (0, 1, 2 or 4). For `Sib` this is
    /// the size when the SIB byte names a base.
    pub displacement_size: u8,
    /// Segment used unless overridden.
    pub default_segment: Segment,
}

impl ModRmAddress {
    const fn new(
        mode: AddressingMode,
        base: u8,
        index: Option<u8>,
        displacement_size: u8,
        default_segment: Segment,
    ) -> Self {
        Self {
            mode,
            base,
            index,
            displacement_size,
            default_segment,
        }
    }

    const fn register(reg: u8) -> Self {
        Self::new(AddressingMode::Register, reg, None, 0, Segment::DS)
    }

    const fn direct(displacement_size: u8) -> Self {
        Self::new(AddressingMode::Direct, 0, None, displacement_size, Segment::DS)
    }

    const fn indirect(base: u8, segment: Segment) -> Self {
        Self::new(AddressingMode::Indirect, base, None, 0, segment)
    }

    const fn indexed(base: u8, displacement_size: u8, segment: Segment) -> Self {
        Self::new(AddressingMode::Indexed, base, None, displacement_size, segment)
    }

    const fn based(base: u8, index: u8, displacement_size: u8, segment: Segment) -> Self {
        let mode = if displacement_size == 0 {
            AddressingMode::BasedIndexed
        } else {
            AddressingMode::BasedIndexedDisplacement
        };
        Self::new(mode, base, Some(index), displacement_size, segment)
    }

    const fn sib(displacement_size: u8) -> Self {
        Self::new(AddressingMode::Sib, 0, None, displacement_size, Segment::DS)
    }
}

const fn table_index(modrm: u8) -> usize {
    (((modrm & 0xC0) >> 3) | (modrm & 0x07)) as usize
}

const fn modrm16_row(mod_: u8, displacement_size: u8) -> [ModRmAddress; 8] {
    use dis86_core::register::x86::{BP, BX, DI, SI};
    use dis86_core::Segment::{DS, SS};
    let row6 = if mod_ == 0 {
        ModRmAddress::direct(2)
    } else {
        ModRmAddress::indexed(BP, displacement_size, SS)
    };
    if displacement_size == 0 {
        [
            ModRmAddress::based(BX, SI, 0, DS),
            ModRmAddress::based(BX, DI, 0, DS),
            ModRmAddress::based(BP, SI, 0, SS),
            ModRmAddress::based(BP, DI, 0, SS),
            ModRmAddress::indirect(SI, DS),
            ModRmAddress::indirect(DI, DS),
            row6,
            ModRmAddress::indirect(BX, DS),
        ]
    } else {
        [
            ModRmAddress::based(BX, SI, displacement_size, DS),
            ModRmAddress::based(BX, DI, displacement_size, DS),
            ModRmAddress::based(BP, SI, displacement_size, SS),
            ModRmAddress::based(BP, DI, displacement_size, SS),
            ModRmAddress::indexed(SI, displacement_size, DS),
            ModRmAddress::indexed(DI, displacement_size, DS),
            row6,
            ModRmAddress::indexed(BX, displacement_size, DS),
        ]
    }
}

const fn modrm32_row(displacement_size: u8) -> [ModRmAddress; 8] {
    use dis86_core::Segment::{DS, SS};
    let mut row = [ModRmAddress::sib(displacement_size); 8];
    let mut reg = 0;
    while reg < 8 {
        if reg != x86::ESP {
            let segment = if reg == x86::EBP { SS } else { DS };
            row[reg as usize] = if displacement_size == 0 {
                ModRmAddress::indirect(reg, segment)
            } else {
                ModRmAddress::indexed(reg, displacement_size, segment)
            };
        }
        reg += 1;
    }
    if displacement_size == 0 {
        row[x86::EBP as usize] = ModRmAddress::direct(4);
    }
    row
}

const fn register_row() -> [ModRmAddress; 8] {
    let mut row = [ModRmAddress::register(0); 8];
    let mut reg = 0;
    while reg < 8 {
        row[reg as usize] = ModRmAddress::register(reg);
        reg += 1;
    }
    row
}

const fn assemble(rows: [[ModRmAddress; 8]; 4]) -> [ModRmAddress; 32] {
    let mut table = [ModRmAddress::register(0); 32];
    let mut i = 0;
    while i < 32 {
        table[i] = rows[i / 8][i % 8];
        i += 1;
    }
    table
}

/// 16-bit effective-address forms.
pub static MODRM_TABLE_16: [ModRmAddress; 32] = assemble([
    modrm16_row(0, 0),
    modrm16_row(1, 1),
    modrm16_row(2, 2),
    register_row(),
]);

/// 32-bit effective-address forms.
pub static MODRM_TABLE_32: [ModRmAddress; 32] = assemble([
    modrm32_row(0),
    modrm32_row(1),
    modrm32_row(4),
    register_row(),
]);

/// Returns the effective-address form `modrm` selects at `address_size`.
pub fn modrm_address(address_size: AddressSize, modrm: u8) -> &'static ModRmAddress {
    let table = match address_size {
        AddressSize::Size16 => &MODRM_TABLE_16,
        AddressSize::Size32 => &MODRM_TABLE_32,
    };
    &table[table_index(modrm)]
}
