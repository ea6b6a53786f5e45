//! x86 instruction decoder.

use dis86_core::instruction::MAX_OPERANDS;
use dis86_core::register::x86;
use dis86_core::{
    AddressSize, Instruction, InstructionData, Operand, OperandMode, OperandSize, Segment,
};

use super::modrm::{modrm_address, AddressingMode, ModRm, Sib};
use super::opcodes::{OpcodeEntry, TableEntry, OPCODE_TABLE, OPCODE_TABLE_8086};
use super::prefix::Prefixes;
use crate::error::DecodeError;
use crate::source::{ByteSource, CodeMemory, MemorySource, SliceSource};
use crate::traits::Disassembler;

/// Longest encoding the processor accepts, prefixes included.
pub const MAX_INSTRUCTION_LENGTH: usize = 15;

/// Processor whose opcode map the decoder follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CpuModel {
    /// 8086/8088. Only 16-bit code: `0F` is `pop cs`, `60`-`6F` repeat the
    /// `Jcc` block, `C0`/`C1`/`C8`/`C9` are returns, `F1` is `lock` and the
    /// x87 escapes decode as `esc`.
    Intel8086,
    /// 386 through Pentium, with x87.
    #[default]
    Intel386,
}

impl CpuModel {
    /// Returns the one-byte opcode table.
    pub fn opcode_table(self) -> &'static [TableEntry; 256] {
        match self {
            CpuModel::Intel8086 => &OPCODE_TABLE_8086,
            CpuModel::Intel386 => &OPCODE_TABLE,
        }
    }

    /// Number of segment registers a ModRM.reg field may name.
    pub const fn segment_registers(self) -> u8 {
        match self {
            CpuModel::Intel8086 => 4,
            CpuModel::Intel386 => 6,
        }
    }
}

/// Processor model and default widths of the decoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderConfig {
    /// Opcode map in use.
    pub cpu: CpuModel,
    /// Operand size before any `66` prefix.
    pub operand_size: OperandSize,
    /// Address size before any `67` prefix.
    pub address_size: AddressSize,
}

impl DecoderConfig {
    /// Real mode and 16-bit protected mode.
    pub const fn real_mode() -> Self {
        Self {
            cpu: CpuModel::Intel386,
            operand_size: OperandSize::Size16,
            address_size: AddressSize::Size16,
        }
    }

    /// 32-bit protected mode.
    pub const fn protected_mode() -> Self {
        Self {
            cpu: CpuModel::Intel386,
            operand_size: OperandSize::Size32,
            address_size: AddressSize::Size32,
        }
    }

    /// An 8086 or 8088.
    pub const fn intel_8086() -> Self {
        Self {
            cpu: CpuModel::Intel8086,
            operand_size: OperandSize::Size16,
            address_size: AddressSize::Size16,
        }
    }

    /// Returns the 386 preset for a 16- or 32-bit code segment.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        Self::for_cpu(CpuModel::Intel386, bits)
    }

    /// Returns the preset for `cpu` running `bits`-wide code. The 8086 only
    /// has 16-bit code.
    pub const fn for_cpu(cpu: CpuModel, bits: u32) -> Option<Self> {
        match (cpu, bits) {
            (CpuModel::Intel8086, 16) => Some(Self::intel_8086()),
            (CpuModel::Intel386, 16) => Some(Self::real_mode()),
            (CpuModel::Intel386, 32) => Some(Self::protected_mode()),
            _ => None,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::real_mode()
    }
}

/// Counts and records every byte one decode pulls from its source.
struct Fetcher<'s, S: ?Sized> {
    source: &'s mut S,
    address: u32,
    bytes: [u8; MAX_INSTRUCTION_LENGTH],
    length: usize,
}

impl<'s, S: ByteSource + ?Sized> Fetcher<'s, S> {
    fn new(source: &'s mut S, address: u32) -> Self {
        Self {
            source,
            address,
            bytes: [0; MAX_INSTRUCTION_LENGTH],
            length: 0,
        }
    }

    fn consumed(&self) -> &[u8] {
        &self.bytes[..self.length]
    }

    fn reserve(&self, width: usize) -> Result<(), DecodeError> {
        if self.length + width > MAX_INSTRUCTION_LENGTH {
            return Err(DecodeError::too_long(self.address, MAX_INSTRUCTION_LENGTH));
        }
        Ok(())
    }

    fn record(&mut self, bytes: &[u8]) {
        self.bytes[self.length..self.length + bytes.len()].copy_from_slice(bytes);
        self.length += bytes.len();
    }

    fn exhausted(&self, width: usize) -> DecodeError {
        DecodeError::truncated(self.address, self.length + width, self.length)
    }

    fn byte(&mut self) -> Result<u8, DecodeError> {
        self.reserve(1)?;
        let value = self.source.fetch_byte().ok_or_else(|| self.exhausted(1))?;
        self.record(&[value]);
        Ok(value)
    }

    fn word(&mut self) -> Result<u16, DecodeError> {
        self.reserve(2)?;
        let value = self.source.fetch_word().ok_or_else(|| self.exhausted(2))?;
        self.record(&value.to_le_bytes());
        Ok(value)
    }

    fn dword(&mut self) -> Result<u32, DecodeError> {
        self.reserve(4)?;
        let value = self.source.fetch_dword().ok_or_else(|| self.exhausted(4))?;
        self.record(&value.to_le_bytes());
        Ok(value)
    }

    /// Fetches a zero-extended value of the given width.
    fn unsigned(&mut self, size: OperandSize) -> Result<u32, DecodeError> {
        match size {
            OperandSize::Size8 => self.byte().map(u32::from),
            OperandSize::Size16 => self.word().map(u32::from),
            _ => self.dword(),
        }
    }

    /// Fetches a sign-extended value of the given width.
    fn signed(&mut self, size: OperandSize) -> Result<u32, DecodeError> {
        match size {
            OperandSize::Size8 => self.byte().map(|v| v as i8 as i32 as u32),
            OperandSize::Size16 => self.word().map(|v| v as i16 as i32 as u32),
            _ => self.dword(),
        }
    }

    /// Fetches a sign-extended displacement of 0, 1, 2 or 4 bytes.
    fn displacement(&mut self, bytes: u8) -> Result<u32, DecodeError> {
        match bytes {
            0 => Ok(0),
            1 => self.signed(OperandSize::Size8),
            2 => self.signed(OperandSize::Size16),
            _ => self.dword(),
        }
    }
}

/// Table-driven 16/32-bit x86 decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Disassembler {
    config: DecoderConfig,
}

impl X86Disassembler {
    /// Creates a decoder for the given mode.
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Creates a decoder for 16-bit code.
    pub fn real_mode() -> Self {
        Self::new(DecoderConfig::real_mode())
    }

    /// Creates a decoder for 32-bit code.
    pub fn protected_mode() -> Self {
        Self::new(DecoderConfig::protected_mode())
    }

    /// Creates a decoder for 8086/8088 code.
    pub fn intel_8086() -> Self {
        Self::new(DecoderConfig::intel_8086())
    }

    /// Returns the decoding mode.
    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Decodes one instruction from memory at a linear address.
    pub fn decode_at<M: CodeMemory + ?Sized>(
        &self,
        memory: &M,
        address: u32,
    ) -> Result<Instruction, DecodeError> {
        let mut source = MemorySource::new(memory, address);
        self.decode(&mut source, address)
    }

    /// Decodes one instruction, pulling bytes from `source`.
    ///
    /// `address` is the linear address of the first byte and is only used
    /// for bookkeeping and relative targets. On failure nothing is returned
    /// but the source may have been advanced.
    pub fn decode<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
        address: u32,
    ) -> Result<Instruction, DecodeError> {
        let mut fetch = Fetcher::new(source, address);

        let table = self.config.cpu.opcode_table();
        let mut prefixes = Prefixes::default();
        let mut row = loop {
            let byte = fetch.byte()?;
            match table[usize::from(byte)] {
                TableEntry::Prefix(prefix) => prefixes.apply(prefix),
                row => break row,
            }
        };

        let operand_size = if prefixes.operand_size {
            self.config.operand_size.toggled()
        } else {
            self.config.operand_size
        };
        let address_size = if prefixes.address_size {
            self.config.address_size.toggled()
        } else {
            self.config.address_size
        };

        let mut data = InstructionData {
            operand_size,
            address_size,
            segment: prefixes.segment.unwrap_or(Segment::DS),
            segment_override: prefixes.segment,
            lock: prefixes.lock,
            rep: prefixes.rep,
            repne: prefixes.repne,
            ..InstructionData::default()
        };

        // ModRM is fetched at most once and shared by table lookup and operands.
        let mut modrm: Option<ModRm> = None;

        let entry: OpcodeEntry = loop {
            row = match row {
                TableEntry::Op(entry) => break entry,
                TableEntry::Escape(table) => table[usize::from(fetch.byte()?)],
                TableEntry::Group(table) => {
                    let modrm = fetch_modrm(&mut fetch, &mut data, &mut modrm)?;
                    table[usize::from(modrm.reg)]
                }
                TableEntry::Fpu(table) => {
                    let modrm = fetch_modrm(&mut fetch, &mut data, &mut modrm)?;
                    table[modrm.fpu_index()]
                }
                TableEntry::Invalid | TableEntry::Prefix(_) => {
                    return Err(DecodeError::invalid_opcode(address, fetch.consumed()));
                }
            };
        };

        let mut operands = [Operand::default(); MAX_OPERANDS];
        let mut rm_resolved = false;

        for (slot, template) in operands.iter_mut().zip(entry.operands.iter()) {
            let size = template.size.unwrap_or(operand_size);
            *slot = Operand::new(template.mode, size);

            match template.mode {
                OperandMode::ModRmSegmentReg => {
                    let modrm = fetch_modrm(&mut fetch, &mut data, &mut modrm)?;
                    if modrm.reg >= self.config.cpu.segment_registers() {
                        return Err(DecodeError::invalid_opcode(address, fetch.consumed()));
                    }
                }
                OperandMode::ModRmReg
                | OperandMode::ModRmControlRegister
                | OperandMode::ModRmDebugRegister
                | OperandMode::ModRmTestRegister => {
                    fetch_modrm(&mut fetch, &mut data, &mut modrm)?;
                }
                OperandMode::ModRmRm => {
                    let modrm = fetch_modrm(&mut fetch, &mut data, &mut modrm)?;
                    if !rm_resolved {
                        resolve_rm(&mut fetch, &mut data, modrm, prefixes.segment)?;
                        rm_resolved = true;
                    }
                }
                OperandMode::ModRmRmRegister => {
                    fetch_modrm(&mut fetch, &mut data, &mut modrm)?;
                    data.modrm_rm_register = true;
                }
                OperandMode::Immediate => data.immediate = fetch.unsigned(size)?,
                OperandMode::Immediate2 => data.immediate2 = fetch.unsigned(size)?,
                OperandMode::Relative => data.displacement = fetch.signed(size)?,
                OperandMode::Memory => {
                    data.displacement = match address_size {
                        AddressSize::Size16 => u32::from(fetch.word()?),
                        AddressSize::Size32 => fetch.dword()?,
                    };
                }
                OperandMode::FarAddress => {
                    data.displacement = fetch.unsigned(size)?;
                    data.immediate = u32::from(fetch.word()?);
                }
                OperandMode::None
                | OperandMode::Constant(_)
                | OperandMode::Register(_)
                | OperandMode::RegisterIndirect(_)
                | OperandMode::SegmentRegister(_)
                | OperandMode::FpRegister(_)
                | OperandMode::JumpCondition(_) => {}
            }
        }

        Ok(Instruction {
            address,
            length: fetch.length as u32,
            operation: entry.operation,
            operands,
            data,
        })
    }
}

fn fetch_modrm<S: ByteSource + ?Sized>(
    fetch: &mut Fetcher<'_, S>,
    data: &mut InstructionData,
    cached: &mut Option<ModRm>,
) -> Result<ModRm, DecodeError> {
    if let Some(modrm) = *cached {
        return Ok(modrm);
    }
    let byte = fetch.byte()?;
    data.modrm = byte;
    let modrm = ModRm::parse(byte);
    *cached = Some(modrm);
    Ok(modrm)
}

/// Resolves the ModRM r/m operand: fetches any SIB byte and displacement and
/// picks the segment.
fn resolve_rm<S: ByteSource + ?Sized>(
    fetch: &mut Fetcher<'_, S>,
    data: &mut InstructionData,
    modrm: ModRm,
    segment_override: Option<Segment>,
) -> Result<(), DecodeError> {
    let address = modrm_address(data.address_size, data.modrm);

    let (displacement_size, default_segment) = match address.mode {
        AddressingMode::Register => {
            data.modrm_rm_register = true;
            return Ok(());
        }
        AddressingMode::Sib => {
            let byte = fetch.byte()?;
            data.sib = byte;
            let sib = Sib::parse(byte);
            if sib.has_base(modrm.mod_) {
                let segment = if sib.base == x86::EBP {
                    Segment::SS
                } else {
                    Segment::DS
                };
                (address.displacement_size, segment)
            } else {
                (4, Segment::DS)
            }
        }
        _ => (address.displacement_size, address.default_segment),
    };

    data.segment = segment_override.unwrap_or(default_segment);
    data.displacement = fetch.displacement(displacement_size)?;
    Ok(())
}

impl Disassembler for X86Disassembler {
    fn decode_instruction(&self, bytes: &[u8], address: u32) -> Result<Instruction, DecodeError> {
        let mut source = SliceSource::new(bytes);
        self.decode(&mut source, address)
    }

    fn min_instruction_size(&self) -> usize {
        1
    }

    fn max_instruction_size(&self) -> usize {
        MAX_INSTRUCTION_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dis86_core::{JumpCondition, Operation};

    fn decode16(bytes: &[u8]) -> Instruction {
        X86Disassembler::real_mode()
            .decode_instruction(bytes, 0x100)
            .unwrap()
    }

    fn decode32(bytes: &[u8]) -> Instruction {
        X86Disassembler::protected_mode()
            .decode_instruction(bytes, 0x1000)
            .unwrap()
    }

    #[test]
    fn test_nop() {
        let inst = decode16(&[0x90]);
        assert_eq!(inst.operation, Operation::Nop);
        assert_eq!(inst.length, 1);
        assert_eq!(inst.address, 0x100);
    }

    #[test]
    fn test_mov_al_imm8() {
        let inst = decode16(&[0xB0, 0x05]);
        assert_eq!(inst.operation, Operation::Mov);
        assert_eq!(
            inst.operands[0],
            Operand::new(OperandMode::Register(x86::AL), OperandSize::Size8)
        );
        assert_eq!(
            inst.operands[1],
            Operand::new(OperandMode::Immediate, OperandSize::Size8)
        );
        assert_eq!(inst.data.immediate, 0x05);
        assert_eq!(inst.length, 2);
    }

    #[test]
    fn test_mov_esp_sib() {
        let inst = decode32(&[0x89, 0x04, 0x24]);
        assert_eq!(inst.operation, Operation::Mov);
        assert_eq!(inst.operands[0].mode, OperandMode::ModRmRm);
        assert_eq!(inst.operands[0].size, OperandSize::Size32);
        assert_eq!(inst.operands[1].mode, OperandMode::ModRmReg);
        assert!(!inst.data.modrm_rm_register);
        assert_eq!(inst.data.sib_base(), x86::ESP);
        assert!(!inst.data.has_sib_index());
        assert_eq!(inst.data.displacement, 0);
        assert_eq!(inst.data.segment, Segment::DS);
        assert_eq!(inst.length, 3);
    }

    #[test]
    fn test_repne_scasb() {
        let inst = decode16(&[0xF2, 0xAE]);
        assert_eq!(inst.operation, Operation::Scas);
        assert!(inst.data.rep);
        assert!(inst.data.repne);
        assert_eq!(inst.length, 2);
    }

    #[test]
    fn test_operand_size_override() {
        // 66 B8 78 56 34 12: mov eax, 12345678h in 16-bit code
        let inst = decode16(&[0x66, 0xB8, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(inst.data.operand_size, OperandSize::Size32);
        assert_eq!(inst.operands[0].size, OperandSize::Size32);
        assert_eq!(inst.data.immediate, 0x1234_5678);
        assert_eq!(inst.length, 6);

        // 66 B8 34 12: mov ax, 1234h in 32-bit code
        let inst = decode32(&[0x66, 0xB8, 0x34, 0x12]);
        assert_eq!(inst.data.operand_size, OperandSize::Size16);
        assert_eq!(inst.length, 4);
    }

    #[test]
    fn test_address_size_override() {
        // 67 8B 00: mov ax, [eax] in 16-bit code
        let inst = decode16(&[0x67, 0x8B, 0x00]);
        assert_eq!(inst.data.address_size, AddressSize::Size32);
        assert_eq!(inst.length, 3);

        // 67 A1 34 12: mov eax, [1234h] in 32-bit code
        let inst = decode32(&[0x67, 0xA1, 0x34, 0x12]);
        assert_eq!(inst.data.displacement, 0x1234);
        assert_eq!(inst.length, 4);
    }

    #[test]
    fn test_bp_defaults_to_ss() {
        // 8B 46 FE: mov ax, [bp-2]
        let inst = decode16(&[0x8B, 0x46, 0xFE]);
        assert_eq!(inst.data.segment, Segment::SS);
        assert_eq!(inst.data.displacement as i32, -2);

        // 8B 45 08: mov eax, [ebp+8]
        let inst = decode32(&[0x8B, 0x45, 0x08]);
        assert_eq!(inst.data.segment, Segment::SS);
    }

    #[test]
    fn test_segment_override_wins() {
        // 26 8B 46 00: mov ax, es:[bp+0]
        let inst = decode16(&[0x26, 0x8B, 0x46, 0x00]);
        assert_eq!(inst.data.segment, Segment::ES);
        assert_eq!(inst.data.segment_override, Some(Segment::ES));
    }

    #[test]
    fn test_sib_without_base() {
        // 8B 04 8D 00 10 00 00: mov eax, [ecx*4+1000h]
        let inst = decode32(&[0x8B, 0x04, 0x8D, 0x00, 0x10, 0x00, 0x00]);
        assert!(!inst.data.has_sib_base());
        assert_eq!(inst.data.sib_index(), x86::ECX);
        assert_eq!(inst.data.displacement, 0x1000);
        assert_eq!(inst.length, 7);
    }

    #[test]
    fn test_sib_ebp_base_uses_ss() {
        // 8B 44 25 10: mov eax, [ebp+10h] via SIB
        let inst = decode32(&[0x8B, 0x44, 0x25, 0x10]);
        assert!(inst.data.has_sib_base());
        assert_eq!(inst.data.segment, Segment::SS);
        assert_eq!(inst.length, 4);
    }

    #[test]
    fn test_group_uses_single_modrm() {
        // 83 C0 10: add ax, 10h
        let inst = decode16(&[0x83, 0xC0, 0x10]);
        assert_eq!(inst.operation, Operation::Add);
        assert!(inst.data.modrm_rm_register);
        assert_eq!(inst.data.immediate, 0x10);
        assert_eq!(inst.length, 3);

        // 81 3E 34 12 78 56: cmp word [1234h], 5678h
        let inst = decode16(&[0x81, 0x3E, 0x34, 0x12, 0x78, 0x56]);
        assert_eq!(inst.operation, Operation::Cmp);
        assert_eq!(inst.data.displacement, 0x1234);
        assert_eq!(inst.data.immediate, 0x5678);
        assert_eq!(inst.length, 6);
    }

    #[test]
    fn test_two_byte_escape() {
        // 0F B6 C1: movzx ax, cl
        let inst = decode16(&[0x0F, 0xB6, 0xC1]);
        assert_eq!(inst.operation, Operation::Movzx);
        assert_eq!(inst.operands[1].size, OperandSize::Size8);

        // 0F 84 10 00 00 00: je rel32
        let inst = decode32(&[0x0F, 0x84, 0x10, 0x00, 0x00, 0x00]);
        assert_eq!(inst.operation, Operation::Jcc);
        assert_eq!(
            inst.operands[0].mode,
            OperandMode::JumpCondition(JumpCondition::Equal)
        );
        assert_eq!(inst.length, 6);
    }

    #[test]
    fn test_relative_sign_extension() {
        // EB FE: jmp $
        let inst = decode16(&[0xEB, 0xFE]);
        assert_eq!(inst.data.signed_displacement(), -2);
    }

    #[test]
    fn test_far_address() {
        // EA 00 7C 00 00: jmp far 0000:7C00
        let inst = decode16(&[0xEA, 0x00, 0x7C, 0x00, 0x00]);
        assert_eq!(inst.operation, Operation::JmpFar);
        assert_eq!(inst.data.displacement, 0x7C00);
        assert_eq!(inst.data.immediate, 0x0000);
        assert_eq!(inst.length, 5);
    }

    #[test]
    fn test_enter_two_immediates() {
        let inst = decode16(&[0xC8, 0x10, 0x00, 0x01]);
        assert_eq!(inst.operation, Operation::Enter);
        assert_eq!(inst.data.immediate, 0x10);
        assert_eq!(inst.data.immediate2, 0x01);
        assert_eq!(inst.length, 4);
    }

    #[test]
    fn test_fpu_forms() {
        // D9 E8: fld1
        let inst = decode16(&[0xD9, 0xE8]);
        assert_eq!(inst.operation, Operation::Fld1);
        assert_eq!(inst.length, 2);

        // DD 06 34 12: fld qword [1234h]
        let inst = decode16(&[0xDD, 0x06, 0x34, 0x12]);
        assert_eq!(inst.operation, Operation::Fld);
        assert_eq!(inst.operands[0].size, OperandSize::Size64);
        assert_eq!(inst.length, 4);
    }

    #[test]
    fn test_truncated() {
        let disasm = X86Disassembler::real_mode();
        assert_eq!(
            disasm.decode_instruction(&[], 0x100),
            Err(DecodeError::truncated(0x100, 1, 0))
        );
        assert_eq!(
            disasm.decode_instruction(&[0xB8, 0x34], 0x100),
            Err(DecodeError::truncated(0x100, 3, 1))
        );
        assert!(disasm.decode_instruction(&[0x66], 0x100).is_err());
    }

    #[test]
    fn test_invalid_opcodes() {
        let disasm = X86Disassembler::real_mode();
        assert_eq!(
            disasm.decode_instruction(&[0xF1, 0x90], 0),
            Err(DecodeError::invalid_opcode(0, &[0xF1]))
        );
        assert_eq!(
            disasm.decode_instruction(&[0x0F, 0x04], 0),
            Err(DecodeError::invalid_opcode(0, &[0x0F, 0x04]))
        );
        // FE /7 is undefined
        assert_eq!(
            disasm.decode_instruction(&[0xFE, 0xF8], 0),
            Err(DecodeError::invalid_opcode(0, &[0xFE, 0xF8]))
        );
    }

    #[test]
    fn test_prefix_run_is_bounded() {
        let bytes = [0x26; 32];
        let disasm = X86Disassembler::real_mode();
        assert_eq!(
            disasm.decode_instruction(&bytes, 0),
            Err(DecodeError::too_long(0, MAX_INSTRUCTION_LENGTH))
        );

        let mut bytes = [0x3E; 15];
        bytes[14] = 0x90;
        let inst = disasm.decode_instruction(&bytes, 0).unwrap();
        assert_eq!(inst.length, 15);
    }

    #[test]
    fn test_decode_at_memory() {
        let image = crate::MemoryImage::new(0x7C00, vec![0x31, 0xC0, 0xCD, 0x10]);
        let disasm = X86Disassembler::real_mode();
        let inst = disasm.decode_at(&image, 0x7C02).unwrap();
        assert_eq!(inst.operation, Operation::Int);
        assert_eq!(inst.data.immediate, 0x10);
        assert!(disasm.decode_at(&image, 0x7C04).is_err());
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(DecoderConfig::from_bits(16), Some(DecoderConfig::real_mode()));
        assert_eq!(
            DecoderConfig::from_bits(32),
            Some(DecoderConfig::protected_mode())
        );
        assert_eq!(DecoderConfig::from_bits(64), None);
        assert_eq!(DecoderConfig::default(), DecoderConfig::real_mode());
        assert_eq!(
            DecoderConfig::for_cpu(CpuModel::Intel8086, 16),
            Some(DecoderConfig::intel_8086())
        );
        assert_eq!(DecoderConfig::for_cpu(CpuModel::Intel8086, 32), None);
    }

    #[test]
    fn test_system_register_moves_ignore_mod() {
        // 0F 20 06: mov esi, cr0; the two trailing bytes are not a displacement
        let inst = decode16(&[0x0F, 0x20, 0x06, 0x00, 0x00]);
        assert_eq!(inst.operation, Operation::MovCr);
        assert_eq!(inst.operands[0].mode, OperandMode::ModRmRmRegister);
        assert!(inst.data.modrm_rm_register);
        assert_eq!(inst.data.modrm_rm(), x86::ESI);
        assert_eq!(inst.length, 3);

        // 0F 23 7C 24 08: mov dr7, esp; rm 100 never pulls in a SIB byte
        let inst = decode32(&[0x0F, 0x23, 0x7C, 0x24, 0x08]);
        assert_eq!(inst.operation, Operation::MovDr);
        assert_eq!(inst.data.sib, 0);
        assert_eq!(inst.length, 3);

        // 0F 26 9D 00 00 00 00: mov tr3, ebp
        let inst = decode32(&[0x0F, 0x26, 0x9D, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(inst.length, 3);
    }

    #[test]
    fn test_undefined_segment_registers() {
        let disasm = X86Disassembler::real_mode();
        for bytes in [[0x8C, 0xF0], [0x8E, 0x38]] {
            assert_eq!(
                disasm.decode_instruction(&bytes, 0),
                Err(DecodeError::invalid_opcode(0, &bytes))
            );
        }
        // 8C E0: mov ax, fs exists from the 386 on
        assert!(disasm.decode_instruction(&[0x8C, 0xE0], 0).is_ok());
        assert_eq!(
            X86Disassembler::intel_8086().decode_instruction(&[0x8C, 0xE0], 0),
            Err(DecodeError::invalid_opcode(0, &[0x8C, 0xE0]))
        );
    }

    fn decode8086(bytes: &[u8]) -> Instruction {
        X86Disassembler::intel_8086()
            .decode_instruction(bytes, 0x100)
            .unwrap()
    }

    #[test]
    fn test_8086_aliases() {
        // 0F: pop cs, one byte
        let inst = decode8086(&[0x0F, 0x20, 0xC0]);
        assert_eq!(inst.operation, Operation::PopSreg);
        assert_eq!(
            inst.operands[0].mode,
            OperandMode::SegmentRegister(Segment::CS)
        );
        assert_eq!(inst.length, 1);

        // 66 05: jbe, not an operand-size prefix
        let inst = decode8086(&[0x66, 0x05]);
        assert_eq!(inst.operation, Operation::Jcc);
        assert_eq!(
            inst.operands[0].mode,
            OperandMode::JumpCondition(JumpCondition::BelowOrEqual)
        );
        assert_eq!(inst.data.operand_size, OperandSize::Size16);
        assert_eq!(inst.length, 2);

        // 64 is je, so no FS override
        let inst = decode8086(&[0x64, 0x00]);
        assert_eq!(inst.operation, Operation::Jcc);

        let inst = decode8086(&[0xC0, 0x04, 0x00]);
        assert_eq!(inst.operation, Operation::RetNear);
        assert_eq!(inst.data.immediate, 4);
        assert_eq!(inst.length, 3);
        assert_eq!(decode8086(&[0xC9]).operation, Operation::RetFar);
    }

    #[test]
    fn test_8086_escape_and_lock_alias() {
        // DD 06 34 12: esc with a memory operand, no x87 table
        let inst = decode8086(&[0xDD, 0x06, 0x34, 0x12]);
        assert_eq!(inst.operation, Operation::Esc);
        assert_eq!(inst.data.displacement, 0x1234);
        assert_eq!(inst.length, 4);

        // D9 E8 is fld1 on a 387 but a register-form esc here
        let inst = decode8086(&[0xD9, 0xE8]);
        assert_eq!(inst.operation, Operation::Esc);
        assert!(inst.data.modrm_rm_register);

        let inst = decode8086(&[0xF1, 0x90]);
        assert!(inst.data.lock);
        assert_eq!(inst.operation, Operation::Nop);
        assert_eq!(inst.length, 2);
    }
}
