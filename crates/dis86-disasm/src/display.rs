//! Intel-style text rendering of decoded instructions.
//!
//! Rendering never reads instruction bytes; everything it prints comes from
//! the [`Instruction`] value. Memory operands print as
//! `size ptr segment:[expression]` and numbers as lowercase hex with a
//! trailing `h`.

use std::fmt::{self, Write};

use dis86_core::register::{gpr_name, x86, REG16_NAMES, REG32_NAMES};
use dis86_core::{
    AddressSize, Instruction, JumpCondition, Operand, OperandMode, OperandSize, Operation,
    Segment,
};

use crate::x86::{modrm_address, AddressingMode};

/// Displays an instruction as assembly text.
#[derive(Debug, Clone, Copy)]
pub struct Disassembly<'a>(pub &'a Instruction);

/// Renders `instruction` as assembly text.
pub fn format_instruction(instruction: &Instruction) -> String {
    Disassembly(instruction).to_string()
}

impl fmt::Display for Disassembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inst = self.0;
        let data = &inst.data;

        if data.lock {
            f.write_str("lock ")?;
        }
        if data.rep {
            f.write_str(match (inst.operation.is_compare_string_op(), data.repne) {
                (true, true) => "repne ",
                (true, false) => "repe ",
                (false, _) => "rep ",
            })?;
        }

        f.write_str(inst.operation.mnemonic())?;
        if inst.operation.is_string_op() {
            f.write_str(string_width(inst).suffix())?;
        }

        // Condition and load-segment forms fold operand 0 into the mnemonic.
        let mut first = 0;
        match inst.operands[0].mode {
            OperandMode::JumpCondition(JumpCondition::CXZero)
                if data.address_size == AddressSize::Size32 =>
            {
                f.write_str("ecxz")?;
                first = 1;
            }
            OperandMode::JumpCondition(condition) => {
                f.write_str(condition.suffix())?;
                first = 1;
            }
            OperandMode::SegmentRegister(segment) if inst.operation == Operation::Lxs => {
                f.write_str(segment.name())?;
                first = 1;
            }
            _ => {}
        }

        let mut separator = " ";
        for operand in inst.operands[first..].iter().filter(|op| !op.is_none()) {
            f.write_str(separator)?;
            write_operand(f, inst, operand)?;
            separator = ", ";
        }
        Ok(())
    }
}

/// Width of the string element: the memory operand's width if present.
fn string_width(inst: &Instruction) -> OperandSize {
    inst.operands
        .iter()
        .find(|op| matches!(op.mode, OperandMode::RegisterIndirect(_)))
        .map_or(inst.data.operand_size, |op| op.size)
}

fn write_hex<W: Write>(out: &mut W, value: u32, size: OperandSize) -> fmt::Result {
    match size {
        OperandSize::Size8 => write!(out, "{:02x}h", value as u8),
        OperandSize::Size16 => write!(out, "{:04x}h", value as u16),
        _ => write!(out, "{:08x}h", value),
    }
}

fn write_address<W: Write>(out: &mut W, value: u32, size: AddressSize) -> fmt::Result {
    match size {
        AddressSize::Size16 => write!(out, "{:04x}h", value as u16),
        AddressSize::Size32 => write!(out, "{:08x}h", value),
    }
}

/// Writes ` + 8h` or ` - 10h`, or nothing for a zero displacement.
fn write_displacement<W: Write>(out: &mut W, displacement: i32) -> fmt::Result {
    if displacement == 0 {
        Ok(())
    } else if displacement < 0 {
        write!(out, " - {:x}h", displacement.unsigned_abs())
    } else {
        write!(out, " + {:x}h", displacement)
    }
}

fn address_register(id: u8, size: AddressSize) -> &'static str {
    let names: &[&'static str] = match size {
        AddressSize::Size16 => &REG16_NAMES,
        AddressSize::Size32 => &REG32_NAMES,
    };
    names.get(usize::from(id)).copied().unwrap_or("?")
}

fn write_operand<W: Write>(out: &mut W, inst: &Instruction, operand: &Operand) -> fmt::Result {
    let data = &inst.data;
    match operand.mode {
        OperandMode::None | OperandMode::JumpCondition(_) => Ok(()),
        OperandMode::Constant(value) => write_hex(out, value, operand.size),
        OperandMode::Immediate => write_hex(out, data.immediate, operand.size),
        OperandMode::Immediate2 => write_hex(out, data.immediate2, operand.size),
        OperandMode::Register(id) => out.write_str(gpr_name(id, operand.size)),
        OperandMode::SegmentRegister(segment) => out.write_str(segment.name()),
        OperandMode::RegisterIndirect(id) => {
            // es:[edi] cannot be overridden
            let segment = if id == x86::EDI {
                Segment::ES
            } else {
                data.segment
            };
            write!(
                out,
                "{} ptr {}:[{}]",
                operand.size.ptr_name(),
                segment,
                address_register(id, data.address_size)
            )
        }
        OperandMode::Relative => {
            let target = inst.next_address().wrapping_add(data.displacement);
            match data.operand_size {
                OperandSize::Size16 => write!(out, "{:04x}h", target as u16),
                _ => write!(out, "{:08x}h", target),
            }
        }
        OperandMode::Memory => {
            write!(out, "{} ptr {}:[", operand.size.ptr_name(), data.segment)?;
            write_address(out, data.displacement, data.address_size)?;
            out.write_char(']')
        }
        OperandMode::FarAddress => {
            write!(out, "{:04x}:", data.immediate as u16)?;
            write_hex(out, data.displacement, operand.size)
        }
        OperandMode::ModRmReg => out.write_str(gpr_name(data.modrm_reg(), operand.size)),
        OperandMode::ModRmRm if data.modrm_rm_register => {
            out.write_str(gpr_name(data.modrm_rm(), operand.size))
        }
        OperandMode::ModRmRmRegister => out.write_str(gpr_name(data.modrm_rm(), operand.size)),
        OperandMode::ModRmRm => write_memory(out, inst, operand.size),
        OperandMode::ModRmSegmentReg => match Segment::try_from(data.modrm_reg()) {
            Ok(segment) => out.write_str(segment.name()),
            Err(_) => out.write_str("<invalid>"),
        },
        OperandMode::ModRmControlRegister => write!(out, "cr{}", data.modrm_reg()),
        OperandMode::ModRmDebugRegister => write!(out, "dr{}", data.modrm_reg()),
        OperandMode::ModRmTestRegister => write!(out, "tr{}", data.modrm_reg()),
        OperandMode::FpRegister(index) => write!(out, "st({})", index),
    }
}

fn write_memory<W: Write>(out: &mut W, inst: &Instruction, size: OperandSize) -> fmt::Result {
    let data = &inst.data;
    let address_size = data.address_size;
    let address = modrm_address(address_size, data.modrm);
    let displacement = data.signed_displacement();

    write!(out, "{} ptr {}:[", size.ptr_name(), data.segment)?;
    match address.mode {
        AddressingMode::Register => {
            out.write_str(gpr_name(data.modrm_rm(), size))?;
        }
        AddressingMode::Direct => write_address(out, data.displacement, address_size)?,
        AddressingMode::Indirect => out.write_str(address_register(address.base, address_size))?,
        AddressingMode::Indexed => {
            out.write_str(address_register(address.base, address_size))?;
            write_displacement(out, displacement)?;
        }
        AddressingMode::BasedIndexed | AddressingMode::BasedIndexedDisplacement => {
            out.write_str(address_register(address.base, address_size))?;
            if let Some(index) = address.index {
                write!(out, " + {}", address_register(index, address_size))?;
            }
            if address.mode == AddressingMode::BasedIndexedDisplacement {
                write_displacement(out, displacement)?;
            }
        }
        AddressingMode::Sib => {
            let has_base = data.has_sib_base();
            let has_index = data.has_sib_index();
            if has_base {
                out.write_str(address_register(data.sib_base(), AddressSize::Size32))?;
            }
            if has_index {
                if has_base {
                    out.write_str(" + ")?;
                }
                out.write_str(address_register(data.sib_index(), AddressSize::Size32))?;
                if data.sib_scale() != 0 {
                    write!(out, " * {}", 1u8 << data.sib_scale())?;
                }
            }
            if !has_base && !has_index {
                write_address(out, data.displacement, AddressSize::Size32)?;
            } else {
                write_displacement(out, displacement)?;
            }
        }
    }
    out.write_char(']')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Disassembler, X86Disassembler};

    fn text16(bytes: &[u8]) -> String {
        let inst = X86Disassembler::real_mode()
            .decode_instruction(bytes, 0x100)
            .unwrap();
        format_instruction(&inst)
    }

    fn text32(bytes: &[u8]) -> String {
        let inst = X86Disassembler::protected_mode()
            .decode_instruction(bytes, 0x1000)
            .unwrap();
        format_instruction(&inst)
    }

    #[test]
    fn test_mov_al_imm8() {
        assert_eq!(text16(&[0xB0, 0x05]), "mov al, 05h");
    }

    #[test]
    fn test_mov_sib_esp() {
        assert_eq!(text32(&[0x89, 0x04, 0x24]), "mov dword ptr ds:[esp], eax");
    }

    #[test]
    fn test_repeat_prefix_text() {
        assert!(text16(&[0xF2, 0xAE]).starts_with("repne scasb"));
        assert!(text16(&[0xF3, 0xAE]).starts_with("repe scasb"));
        assert!(text16(&[0xF3, 0xA6]).starts_with("repe cmpsb"));
        assert!(text16(&[0xF3, 0xA5]).starts_with("rep movsw"));
        assert!(text16(&[0xF2, 0xAA]).starts_with("rep stosb"));
    }

    #[test]
    fn test_string_operands() {
        assert_eq!(
            text16(&[0xA4]),
            "movsb byte ptr es:[di], byte ptr ds:[si]"
        );
        assert_eq!(
            text32(&[0x2E, 0xAD]),
            "lodsd eax, dword ptr cs:[esi]"
        );
        assert_eq!(text16(&[0x6E]), "outsb dx, byte ptr ds:[si]");
        assert_eq!(text16(&[0x66, 0xAB]), "stosd dword ptr es:[di], eax");
    }

    #[test]
    fn test_lock_prefix() {
        assert_eq!(
            text32(&[0xF0, 0x0F, 0xC1, 0x03]),
            "lock xadd dword ptr ds:[ebx], eax"
        );
    }

    #[test]
    fn test_16bit_memory_forms() {
        assert_eq!(text16(&[0x8B, 0x00]), "mov ax, word ptr ds:[bx + si]");
        assert_eq!(text16(&[0x8B, 0x46, 0xFE]), "mov ax, word ptr ss:[bp - 2h]");
        assert_eq!(
            text16(&[0x8A, 0x81, 0x00, 0x10]),
            "mov al, byte ptr ds:[bx + di + 1000h]"
        );
        assert_eq!(text16(&[0x8B, 0x1E, 0x34, 0x12]), "mov bx, word ptr ds:[1234h]");
        assert_eq!(text16(&[0x8B, 0x07]), "mov ax, word ptr ds:[bx]");
        assert_eq!(text16(&[0x26, 0x8B, 0x07]), "mov ax, word ptr es:[bx]");
    }

    #[test]
    fn test_32bit_memory_forms() {
        assert_eq!(text32(&[0x8B, 0x45, 0x08]), "mov eax, dword ptr ss:[ebp + 8h]");
        assert_eq!(
            text32(&[0x8B, 0x04, 0x8D, 0x00, 0x10, 0x00, 0x00]),
            "mov eax, dword ptr ds:[ecx * 4 + 1000h]"
        );
        assert_eq!(
            text32(&[0x8B, 0x44, 0x98, 0xF0]),
            "mov eax, dword ptr ds:[eax + ebx * 4 - 10h]"
        );
        assert_eq!(
            text32(&[0x8B, 0x05, 0x78, 0x56, 0x34, 0x12]),
            "mov eax, dword ptr ds:[12345678h]"
        );
        assert_eq!(
            text32(&[0x8B, 0x04, 0x25, 0x00, 0x20, 0x00, 0x00]),
            "mov eax, dword ptr ds:[00002000h]"
        );
    }

    #[test]
    fn test_moffs_operand() {
        assert_eq!(text16(&[0xA0, 0x34, 0x12]), "mov al, byte ptr ds:[1234h]");
        assert_eq!(
            text32(&[0x64, 0xA1, 0x30, 0x00, 0x00, 0x00]),
            "mov eax, dword ptr fs:[00000030h]"
        );
    }

    #[test]
    fn test_relative_targets() {
        // 0x100 + 2 + 0x10
        assert_eq!(text16(&[0x74, 0x10]), "je 0112h");
        assert_eq!(text16(&[0xEB, 0xFE]), "jmp 0100h");
        assert_eq!(text16(&[0xE8, 0x00, 0xFF]), "call 0003h");
        assert_eq!(text16(&[0xE3, 0x00]), "jcxz 0102h");
        assert_eq!(text32(&[0xE3, 0x00]), "jecxz 00001002h");
        assert_eq!(text16(&[0xE2, 0xFE]), "loop 0100h");
        assert_eq!(text16(&[0xE0, 0xFE]), "loopne 0100h");
    }

    #[test]
    fn test_relative_wraps_to_16_bits() {
        let inst = X86Disassembler::real_mode()
            .decode_instruction(&[0xEB, 0x10], 0xFFF8)
            .unwrap();
        assert_eq!(format_instruction(&inst), "jmp 000ah");
    }

    #[test]
    fn test_far_pointer() {
        assert_eq!(text16(&[0xEA, 0x00, 0x7C, 0x00, 0x00]), "jmp far 0000:7c00h");
        assert_eq!(
            text32(&[0x9A, 0x78, 0x56, 0x34, 0x12, 0x08, 0x00]),
            "call far 0008:12345678h"
        );
    }

    #[test]
    fn test_load_far_pointer() {
        assert_eq!(text16(&[0xC4, 0x1E, 0x00, 0x20]), "les bx, word ptr ds:[2000h]");
        assert_eq!(
            text32(&[0x0F, 0xB2, 0x20]),
            "lss esp, dword ptr ds:[eax]"
        );
    }

    #[test]
    fn test_condition_suffixes() {
        assert_eq!(text32(&[0x0F, 0x94, 0xC0]), "sete al");
        assert_eq!(text32(&[0x0F, 0x4C, 0xC1]), "cmovl eax, ecx");
    }

    #[test]
    fn test_constant_and_group_operands() {
        assert_eq!(text16(&[0xCC]), "int 03h");
        assert_eq!(text16(&[0xD1, 0xE0]), "shl ax, 01h");
        assert_eq!(text16(&[0xD3, 0xF8]), "sar ax, cl");
        assert_eq!(text16(&[0x83, 0xC4, 0x04]), "add sp, 04h");
        assert_eq!(text16(&[0xC6, 0x07, 0x01]), "mov byte ptr ds:[bx], 01h");
    }

    #[test]
    fn test_system_registers() {
        assert_eq!(text32(&[0x0F, 0x20, 0xC0]), "mov eax, cr0");
        assert_eq!(text32(&[0x0F, 0x23, 0xF8]), "mov dr7, eax");
        assert_eq!(text32(&[0x0F, 0x26, 0xD8]), "mov tr3, eax");
        assert_eq!(text16(&[0x0F, 0x20, 0x06, 0x00, 0x00]), "mov esi, cr0");
        assert_eq!(text32(&[0x0F, 0x22, 0x45, 0x08]), "mov cr0, ebp");
        assert_eq!(text16(&[0x8E, 0xD8]), "mov ds, ax");
        assert_eq!(text16(&[0x8C, 0xE8]), "mov ax, gs");
        assert_eq!(text16(&[0x1E]), "push ds");
    }

    #[test]
    fn test_zero_displacement_is_omitted() {
        assert_eq!(text16(&[0x8B, 0x46, 0x00]), "mov ax, word ptr ss:[bp]");
        assert_eq!(text16(&[0x8B, 0x40, 0x00]), "mov ax, word ptr ds:[bx + si]");
        assert_eq!(text32(&[0x8B, 0x44, 0x24, 0x00]), "mov eax, dword ptr ds:[esp]");
        assert_eq!(
            text32(&[0x8B, 0x04, 0x8D, 0x00, 0x00, 0x00, 0x00]),
            "mov eax, dword ptr ds:[ecx * 4]"
        );
        assert_eq!(
            text32(&[0x8B, 0x84, 0x98, 0x00, 0x00, 0x00, 0x00]),
            "mov eax, dword ptr ds:[eax + ebx * 4]"
        );
        // No registers at all: the address is the displacement
        assert_eq!(
            text32(&[0x8B, 0x04, 0x25, 0x00, 0x00, 0x00, 0x00]),
            "mov eax, dword ptr ds:[00000000h]"
        );
    }

    fn text8086(bytes: &[u8]) -> String {
        let inst = X86Disassembler::intel_8086()
            .decode_instruction(bytes, 0x100)
            .unwrap();
        format_instruction(&inst)
    }

    #[test]
    fn test_8086_text() {
        assert_eq!(text8086(&[0x0F]), "pop cs");
        assert_eq!(text8086(&[0x64, 0x10]), "je 0112h");
        assert_eq!(text8086(&[0xC1]), "ret");
        assert_eq!(text8086(&[0xC8, 0x02, 0x00]), "retf 0002h");
        assert_eq!(text8086(&[0xDD, 0x06, 0x34, 0x12]), "esc byte ptr ds:[1234h]");
        assert_eq!(text8086(&[0xF1, 0x86, 0x07]), "lock xchg byte ptr ds:[bx], al");
    }

    #[test]
    fn test_fpu_text() {
        assert_eq!(text16(&[0xD9, 0xE8]), "fld1");
        assert_eq!(text16(&[0xD8, 0xC1]), "fadd st(0), st(1)");
        assert_eq!(text16(&[0xDE, 0xE9]), "fsubp st(1), st(0)");
        assert_eq!(text16(&[0xDF, 0xE0]), "fnstsw ax");
        assert_eq!(
            text16(&[0xDD, 0x06, 0x34, 0x12]),
            "fld qword ptr ds:[1234h]"
        );
        assert_eq!(
            text16(&[0xDB, 0x2F]),
            "fld tword ptr ds:[bx]"
        );
    }

    #[test]
    fn test_no_operands_no_trailing_space() {
        assert_eq!(text16(&[0x90]), "nop");
        assert_eq!(text16(&[0xC3]), "ret");
        assert_eq!(text16(&[0xC2, 0x04, 0x00]), "ret 0004h");
        assert_eq!(text32(&[0x0F, 0xA2]), "cpuid");
    }

    #[test]
    fn test_three_operands() {
        assert_eq!(text16(&[0x6B, 0xC3, 0x0A]), "imul ax, bx, 0ah");
        assert_eq!(
            text32(&[0x0F, 0xA4, 0xD0, 0x04]),
            "shld eax, edx, 04h"
        );
        assert_eq!(text16(&[0xC8, 0x10, 0x00, 0x01]), "enter 0010h, 01h");
    }

    #[test]
    fn test_display_matches_format() {
        let inst = X86Disassembler::real_mode()
            .decode_instruction(&[0x40], 0)
            .unwrap();
        assert_eq!(Disassembly(&inst).to_string(), format_instruction(&inst));
        assert_eq!(format!("{}", Disassembly(&inst)), "inc ax");
    }
}
