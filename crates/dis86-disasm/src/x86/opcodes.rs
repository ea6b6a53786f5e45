//! x86 opcode definitions and lookup.
//!
//! The tables form a shallow trie. A primary row is either a terminal
//! [`OpcodeEntry`], a prefix, or a reference to a secondary table that is
//! indexed by the next opcode byte (`0F`), by ModRM.reg (groups), or by the
//! whole ModRM byte (x87 escapes, see [`super::x87`]).

#![allow(non_upper_case_globals)]

use dis86_core::register::x86;
use dis86_core::{JumpCondition, OperandMode, OperandSize, Operation, Segment};

use super::prefix::Prefix;
use super::x87::{FPU_D8, FPU_D9, FPU_DA, FPU_DB, FPU_DC, FPU_DD, FPU_DE, FPU_DF};

/// Operand shape as listed in a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandTemplate {
    /// Where the value comes from.
    pub mode: OperandMode,
    /// Fixed width, or `None` for the effective operand size.
    pub size: Option<OperandSize>,
}

impl OperandTemplate {
    /// Unused operand slot.
    pub const NONE: Self = Self {
        mode: OperandMode::None,
        size: None,
    };

    /// Operand with a fixed width.
    pub const fn fixed(mode: OperandMode, size: OperandSize) -> Self {
        Self {
            mode,
            size: Some(size),
        }
    }

    /// Operand that takes the effective operand size.
    pub const fn sized(mode: OperandMode) -> Self {
        Self { mode, size: None }
    }
}

/// Terminal table row: an operation and its operand shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub operation: Operation,
    pub operands: [OperandTemplate; 3],
}

impl OpcodeEntry {
    pub const fn new(operation: Operation) -> Self {
        Self {
            operation,
            operands: [OperandTemplate::NONE; 3],
        }
    }

    pub const fn with_operand(mut self, slot: usize, operand: OperandTemplate) -> Self {
        self.operands[slot] = operand;
        self
    }
}

/// One row of an opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEntry {
    /// Undefined encoding.
    Invalid,
    /// A prefix byte; decoding continues with the next byte.
    Prefix(Prefix),
    /// The opcode continues with another byte indexing this table.
    Escape(&'static [TableEntry; 256]),
    /// The operation is selected by ModRM.reg.
    Group(&'static [TableEntry; 8]),
    /// The operation is selected by the x87 ModRM rules.
    Fpu(&'static [TableEntry; 72]),
    /// A decodable instruction.
    Op(OpcodeEntry),
}

impl TableEntry {
    /// Returns the operation, or the marker for non-terminal rows.
    pub const fn operation(&self) -> Operation {
        match self {
            TableEntry::Invalid => Operation::Invalid,
            TableEntry::Prefix(prefix) => prefix.operation(),
            TableEntry::Escape(_) => Operation::Escape,
            TableEntry::Group(_) => Operation::GroupExtension,
            TableEntry::Fpu(_) => Operation::FpuExtension,
            TableEntry::Op(entry) => entry.operation,
        }
    }
}

// ============================================================================
// Operand shapes
// ============================================================================

const fn rm(size: OperandSize) -> OperandTemplate {
    OperandTemplate::fixed(OperandMode::ModRmRm, size)
}

const fn reg8(id: u8) -> OperandTemplate {
    OperandTemplate::fixed(OperandMode::Register(id), OperandSize::Size8)
}

/// General register at the effective operand size (`eAX`, `eCX`, ...).
const fn regv(id: u8) -> OperandTemplate {
    OperandTemplate::sized(OperandMode::Register(id))
}

const fn sreg(segment: Segment) -> OperandTemplate {
    OperandTemplate::fixed(OperandMode::SegmentRegister(segment), OperandSize::Size16)
}

const fn cc(condition: JumpCondition) -> OperandTemplate {
    OperandTemplate::sized(OperandMode::JumpCondition(condition))
}

/// Constant baked into the opcode.
pub const fn cb(value: u32) -> OperandTemplate {
    OperandTemplate::fixed(OperandMode::Constant(value), OperandSize::Size8)
}

/// x87 stack register.
pub const fn st(index: u8) -> OperandTemplate {
    OperandTemplate::fixed(OperandMode::FpRegister(index), OperandSize::Size80)
}

pub const Eb: OperandTemplate = rm(OperandSize::Size8);
pub const Ew: OperandTemplate = rm(OperandSize::Size16);
pub const Ev: OperandTemplate = OperandTemplate::sized(OperandMode::ModRmRm);
pub const Gb: OperandTemplate = OperandTemplate::fixed(OperandMode::ModRmReg, OperandSize::Size8);
pub const Gw: OperandTemplate = OperandTemplate::fixed(OperandMode::ModRmReg, OperandSize::Size16);
pub const Gv: OperandTemplate = OperandTemplate::sized(OperandMode::ModRmReg);
pub const Sw: OperandTemplate =
    OperandTemplate::fixed(OperandMode::ModRmSegmentReg, OperandSize::Size16);
pub const Ib: OperandTemplate = OperandTemplate::fixed(OperandMode::Immediate, OperandSize::Size8);
pub const Iw: OperandTemplate = OperandTemplate::fixed(OperandMode::Immediate, OperandSize::Size16);
pub const Iv: OperandTemplate = OperandTemplate::sized(OperandMode::Immediate);
pub const Ib2: OperandTemplate =
    OperandTemplate::fixed(OperandMode::Immediate2, OperandSize::Size8);
pub const Jb: OperandTemplate = OperandTemplate::fixed(OperandMode::Relative, OperandSize::Size8);
pub const Jv: OperandTemplate = OperandTemplate::sized(OperandMode::Relative);
pub const Ob: OperandTemplate = OperandTemplate::fixed(OperandMode::Memory, OperandSize::Size8);
pub const Ov: OperandTemplate = OperandTemplate::sized(OperandMode::Memory);
pub const Ap: OperandTemplate = OperandTemplate::sized(OperandMode::FarAddress);

/// Memory of unspecified shape (`lea`, descriptor tables, far pointers).
pub const M: OperandTemplate = Ev;
pub const Mp: OperandTemplate = Ev;
pub const Ma: OperandTemplate = Ev;
pub const Ms: OperandTemplate = Ev;
pub const Mw: OperandTemplate = Ew;
pub const Md: OperandTemplate = rm(OperandSize::Size32);
pub const Mq: OperandTemplate = rm(OperandSize::Size64);
pub const Mt: OperandTemplate = rm(OperandSize::Size80);

pub const Rd: OperandTemplate =
    OperandTemplate::fixed(OperandMode::ModRmRmRegister, OperandSize::Size32);
pub const Cd: OperandTemplate =
    OperandTemplate::fixed(OperandMode::ModRmControlRegister, OperandSize::Size32);
pub const Dd: OperandTemplate =
    OperandTemplate::fixed(OperandMode::ModRmDebugRegister, OperandSize::Size32);
pub const Td: OperandTemplate =
    OperandTemplate::fixed(OperandMode::ModRmTestRegister, OperandSize::Size32);

/// String source `[esi]`, segment overridable.
pub const Xb: OperandTemplate =
    OperandTemplate::fixed(OperandMode::RegisterIndirect(x86::ESI), OperandSize::Size8);
pub const Xv: OperandTemplate = OperandTemplate::sized(OperandMode::RegisterIndirect(x86::ESI));
/// String destination `es:[edi]`.
pub const Yb: OperandTemplate =
    OperandTemplate::fixed(OperandMode::RegisterIndirect(x86::EDI), OperandSize::Size8);
pub const Yv: OperandTemplate = OperandTemplate::sized(OperandMode::RegisterIndirect(x86::EDI));

pub const AL: OperandTemplate = reg8(x86::AL);
pub const CL: OperandTemplate = reg8(x86::CL);
pub const DX: OperandTemplate =
    OperandTemplate::fixed(OperandMode::Register(x86::DX), OperandSize::Size16);
pub const AX: OperandTemplate =
    OperandTemplate::fixed(OperandMode::Register(x86::AX), OperandSize::Size16);
pub const eAX: OperandTemplate = regv(x86::EAX);

// ============================================================================
// Row builders
// ============================================================================

pub const fn op0(operation: Operation) -> TableEntry {
    TableEntry::Op(OpcodeEntry::new(operation))
}

pub const fn op1(operation: Operation, a: OperandTemplate) -> TableEntry {
    TableEntry::Op(OpcodeEntry::new(operation).with_operand(0, a))
}

pub const fn op2(operation: Operation, a: OperandTemplate, b: OperandTemplate) -> TableEntry {
    TableEntry::Op(
        OpcodeEntry::new(operation)
            .with_operand(0, a)
            .with_operand(1, b),
    )
}

pub const fn op3(
    operation: Operation,
    a: OperandTemplate,
    b: OperandTemplate,
    c: OperandTemplate,
) -> TableEntry {
    TableEntry::Op(
        OpcodeEntry::new(operation)
            .with_operand(0, a)
            .with_operand(1, b)
            .with_operand(2, c),
    )
}

const fn prefix(byte: u8) -> TableEntry {
    match Prefix::from_byte(byte) {
        Some(prefix) => TableEntry::Prefix(prefix),
        None => TableEntry::Invalid,
    }
}

const ALU_OPS: [Operation; 8] = [
    Operation::Add,
    Operation::Or,
    Operation::Adc,
    Operation::Sbb,
    Operation::And,
    Operation::Sub,
    Operation::Xor,
    Operation::Cmp,
];

// ============================================================================
// Group tables (selected by ModRM.reg)
// ============================================================================

const fn group1(a: OperandTemplate, b: OperandTemplate) -> [TableEntry; 8] {
    let mut table = [TableEntry::Invalid; 8];
    let mut i = 0;
    while i < 8 {
        table[i] = op2(ALU_OPS[i], a, b);
        i += 1;
    }
    table
}

const fn group2(a: OperandTemplate, b: OperandTemplate) -> [TableEntry; 8] {
    [
        op2(Operation::Rol, a, b),
        op2(Operation::Ror, a, b),
        op2(Operation::Rcl, a, b),
        op2(Operation::Rcr, a, b),
        op2(Operation::Shl, a, b),
        op2(Operation::Shr, a, b),
        TableEntry::Invalid,
        op2(Operation::Sar, a, b),
    ]
}

const fn group3(a: OperandTemplate, imm: OperandTemplate) -> [TableEntry; 8] {
    [
        op2(Operation::Test, a, imm),
        TableEntry::Invalid,
        op1(Operation::Not, a),
        op1(Operation::Neg, a),
        op1(Operation::Mul, a),
        op1(Operation::Imul, a),
        op1(Operation::Div, a),
        op1(Operation::Idiv, a),
    ]
}

pub static GROUP_80: [TableEntry; 8] = group1(Eb, Ib);
pub static GROUP_81: [TableEntry; 8] = group1(Ev, Iv);
pub static GROUP_82: [TableEntry; 8] = group1(Eb, Ib);
pub static GROUP_83: [TableEntry; 8] = group1(Ev, Ib);

pub static GROUP_C0: [TableEntry; 8] = group2(Eb, Ib);
pub static GROUP_C1: [TableEntry; 8] = group2(Ev, Ib);
pub static GROUP_D0: [TableEntry; 8] = group2(Eb, cb(1));
pub static GROUP_D1: [TableEntry; 8] = group2(Ev, cb(1));
pub static GROUP_D2: [TableEntry; 8] = group2(Eb, CL);
pub static GROUP_D3: [TableEntry; 8] = group2(Ev, CL);

pub static GROUP_F6: [TableEntry; 8] = group3(Eb, Ib);
pub static GROUP_F7: [TableEntry; 8] = group3(Ev, Iv);

pub static GROUP_FE: [TableEntry; 8] = {
    let mut table = [TableEntry::Invalid; 8];
    table[0] = op1(Operation::Inc, Eb);
    table[1] = op1(Operation::Dec, Eb);
    table
};

pub static GROUP_FF: [TableEntry; 8] = [
    op1(Operation::Inc, Ev),
    op1(Operation::Dec, Ev),
    op1(Operation::CallNear, Ev),
    op1(Operation::CallFar, Mp),
    op1(Operation::JmpNear, Ev),
    op1(Operation::JmpFar, Mp),
    op1(Operation::Push, Ev),
    TableEntry::Invalid,
];

pub static GROUP_0F00: [TableEntry; 8] = [
    op1(Operation::Sldt, Ew),
    op1(Operation::Str, Ew),
    op1(Operation::Lldt, Ew),
    op1(Operation::Ltr, Ew),
    op1(Operation::Verr, Ew),
    op1(Operation::Verw, Ew),
    TableEntry::Invalid,
    TableEntry::Invalid,
];

pub static GROUP_0F01: [TableEntry; 8] = [
    op1(Operation::Sgdt, Ms),
    op1(Operation::Sidt, Ms),
    op1(Operation::Lgdt, Ms),
    op1(Operation::Lidt, Ms),
    op1(Operation::Smsw, Ew),
    TableEntry::Invalid,
    op1(Operation::Lmsw, Ew),
    op1(Operation::Invlpg, M),
];

pub static GROUP_0FBA: [TableEntry; 8] = {
    let mut table = [TableEntry::Invalid; 8];
    table[4] = op2(Operation::Bt, Ev, Ib);
    table[5] = op2(Operation::Bts, Ev, Ib);
    table[6] = op2(Operation::Btr, Ev, Ib);
    table[7] = op2(Operation::Btc, Ev, Ib);
    table
};

pub static GROUP_0FC7: [TableEntry; 8] = {
    let mut table = [TableEntry::Invalid; 8];
    table[1] = op1(Operation::Cmpxchg8b, Mq);
    table
};

// ============================================================================
// Primary table
// ============================================================================

/// One-byte opcode table.
pub static OPCODE_TABLE: [TableEntry; 256] = {
    use Operation::*;

    let mut table = [TableEntry::Invalid; 256];

    // ADD OR ADC SBB AND SUB XOR CMP, six forms each at 8*n..8*n+5
    let mut i = 0;
    while i < 8 {
        let base = i * 8;
        table[base] = op2(ALU_OPS[i], Eb, Gb);
        table[base + 1] = op2(ALU_OPS[i], Ev, Gv);
        table[base + 2] = op2(ALU_OPS[i], Gb, Eb);
        table[base + 3] = op2(ALU_OPS[i], Gv, Ev);
        table[base + 4] = op2(ALU_OPS[i], AL, Ib);
        table[base + 5] = op2(ALU_OPS[i], eAX, Iv);
        i += 1;
    }

    table[0x06] = op1(PushSreg, sreg(Segment::ES));
    table[0x07] = op1(PopSreg, sreg(Segment::ES));
    table[0x0E] = op1(PushSreg, sreg(Segment::CS));
    table[0x0F] = TableEntry::Escape(&OPCODE_TABLE_0F);
    table[0x16] = op1(PushSreg, sreg(Segment::SS));
    table[0x17] = op1(PopSreg, sreg(Segment::SS));
    table[0x1E] = op1(PushSreg, sreg(Segment::DS));
    table[0x1F] = op1(PopSreg, sreg(Segment::DS));
    table[0x26] = prefix(0x26);
    table[0x27] = op0(Daa);
    table[0x2E] = prefix(0x2E);
    table[0x2F] = op0(Das);
    table[0x36] = prefix(0x36);
    table[0x37] = op0(Aaa);
    table[0x3E] = prefix(0x3E);
    table[0x3F] = op0(Aas);

    // INC/DEC/PUSH/POP with the register in the low three bits
    let mut r = 0;
    while r < 8 {
        table[0x40 + r] = op1(Inc, regv(r as u8));
        table[0x48 + r] = op1(Dec, regv(r as u8));
        table[0x50 + r] = op1(Push, regv(r as u8));
        table[0x58 + r] = op1(Pop, regv(r as u8));
        r += 1;
    }

    table[0x60] = op0(Pusha);
    table[0x61] = op0(Popa);
    table[0x62] = op2(Bound, Gv, Ma);
    table[0x63] = op2(Arpl, Ew, Gw);
    table[0x64] = prefix(0x64);
    table[0x65] = prefix(0x65);
    table[0x66] = prefix(0x66);
    table[0x67] = prefix(0x67);
    table[0x68] = op1(Push, Iv);
    table[0x69] = op3(Imul, Gv, Ev, Iv);
    table[0x6A] = op1(Push, Ib);
    table[0x6B] = op3(Imul, Gv, Ev, Ib);
    table[0x6C] = op2(Ins, Yb, DX);
    table[0x6D] = op2(Ins, Yv, DX);
    table[0x6E] = op2(Outs, DX, Xb);
    table[0x6F] = op2(Outs, DX, Xv);

    // Jcc rel8
    let mut c = 0;
    while c < 16 {
        table[0x70 + c] = op2(Jcc, cc(JumpCondition::from_cc(c as u8)), Jb);
        c += 1;
    }

    table[0x80] = TableEntry::Group(&GROUP_80);
    table[0x81] = TableEntry::Group(&GROUP_81);
    table[0x82] = TableEntry::Group(&GROUP_82);
    table[0x83] = TableEntry::Group(&GROUP_83);
    table[0x84] = op2(Test, Eb, Gb);
    table[0x85] = op2(Test, Ev, Gv);
    table[0x86] = op2(Xchg, Eb, Gb);
    table[0x87] = op2(Xchg, Ev, Gv);
    table[0x88] = op2(Mov, Eb, Gb);
    table[0x89] = op2(Mov, Ev, Gv);
    table[0x8A] = op2(Mov, Gb, Eb);
    table[0x8B] = op2(Mov, Gv, Ev);
    table[0x8C] = op2(MovSreg, Ew, Sw);
    table[0x8D] = op2(Lea, Gv, M);
    table[0x8E] = op2(MovSreg, Sw, Ew);
    table[0x8F] = op1(Pop, Ev);

    table[0x90] = op0(Nop);
    let mut r = 1;
    while r < 8 {
        table[0x90 + r] = op2(Xchg, eAX, regv(r as u8));
        r += 1;
    }
    table[0x98] = op0(Cbw);
    table[0x99] = op0(Cwd);
    table[0x9A] = op1(CallFar, Ap);
    table[0x9B] = op0(Wait);
    table[0x9C] = op0(Pushf);
    table[0x9D] = op0(Popf);
    table[0x9E] = op0(Sahf);
    table[0x9F] = op0(Lahf);

    table[0xA0] = op2(Mov, AL, Ob);
    table[0xA1] = op2(Mov, eAX, Ov);
    table[0xA2] = op2(Mov, Ob, AL);
    table[0xA3] = op2(Mov, Ov, eAX);
    table[0xA4] = op2(Movs, Yb, Xb);
    table[0xA5] = op2(Movs, Yv, Xv);
    table[0xA6] = op2(Cmps, Xb, Yb);
    table[0xA7] = op2(Cmps, Xv, Yv);
    table[0xA8] = op2(Test, AL, Ib);
    table[0xA9] = op2(Test, eAX, Iv);
    table[0xAA] = op2(Stos, Yb, AL);
    table[0xAB] = op2(Stos, Yv, eAX);
    table[0xAC] = op2(Lods, AL, Xb);
    table[0xAD] = op2(Lods, eAX, Xv);
    table[0xAE] = op2(Scas, AL, Yb);
    table[0xAF] = op2(Scas, eAX, Yv);

    // MOV reg, imm
    let mut r = 0;
    while r < 8 {
        table[0xB0 + r] = op2(Mov, reg8(r as u8), Ib);
        table[0xB8 + r] = op2(Mov, regv(r as u8), Iv);
        r += 1;
    }

    table[0xC0] = TableEntry::Group(&GROUP_C0);
    table[0xC1] = TableEntry::Group(&GROUP_C1);
    table[0xC2] = op1(RetNear, Iw);
    table[0xC3] = op0(RetNear);
    table[0xC4] = op3(Lxs, sreg(Segment::ES), Gv, Mp);
    table[0xC5] = op3(Lxs, sreg(Segment::DS), Gv, Mp);
    table[0xC6] = op2(Mov, Eb, Ib);
    table[0xC7] = op2(Mov, Ev, Iv);
    table[0xC8] = op2(Enter, Iw, Ib2);
    table[0xC9] = op0(Leave);
    table[0xCA] = op1(RetFar, Iw);
    table[0xCB] = op0(RetFar);
    table[0xCC] = op1(Int, cb(3));
    table[0xCD] = op1(Int, Ib);
    table[0xCE] = op0(Into);
    table[0xCF] = op0(Iret);

    table[0xD0] = TableEntry::Group(&GROUP_D0);
    table[0xD1] = TableEntry::Group(&GROUP_D1);
    table[0xD2] = TableEntry::Group(&GROUP_D2);
    table[0xD3] = TableEntry::Group(&GROUP_D3);
    table[0xD4] = op1(Aam, Ib);
    table[0xD5] = op1(Aad, Ib);
    table[0xD6] = op0(Salc);
    table[0xD7] = op0(Xlat);
    table[0xD8] = TableEntry::Fpu(&FPU_D8);
    table[0xD9] = TableEntry::Fpu(&FPU_D9);
    table[0xDA] = TableEntry::Fpu(&FPU_DA);
    table[0xDB] = TableEntry::Fpu(&FPU_DB);
    table[0xDC] = TableEntry::Fpu(&FPU_DC);
    table[0xDD] = TableEntry::Fpu(&FPU_DD);
    table[0xDE] = TableEntry::Fpu(&FPU_DE);
    table[0xDF] = TableEntry::Fpu(&FPU_DF);

    table[0xE0] = op2(Loop, cc(JumpCondition::NotEqual), Jb);
    table[0xE1] = op2(Loop, cc(JumpCondition::Equal), Jb);
    table[0xE2] = op2(Loop, cc(JumpCondition::Always), Jb);
    table[0xE3] = op2(Jcc, cc(JumpCondition::CXZero), Jb);
    table[0xE4] = op2(In, AL, Ib);
    table[0xE5] = op2(In, eAX, Ib);
    table[0xE6] = op2(Out, Ib, AL);
    table[0xE7] = op2(Out, Ib, eAX);
    table[0xE8] = op1(CallNear, Jv);
    table[0xE9] = op1(JmpNear, Jv);
    table[0xEA] = op1(JmpFar, Ap);
    table[0xEB] = op1(JmpNear, Jb);
    table[0xEC] = op2(In, AL, DX);
    table[0xED] = op2(In, eAX, DX);
    table[0xEE] = op2(Out, DX, AL);
    table[0xEF] = op2(Out, DX, eAX);

    table[0xF0] = prefix(0xF0);
    table[0xF2] = prefix(0xF2);
    table[0xF3] = prefix(0xF3);
    table[0xF4] = op0(Hlt);
    table[0xF5] = op0(Cmc);
    table[0xF6] = TableEntry::Group(&GROUP_F6);
    table[0xF7] = TableEntry::Group(&GROUP_F7);
    table[0xF8] = op0(Clc);
    table[0xF9] = op0(Stc);
    table[0xFA] = op0(Cli);
    table[0xFB] = op0(Sti);
    table[0xFC] = op0(Cld);
    table[0xFD] = op0(Std);
    table[0xFE] = TableEntry::Group(&GROUP_FE);
    table[0xFF] = TableEntry::Group(&GROUP_FF);

    table
};

/// One-byte opcode table of the 8086/8088.
///
/// Shares the group tables with [`OPCODE_TABLE`] but has no `0F` escape, no
/// size or `FS`/`GS` prefixes and no 186 additions. The rows those occupy
/// on later parts decode as the 8086 silicon does.
pub static OPCODE_TABLE_8086: [TableEntry; 256] = {
    use Operation::*;

    let mut table = OPCODE_TABLE;

    table[0x0F] = op1(PopSreg, sreg(Segment::CS));

    // 60-6F mirror the Jcc block
    let mut c = 0;
    while c < 16 {
        table[0x60 + c] = op2(Jcc, cc(JumpCondition::from_cc(c as u8)), Jb);
        c += 1;
    }

    table[0xC0] = op1(RetNear, Iw);
    table[0xC1] = op0(RetNear);
    table[0xC8] = op1(RetFar, Iw);
    table[0xC9] = op0(RetFar);

    // No x87 decoding; the coprocessor sees the ModRM operand
    let mut e = 0;
    while e < 8 {
        table[0xD8 + e] = op1(Esc, Eb);
        e += 1;
    }

    table[0xF1] = TableEntry::Prefix(Prefix::Lock);

    table
};

// ============================================================================
// Two-byte table (0F xx)
// ============================================================================

/// Two-byte opcode table, reached through `0F`.
pub static OPCODE_TABLE_0F: [TableEntry; 256] = {
    use Operation::*;

    let mut table = [TableEntry::Invalid; 256];

    table[0x00] = TableEntry::Group(&GROUP_0F00);
    table[0x01] = TableEntry::Group(&GROUP_0F01);
    table[0x02] = op2(Lar, Gv, Ew);
    table[0x03] = op2(Lsl, Gv, Ew);
    table[0x05] = op0(Loadall);
    table[0x06] = op0(Clts);
    table[0x08] = op0(Invd);
    table[0x09] = op0(Wbinvd);

    table[0x20] = op2(MovCr, Rd, Cd);
    table[0x21] = op2(MovDr, Rd, Dd);
    table[0x22] = op2(MovCr, Cd, Rd);
    table[0x23] = op2(MovDr, Dd, Rd);
    table[0x24] = op2(MovTr, Rd, Td);
    table[0x26] = op2(MovTr, Td, Rd);

    table[0x31] = op0(Rdtsc);

    let mut c = 0;
    while c < 16 {
        let condition = cc(JumpCondition::from_cc(c as u8));
        table[0x40 + c] = op3(Cmovcc, condition, Gv, Ev);
        table[0x80 + c] = op2(Jcc, condition, Jv);
        table[0x90 + c] = op2(Setcc, condition, Eb);
        c += 1;
    }

    table[0xA0] = op1(PushSreg, sreg(Segment::FS));
    table[0xA1] = op1(PopSreg, sreg(Segment::FS));
    table[0xA2] = op0(Cpuid);
    table[0xA3] = op2(Bt, Ev, Gv);
    table[0xA4] = op3(Shld, Ev, Gv, Ib);
    table[0xA5] = op3(Shld, Ev, Gv, CL);
    table[0xA8] = op1(PushSreg, sreg(Segment::GS));
    table[0xA9] = op1(PopSreg, sreg(Segment::GS));
    table[0xAB] = op2(Bts, Ev, Gv);
    table[0xAC] = op3(Shrd, Ev, Gv, Ib);
    table[0xAD] = op3(Shrd, Ev, Gv, CL);
    table[0xAF] = op2(Imul, Gv, Ev);

    table[0xB0] = op2(Cmpxchg, Eb, Gb);
    table[0xB1] = op2(Cmpxchg, Ev, Gv);
    table[0xB2] = op3(Lxs, sreg(Segment::SS), Gv, Mp);
    table[0xB3] = op2(Btr, Ev, Gv);
    table[0xB4] = op3(Lxs, sreg(Segment::FS), Gv, Mp);
    table[0xB5] = op3(Lxs, sreg(Segment::GS), Gv, Mp);
    table[0xB6] = op2(Movzx, Gv, Eb);
    table[0xB7] = op2(Movzx, Gv, Ew);
    table[0xBA] = TableEntry::Group(&GROUP_0FBA);
    table[0xBB] = op2(Btc, Ev, Gv);
    table[0xBC] = op2(Bsf, Gv, Ev);
    table[0xBD] = op2(Bsr, Gv, Ev);
    table[0xBE] = op2(Movsx, Gv, Eb);
    table[0xBF] = op2(Movsx, Gv, Ew);

    table[0xC0] = op2(Xadd, Eb, Gb);
    table[0xC1] = op2(Xadd, Ev, Gv);
    table[0xC7] = TableEntry::Group(&GROUP_0FC7);

    let mut r = 0;
    while r < 8 {
        table[0xC8 + r] = op1(Bswap, regv(r as u8));
        r += 1;
    }

    table
};
