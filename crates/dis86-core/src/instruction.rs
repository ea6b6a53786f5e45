//! Decoded instruction representation.

use crate::{AddressSize, Operand, OperandSize, Segment};

/// Maximum number of operands an instruction carries.
pub const MAX_OPERANDS: usize = 3;

/// Every decodable operation, plus the markers used inside the opcode tables.
///
/// The markers (`Invalid` through `AddressSizePrefix`) describe table rows
/// that are not instructions. They never appear in a decoded [`Instruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    // Table markers
    Invalid,
    /// The opcode continues in another 256-entry table (`0F`).
    Escape,
    /// The operation is selected by ModRM.reg from an 8-entry group table.
    GroupExtension,
    /// The operation is selected from a 72-entry x87 table.
    FpuExtension,
    SegmentPrefix,
    RepPrefix,
    RepNePrefix,
    LockPrefix,
    OperandSizePrefix,
    AddressSizePrefix,

    // 8086
    Aaa,
    Aad,
    Aam,
    Aas,
    Adc,
    Add,
    And,
    CallNear,
    CallFar,
    Cbw,
    Clc,
    Cld,
    Cli,
    Cmc,
    Cmp,
    Cmps,
    Cwd,
    Daa,
    Das,
    Dec,
    Div,
    /// 8086 coprocessor escape (`D8`-`DF` without x87 decoding).
    Esc,
    Hlt,
    Idiv,
    Imul,
    In,
    Inc,
    Int,
    Into,
    Iret,
    /// Conditional jump, condition in operand 0.
    Jcc,
    JmpNear,
    JmpFar,
    Lahf,
    Lea,
    Lods,
    /// `loop`, `loope` and `loopne`, condition in operand 0.
    Loop,
    /// Load far pointer (`lds`, `les`, `lss`, `lfs`, `lgs`), segment in operand 0.
    Lxs,
    Mov,
    Movs,
    MovSreg,
    Mul,
    Neg,
    Nop,
    Not,
    Or,
    Out,
    Pop,
    PopSreg,
    Popf,
    Push,
    PushSreg,
    Pushf,
    Rcl,
    Rcr,
    RetNear,
    RetFar,
    Rol,
    Ror,
    Sahf,
    Salc,
    Sar,
    Sbb,
    Scas,
    Shl,
    Shr,
    Stc,
    Std,
    Sti,
    Stos,
    Sub,
    Test,
    Wait,
    Xchg,
    Xlat,
    Xor,

    // 80186/80286
    Bound,
    Ins,
    Outs,
    Enter,
    Leave,
    Pusha,
    Popa,
    Arpl,
    Clts,
    Lar,
    Lsl,
    Lgdt,
    Sgdt,
    Lidt,
    Sidt,
    Lldt,
    Sldt,
    Ltr,
    Str,
    Lmsw,
    Smsw,
    Verr,
    Verw,
    Loadall,

    // 80386
    Bsf,
    Bsr,
    Bt,
    Bts,
    Btr,
    Btc,
    Shld,
    Shrd,
    Movsx,
    Movzx,
    MovCr,
    MovDr,
    MovTr,
    /// `setcc`, condition in operand 0.
    Setcc,

    // 80486 and Pentium
    Bswap,
    Cmpxchg,
    Xadd,
    Invd,
    Wbinvd,
    Invlpg,
    /// `cmovcc`, condition in operand 0.
    Cmovcc,
    Cpuid,
    Rdtsc,
    Cmpxchg8b,

    // x87
    F2xm1,
    Fabs,
    Fadd,
    Faddp,
    Fbld,
    Fbstp,
    Fchs,
    Fcom,
    Fcomp,
    Fcompp,
    Fcos,
    Fdecstp,
    Fdiv,
    Fdivp,
    Fdivr,
    Fdivrp,
    Ffree,
    Fiadd,
    Ficom,
    Ficomp,
    Fidiv,
    Fidivr,
    Fild,
    Fimul,
    Fincstp,
    Fist,
    Fistp,
    Fisub,
    Fisubr,
    Fld,
    Fld1,
    Fldcw,
    Fldenv,
    Fldl2e,
    Fldl2t,
    Fldlg2,
    Fldln2,
    Fldpi,
    Fldz,
    Fmul,
    Fmulp,
    Fnclex,
    Fndisi,
    Fneni,
    Fninit,
    Fnop,
    Fnsave,
    Fnstcw,
    Fnstenv,
    Fnstsw,
    Fpatan,
    Fprem,
    Fprem1,
    Fptan,
    Frndint,
    Frstor,
    Fscale,
    Fsetpm,
    Fsin,
    Fsincos,
    Fsqrt,
    Fst,
    Fstp,
    Fsub,
    Fsubp,
    Fsubr,
    Fsubrp,
    Ftst,
    Fucom,
    Fucomp,
    Fucompp,
    Fxam,
    Fxch,
    Fxtract,
    Fyl2x,
    Fyl2xp1,
}

impl Operation {
    /// Returns the mnemonic text.
    ///
    /// Conditional forms (`Jcc`, `Loop`, `Setcc`, `Cmovcc`, `Lxs`) return the
    /// stem only; the renderer appends the suffix held in operand 0.
    pub const fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Invalid => "<invalid>",
            Escape => "<escape>",
            GroupExtension => "<group extension>",
            FpuExtension => "<x87 extension>",
            SegmentPrefix => "<segment prefix>",
            RepPrefix => "<rep prefix>",
            RepNePrefix => "<repne prefix>",
            LockPrefix => "<lock prefix>",
            OperandSizePrefix => "<operand size prefix>",
            AddressSizePrefix => "<address size prefix>",

            Aaa => "aaa",
            Aad => "aad",
            Aam => "aam",
            Aas => "aas",
            Adc => "adc",
            Add => "add",
            And => "and",
            CallNear => "call",
            CallFar => "call far",
            Cbw => "cbw",
            Clc => "clc",
            Cld => "cld",
            Cli => "cli",
            Cmc => "cmc",
            Cmp => "cmp",
            Cmps => "cmps",
            Cwd => "cwd",
            Daa => "daa",
            Das => "das",
            Dec => "dec",
            Div => "div",
            Esc => "esc",
            Hlt => "hlt",
            Idiv => "idiv",
            Imul => "imul",
            In => "in",
            Inc => "inc",
            Int => "int",
            Into => "into",
            Iret => "iret",
            Jcc => "j",
            JmpNear => "jmp",
            JmpFar => "jmp far",
            Lahf => "lahf",
            Lea => "lea",
            Lods => "lods",
            Loop => "loop",
            Lxs => "l",
            Mov | MovSreg | MovCr | MovDr | MovTr => "mov",
            Movs => "movs",
            Mul => "mul",
            Neg => "neg",
            Nop => "nop",
            Not => "not",
            Or => "or",
            Out => "out",
            Pop | PopSreg => "pop",
            Popf => "popf",
            Push | PushSreg => "push",
            Pushf => "pushf",
            Rcl => "rcl",
            Rcr => "rcr",
            RetNear => "ret",
            RetFar => "retf",
            Rol => "rol",
            Ror => "ror",
            Sahf => "sahf",
            Salc => "salc",
            Sar => "sar",
            Sbb => "sbb",
            Scas => "scas",
            Shl => "shl",
            Shr => "shr",
            Stc => "stc",
            Std => "std",
            Sti => "sti",
            Stos => "stos",
            Sub => "sub",
            Test => "test",
            Wait => "wait",
            Xchg => "xchg",
            Xlat => "xlat",
            Xor => "xor",

            Bound => "bound",
            Ins => "ins",
            Outs => "outs",
            Enter => "enter",
            Leave => "leave",
            Pusha => "pusha",
            Popa => "popa",
            Arpl => "arpl",
            Clts => "clts",
            Lar => "lar",
            Lsl => "lsl",
            Lgdt => "lgdt",
            Sgdt => "sgdt",
            Lidt => "lidt",
            Sidt => "sidt",
            Lldt => "lldt",
            Sldt => "sldt",
            Ltr => "ltr",
            Str => "str",
            Lmsw => "lmsw",
            Smsw => "smsw",
            Verr => "verr",
            Verw => "verw",
            Loadall => "loadall",

            Bsf => "bsf",
            Bsr => "bsr",
            Bt => "bt",
            Bts => "bts",
            Btr => "btr",
            Btc => "btc",
            Shld => "shld",
            Shrd => "shrd",
            Movsx => "movsx",
            Movzx => "movzx",
            Setcc => "set",

            Bswap => "bswap",
            Cmpxchg => "cmpxchg",
            Xadd => "xadd",
            Invd => "invd",
            Wbinvd => "wbinvd",
            Invlpg => "invlpg",
            Cmovcc => "cmov",
            Cpuid => "cpuid",
            Rdtsc => "rdtsc",
            Cmpxchg8b => "cmpxchg8b",

            F2xm1 => "f2xm1",
            Fabs => "fabs",
            Fadd => "fadd",
            Faddp => "faddp",
            Fbld => "fbld",
            Fbstp => "fbstp",
            Fchs => "fchs",
            Fcom => "fcom",
            Fcomp => "fcomp",
            Fcompp => "fcompp",
            Fcos => "fcos",
            Fdecstp => "fdecstp",
            Fdiv => "fdiv",
            Fdivp => "fdivp",
            Fdivr => "fdivr",
            Fdivrp => "fdivrp",
            Ffree => "ffree",
            Fiadd => "fiadd",
            Ficom => "ficom",
            Ficomp => "ficomp",
            Fidiv => "fidiv",
            Fidivr => "fidivr",
            Fild => "fild",
            Fimul => "fimul",
            Fincstp => "fincstp",
            Fist => "fist",
            Fistp => "fistp",
            Fisub => "fisub",
            Fisubr => "fisubr",
            Fld => "fld",
            Fld1 => "fld1",
            Fldcw => "fldcw",
            Fldenv => "fldenv",
            Fldl2e => "fldl2e",
            Fldl2t => "fldl2t",
            Fldlg2 => "fldlg2",
            Fldln2 => "fldln2",
            Fldpi => "fldpi",
            Fldz => "fldz",
            Fmul => "fmul",
            Fmulp => "fmulp",
            Fnclex => "fnclex",
            Fndisi => "fndisi",
            Fneni => "fneni",
            Fninit => "fninit",
            Fnop => "fnop",
            Fnsave => "fnsave",
            Fnstcw => "fnstcw",
            Fnstenv => "fnstenv",
            Fnstsw => "fnstsw",
            Fpatan => "fpatan",
            Fprem => "fprem",
            Fprem1 => "fprem1",
            Fptan => "fptan",
            Frndint => "frndint",
            Frstor => "frstor",
            Fscale => "fscale",
            Fsetpm => "fsetpm",
            Fsin => "fsin",
            Fsincos => "fsincos",
            Fsqrt => "fsqrt",
            Fst => "fst",
            Fstp => "fstp",
            Fsub => "fsub",
            Fsubp => "fsubp",
            Fsubr => "fsubr",
            Fsubrp => "fsubrp",
            Ftst => "ftst",
            Fucom => "fucom",
            Fucomp => "fucomp",
            Fucompp => "fucompp",
            Fxam => "fxam",
            Fxch => "fxch",
            Fxtract => "fxtract",
            Fyl2x => "fyl2x",
            Fyl2xp1 => "fyl2xp1",
        }
    }

    /// Returns true for table rows that are not instructions.
    pub const fn is_marker(self) -> bool {
        matches!(
            self,
            Operation::Invalid
                | Operation::Escape
                | Operation::GroupExtension
                | Operation::FpuExtension
                | Operation::SegmentPrefix
                | Operation::RepPrefix
                | Operation::RepNePrefix
                | Operation::LockPrefix
                | Operation::OperandSizePrefix
                | Operation::AddressSizePrefix
        )
    }

    /// Returns true for string operations whose mnemonic takes a width suffix.
    pub const fn is_string_op(self) -> bool {
        matches!(
            self,
            Operation::Cmps
                | Operation::Lods
                | Operation::Movs
                | Operation::Scas
                | Operation::Stos
                | Operation::Ins
                | Operation::Outs
        )
    }

    /// Returns true for string operations that a repeat prefix turns into
    /// `repe`/`repne` rather than plain `rep`.
    pub const fn is_compare_string_op(self) -> bool {
        matches!(self, Operation::Cmps | Operation::Scas)
    }
}

/// Prefix state and stream-derived values captured while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstructionData {
    /// Effective operand size.
    pub operand_size: OperandSize,
    /// Effective address size.
    pub address_size: AddressSize,
    /// Segment used for memory operands (the override, or the default of
    /// the addressing form).
    pub segment: Segment,
    /// Explicit segment-override prefix, if any.
    pub segment_override: Option<Segment>,
    /// `lock` prefix seen.
    pub lock: bool,
    /// `rep` or `repne` prefix seen.
    pub rep: bool,
    /// The repeat prefix was `repne`.
    pub repne: bool,
    /// Raw ModRM byte, zero when absent.
    pub modrm: u8,
    /// Raw SIB byte, zero when absent.
    pub sib: u8,
    /// ModRM.rm names a register rather than memory.
    pub modrm_rm_register: bool,
    /// Sign-extended displacement (memory or branch).
    pub displacement: u32,
    /// First immediate, zero-extended.
    pub immediate: u32,
    /// Second immediate, zero-extended.
    pub immediate2: u32,
}

impl InstructionData {
    /// ModRM.mod field.
    pub const fn modrm_mod(&self) -> u8 {
        self.modrm >> 6
    }

    /// ModRM.reg field.
    pub const fn modrm_reg(&self) -> u8 {
        (self.modrm >> 3) & 7
    }

    /// ModRM.rm field.
    pub const fn modrm_rm(&self) -> u8 {
        self.modrm & 7
    }

    /// SIB scale field, as a shift amount.
    pub const fn sib_scale(&self) -> u8 {
        self.sib >> 6
    }

    /// SIB index field.
    pub const fn sib_index(&self) -> u8 {
        (self.sib >> 3) & 7
    }

    /// SIB base field.
    pub const fn sib_base(&self) -> u8 {
        self.sib & 7
    }

    /// The SIB byte names a base register (`101` with mod `00` means none).
    pub const fn has_sib_base(&self) -> bool {
        self.sib_base() != 0b101 || self.modrm_mod() != 0
    }

    /// The SIB byte names an index register (`100` means none).
    pub const fn has_sib_index(&self) -> bool {
        self.sib_index() != 0b100
    }

    /// Displacement reinterpreted as signed.
    pub const fn signed_displacement(&self) -> i32 {
        self.displacement as i32
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Linear address of the first byte, prefixes included.
    pub address: u32,
    /// Number of bytes consumed.
    pub length: u32,
    /// Decoded operation. Never a table marker.
    pub operation: Operation,
    /// Operand slots, destination first. Unused slots are `OperandMode::None`.
    pub operands: [Operand; MAX_OPERANDS],
    /// Prefixes and stream-derived values.
    pub data: InstructionData,
}

impl Instruction {
    /// Returns the address of the following instruction.
    pub fn next_address(&self) -> u32 {
        self.address.wrapping_add(self.length)
    }

    /// Returns the effective operand size.
    pub fn operand_size(&self) -> OperandSize {
        self.data.operand_size
    }

    /// Returns the effective address size.
    pub fn address_size(&self) -> AddressSize {
        self.data.address_size
    }

    /// Returns the used operand slots.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.operands.iter().filter(|op| !op.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert!(Operation::Escape.is_marker());
        assert!(Operation::LockPrefix.is_marker());
        assert!(!Operation::Mov.is_marker());
    }

    #[test]
    fn test_string_op_classes() {
        assert!(Operation::Scas.is_string_op());
        assert!(Operation::Scas.is_compare_string_op());
        assert!(Operation::Movs.is_string_op());
        assert!(!Operation::Movs.is_compare_string_op());
        assert!(!Operation::Mov.is_string_op());
    }

    #[test]
    fn test_mnemonic_stems() {
        assert_eq!(Operation::Jcc.mnemonic(), "j");
        assert_eq!(Operation::Lxs.mnemonic(), "l");
        assert_eq!(Operation::MovCr.mnemonic(), "mov");
        assert_eq!(Operation::CallFar.mnemonic(), "call far");
        assert_eq!(Operation::Fucompp.mnemonic(), "fucompp");
    }

    #[test]
    fn test_field_decomposition() {
        let data = InstructionData {
            modrm: 0b01_010_100,
            sib: 0b10_011_101,
            ..Default::default()
        };
        assert_eq!(data.modrm_mod(), 1);
        assert_eq!(data.modrm_reg(), 2);
        assert_eq!(data.modrm_rm(), 4);
        assert_eq!(data.sib_scale(), 2);
        assert_eq!(data.sib_index(), 3);
        assert_eq!(data.sib_base(), 5);
        assert!(data.has_sib_base());
        assert!(data.has_sib_index());
    }

    #[test]
    fn test_sib_absent_base_and_index() {
        let data = InstructionData {
            modrm: 0b00_000_100,
            sib: 0b00_100_101,
            ..Default::default()
        };
        assert!(!data.has_sib_base());
        assert!(!data.has_sib_index());
    }

    #[test]
    fn test_next_address_wraps() {
        let inst = Instruction {
            address: 0xFFFF_FFFF,
            length: 2,
            operation: Operation::Nop,
            operands: [Operand::default(); MAX_OPERANDS],
            data: InstructionData::default(),
        };
        assert_eq!(inst.next_address(), 1);
        assert_eq!(inst.operands().count(), 0);
    }
}
