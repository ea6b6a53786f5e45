//! x87 FPU escape tables.
//!
//! x87 FPU instructions use escape opcodes 0xD8-0xDF, each with a 72-entry
//! table:
//! - Rows 0-7: memory forms (ModR/M < 0xC0), selected by the reg field
//! - Rows 8-71: register forms (ModR/M >= 0xC0), selected by `modrm & 0x3F`

use dis86_core::Operation::{self, *};

use super::opcodes::{
    op0, op1, op2, st, OperandTemplate, TableEntry, AX, M, Md, Mq, Mt, Mw,
};

/// Memory-form operations of the arithmetic escapes, in reg-field order.
const ARITH: [Operation; 8] = [Fadd, Fmul, Fcom, Fcomp, Fsub, Fsubr, Fdiv, Fdivr];
const INT_ARITH: [Operation; 8] = [Fiadd, Fimul, Ficom, Ficomp, Fisub, Fisubr, Fidiv, Fidivr];

const fn empty() -> [TableEntry; 72] {
    [TableEntry::Invalid; 72]
}

/// Fills rows 0-7 with `op st(0), mem` for each arithmetic operation.
const fn arith_memory(
    mut table: [TableEntry; 72],
    ops: [Operation; 8],
    mem: OperandTemplate,
) -> [TableEntry; 72] {
    let mut i = 0;
    while i < 8 {
        table[i] = op2(ops[i], st(0), mem);
        i += 1;
    }
    table
}

/// Fills register row `row` with `op st(0), st(i)` or `op st(i), st(0)`.
const fn st_pairs(
    mut table: [TableEntry; 72],
    row: usize,
    operation: Operation,
    destination_is_st0: bool,
) -> [TableEntry; 72] {
    let mut i = 0;
    while i < 8 {
        table[8 + row * 8 + i] = if destination_is_st0 {
            op2(operation, st(0), st(i as u8))
        } else {
            op2(operation, st(i as u8), st(0))
        };
        i += 1;
    }
    table
}

/// Fills register row `row` with `op st(i)`.
const fn st_single(
    mut table: [TableEntry; 72],
    row: usize,
    operation: Operation,
) -> [TableEntry; 72] {
    let mut i = 0;
    while i < 8 {
        table[8 + row * 8 + i] = op1(operation, st(i as u8));
        i += 1;
    }
    table
}

/// Fills register row `row` with operand-less operations; `Invalid` leaves a hole.
const fn st_row(mut table: [TableEntry; 72], row: usize, ops: [Operation; 8]) -> [TableEntry; 72] {
    let mut i = 0;
    while i < 8 {
        table[8 + row * 8 + i] = match ops[i] {
            Operation::Invalid => TableEntry::Invalid,
            operation => op0(operation),
        };
        i += 1;
    }
    table
}

pub static FPU_D8: [TableEntry; 72] = {
    let mut table = arith_memory(empty(), ARITH, Md);
    let mut row = 0;
    while row < 8 {
        table = st_pairs(table, row, ARITH[row], true);
        row += 1;
    }
    table
};

pub static FPU_D9: [TableEntry; 72] = {
    let mut table = empty();
    table[0] = op1(Fld, Md);
    table[2] = op1(Fst, Md);
    table[3] = op1(Fstp, Md);
    table[4] = op1(Fldenv, M);
    table[5] = op1(Fldcw, Mw);
    table[6] = op1(Fnstenv, M);
    table[7] = op1(Fnstcw, Mw);

    table = st_single(table, 0, Fld);
    table = st_single(table, 1, Fxch);
    table[8 + 0x10] = op0(Fnop);
    table = st_row(
        table,
        4,
        [Fchs, Fabs, Invalid, Invalid, Ftst, Fxam, Invalid, Invalid],
    );
    table = st_row(
        table,
        5,
        [Fld1, Fldl2t, Fldl2e, Fldpi, Fldlg2, Fldln2, Fldz, Invalid],
    );
    table = st_row(
        table,
        6,
        [F2xm1, Fyl2x, Fptan, Fpatan, Fxtract, Fprem1, Fdecstp, Fincstp],
    );
    table = st_row(
        table,
        7,
        [Fprem, Fyl2xp1, Fsqrt, Fsincos, Frndint, Fscale, Fsin, Fcos],
    );
    table
};

pub static FPU_DA: [TableEntry; 72] = {
    let mut table = arith_memory(empty(), INT_ARITH, Md);
    table[8 + 0x29] = op0(Fucompp);
    table
};

pub static FPU_DB: [TableEntry; 72] = {
    let mut table = empty();
    table[0] = op1(Fild, Md);
    table[2] = op1(Fist, Md);
    table[3] = op1(Fistp, Md);
    table[5] = op1(Fld, Mt);
    table[7] = op1(Fstp, Mt);
    st_row(
        table,
        4,
        [Fneni, Fndisi, Fnclex, Fninit, Fsetpm, Invalid, Invalid, Invalid],
    )
};

pub static FPU_DC: [TableEntry; 72] = {
    let mut table = arith_memory(empty(), ARITH, Mq);
    table = st_pairs(table, 0, Fadd, false);
    table = st_pairs(table, 1, Fmul, false);
    table = st_pairs(table, 4, Fsubr, false);
    table = st_pairs(table, 5, Fsub, false);
    table = st_pairs(table, 6, Fdivr, false);
    st_pairs(table, 7, Fdiv, false)
};

pub static FPU_DD: [TableEntry; 72] = {
    let mut table = empty();
    table[0] = op1(Fld, Mq);
    table[2] = op1(Fst, Mq);
    table[3] = op1(Fstp, Mq);
    table[4] = op1(Frstor, M);
    table[6] = op1(Fnsave, M);
    table[7] = op1(Fnstsw, Mw);

    table = st_single(table, 0, Ffree);
    table = st_single(table, 2, Fst);
    table = st_single(table, 3, Fstp);
    table = st_single(table, 4, Fucom);
    st_single(table, 5, Fucomp)
};

pub static FPU_DE: [TableEntry; 72] = {
    let mut table = arith_memory(empty(), INT_ARITH, Mw);
    table = st_pairs(table, 0, Faddp, false);
    table = st_pairs(table, 1, Fmulp, false);
    table[8 + 0x19] = op0(Fcompp);
    table = st_pairs(table, 4, Fsubrp, false);
    table = st_pairs(table, 5, Fsubp, false);
    table = st_pairs(table, 6, Fdivrp, false);
    st_pairs(table, 7, Fdivp, false)
};

pub static FPU_DF: [TableEntry; 72] = {
    let mut table = empty();
    table[0] = op1(Fild, Mw);
    table[2] = op1(Fist, Mw);
    table[3] = op1(Fistp, Mw);
    table[4] = op1(Fbld, Mt);
    table[5] = op1(Fild, Mq);
    table[6] = op1(Fbstp, Mt);
    table[7] = op1(Fistp, Mq);
    table[8 + 0x20] = op1(Fnstsw, AX);
    table
};
