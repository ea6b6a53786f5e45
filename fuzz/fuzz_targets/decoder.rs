#![no_main]

use dis86_disasm::{format_instruction, BoundaryScanner, Disassembler, X86Disassembler};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first byte picks the mode
    let Some((&mode, code)) = data.split_first() else {
        return;
    };
    let disasm = if mode & 1 == 0 {
        X86Disassembler::real_mode()
    } else {
        X86Disassembler::protected_mode()
    };

    // Decoding and rendering should never panic; errors are fine
    if let Ok(inst) = disasm.decode_instruction(code, 0x1000) {
        assert!(inst.length as usize <= code.len());
        let _ = format_instruction(&inst);
    }

    // Walk the whole block the way the CLI does
    for inst in disasm.disassemble_block(code, 0x1000).into_iter().flatten() {
        let _ = format_instruction(&inst);
    }

    // Every scanner answer must decode onto the target
    let scanner = BoundaryScanner::new(&disasm);
    let target = code.len() as u32;
    if let Some(start) = scanner.previous_instruction(code, target) {
        let inst = disasm
            .decode_at(code, start)
            .expect("scanner returned an undecodable start");
        assert_eq!(start + inst.length, target);
    }
});
