//! Benchmarks for decoding, rendering and backward scanning.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dis86_disasm::{format_instruction, BoundaryScanner, Disassembler, X86Disassembler};

/// Sample 16-bit code: a DOS-style routine with a mix of register, memory,
/// string and control-flow instructions.
const REAL_MODE_CODE: &[u8] = &[
    0x55, // push bp
    0x89, 0xe5, // mov bp, sp
    0x83, 0xec, 0x04, // sub sp, 4
    0x8b, 0x46, 0x04, // mov ax, [bp+4]
    0x8e, 0xd8, // mov ds, ax
    0xbe, 0x00, 0x01, // mov si, 100h
    0xfc, // cld
    0xac, // lodsb
    0x3c, 0x24, // cmp al, '$'
    0x74, 0x06, // je .done
    0xb4, 0x0e, // mov ah, 0Eh
    0xcd, 0x10, // int 10h
    0xeb, 0xf5, // jmp .loop
    // .done:
    0xf3, 0xa4, // rep movsb
    0x89, 0xec, // mov sp, bp
    0x5d, // pop bp
    0xc3, // ret
];

/// Sample 32-bit code with SIB addressing, 0F-escaped and x87 instructions.
const PROTECTED_MODE_CODE: &[u8] = &[
    0x55, // push ebp
    0x89, 0xe5, // mov ebp, esp
    0x8b, 0x44, 0x8e, 0x08, // mov eax, [esi+ecx*4+8]
    0x0f, 0xb6, 0x1c, 0x24, // movzx ebx, byte [esp]
    0x0f, 0xaf, 0xc3, // imul eax, ebx
    0xd9, 0x45, 0x08, // fld dword [ebp+8]
    0xdc, 0xc1, // fadd st(1), st(0)
    0x64, 0xa1, 0x30, 0x00, 0x00, 0x00, // mov eax, fs:[30h]
    0x0f, 0x84, 0x10, 0x00, 0x00, 0x00, // je rel32
    0xf2, 0xae, // repne scasb
    0xc9, // leave
    0xc3, // ret
];

/// Larger code block for throughput testing (repeated pattern).
fn generate_large_block(pattern: &[u8], size: usize) -> Vec<u8> {
    let mut result = Vec::with_capacity(size);
    while result.len() < size {
        let remaining = size - result.len();
        let to_copy = remaining.min(pattern.len());
        result.extend_from_slice(&pattern[..to_copy]);
    }
    result
}

fn bench_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoding");

    for (name, disasm, code) in [
        ("real_mode", X86Disassembler::real_mode(), REAL_MODE_CODE),
        ("protected_mode", X86Disassembler::protected_mode(), PROTECTED_MODE_CODE),
    ] {
        group.bench_function(BenchmarkId::new("single_instruction", name), |b| {
            b.iter(|| {
                let _ = disasm.decode_instruction(black_box(&code[..3]), 0x1000);
            })
        });

        group.bench_function(BenchmarkId::new("small_function", name), |b| {
            b.iter(|| {
                let _ = disasm.disassemble_block(black_box(code), 0x1000);
            })
        });

        for size in [1024, 16384] {
            let block = generate_large_block(code, size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("throughput_{name}"), size),
                &block,
                |b, block| {
                    b.iter(|| {
                        let _ = disasm.disassemble_block(black_box(block), 0x1000);
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let disasm = X86Disassembler::protected_mode();
    let instructions: Vec<_> = disasm
        .disassemble_block(PROTECTED_MODE_CODE, 0x1000)
        .into_iter()
        .filter_map(Result::ok)
        .collect();

    c.bench_function("render_function", |b| {
        b.iter(|| {
            for inst in &instructions {
                black_box(format_instruction(black_box(inst)));
            }
        })
    });
}

fn bench_backward_scan(c: &mut Criterion) {
    let disasm = X86Disassembler::real_mode();
    let scanner = BoundaryScanner::new(&disasm);
    let block = generate_large_block(REAL_MODE_CODE, 4096);
    let target = REAL_MODE_CODE.len() as u32 * 64;

    let mut group = c.benchmark_group("backward_scan");
    for count in [1usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| scanner.instructions_before(&block[..], black_box(target), count))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decoding, bench_rendering, bench_backward_scan);
criterion_main!(benches);
