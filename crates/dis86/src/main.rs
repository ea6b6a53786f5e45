//! dis86 - a 16/32-bit x86 disassembler
//!
//! Usage:
//!   dis86 <file>                         Disassemble a raw code file
//!   dis86 --hex "b0 05 c3"               Disassemble bytes given as hex text
//!   dis86 <file> -b 32 -o 0x401000       32-bit code loaded at 401000h
//!   dis86 <file> --cpu 8086              Use the 8086 opcode map
//!   dis86 <file> --before 0x120 -c 4     The 4 instructions ending at 120h

use anyhow::{bail, Context, Result};
use clap::Parser;
use dis86_disasm::{
    format_instruction, CodeMemory, CpuModel, DecodeError, DecoderConfig, Disassembler, Listing,
    MemoryImage, X86Disassembler, MAX_INSTRUCTION_LENGTH,
};
use std::fs;
use std::path::PathBuf;

/// Byte columns reserved before the disassembly text.
const BYTE_COLUMNS: usize = 6;

/// Bytes shown for an undecodable position.
const ERROR_BYTES: usize = 16;

#[derive(Parser)]
#[command(name = "dis86")]
#[command(about = "A 16/32-bit x86 disassembler", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a raw code file
    #[arg(required_unless_present = "hex", conflicts_with = "hex")]
    file: Option<PathBuf>,

    /// Decode bytes given as hex text; whitespace and commas are ignored
    #[arg(long)]
    hex: Option<String>,

    /// Code width: 16 or 32
    #[arg(short, long, default_value_t = 16, value_parser = parse_bits)]
    bits: u32,

    /// Processor opcode map: 8086 (also 8088) or 386 (also 486, 586)
    #[arg(long, default_value = "386", value_parser = parse_cpu)]
    cpu: CpuModel,

    /// Address of the first byte (0x-prefixed hex or decimal)
    #[arg(short, long, default_value = "0", value_parser = parse_address)]
    origin: u32,

    /// List the instructions that end at this address instead
    #[arg(long, value_parser = parse_address)]
    before: Option<u32>,

    /// Number of instructions listed by --before
    #[arg(short, long, default_value = "8")]
    count: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_bits(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(bits @ (16 | 32)) => Ok(bits),
        _ => Err(format!("invalid bit width: {s} (expected 16 or 32)")),
    }
}

fn parse_cpu(s: &str) -> Result<CpuModel, String> {
    match s {
        "8086" | "8088" => Ok(CpuModel::Intel8086),
        "386" | "486" | "586" => Ok(CpuModel::Intel386),
        _ => Err(format!("unknown cpu: {s} (expected 8086 or 386)")),
    }
}

fn parse_address(s: &str) -> Result<u32, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None => s.parse::<u32>().map_err(|e| e.to_string()),
    }
}

/// Parses hex text such as `"B0 05, C3"` into bytes.
fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b',')
        .collect();
    if digits.is_empty() {
        bail!("hex string contains no bytes");
    }
    if digits.len() % 2 != 0 {
        bail!("hex string has an odd number of digits");
    }

    if let Some(bad) = digits.iter().find(|b| !b.is_ascii_hexdigit()) {
        bail!("invalid hex digit {:?}", char::from(*bad));
    }

    Ok(digits
        .chunks(2)
        .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
        .collect())
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let code = match (&cli.hex, &cli.file) {
        (Some(text), _) => {
            let bytes = parse_hex_bytes(text).context("Failed to parse hex string")?;
            log::info!("Parsed {} bytes of hex string", bytes.len());
            bytes
        }
        (None, Some(path)) => {
            log::debug!("Reading input file: {}", path.display());
            fs::read(path)
                .with_context(|| format!("Failed to read code file: {}", path.display()))?
        }
        (None, None) => bail!("Missing input file"),
    };

    let config = DecoderConfig::for_cpu(cli.cpu, cli.bits)
        .with_context(|| format!("{:?} cannot decode {}-bit code", cli.cpu, cli.bits))?;
    log::debug!("Assuming {}-bit code for {:?}", cli.bits, cli.cpu);
    log::debug!("Origin address: {:#010X}", cli.origin);

    let disasm = X86Disassembler::new(config);
    let image = MemoryImage::new(cli.origin, code);

    match cli.before {
        Some(target) => list_before(&disasm, &image, target, cli.count),
        None => disassemble_image(&disasm, &image),
    }
}

/// Formats bytes as `"%02X "` each, padded to the byte columns.
fn byte_column(bytes: &[u8]) -> String {
    let mut text: String = bytes.iter().map(|b| format!("{:02X} ", b)).collect();
    for _ in bytes.len()..BYTE_COLUMNS {
        text.push_str("   ");
    }
    text
}

fn print_line(address: u32, bytes: &[u8], text: &str) {
    println!("0x{:08X} | {} | {}", address, byte_column(bytes), text);
}

/// Disassembles the whole image, skipping one byte after each failure.
fn disassemble_image(disasm: &X86Disassembler, image: &MemoryImage) -> Result<()> {
    let bytes = image.bytes();
    let mut offset = 0usize;
    let mut failures = 0usize;

    for result in disasm.disassemble_block(bytes, image.origin()) {
        match result {
            Ok(inst) => {
                let length = inst.length as usize;
                let text = format_instruction(&inst);
                print_line(inst.address, &bytes[offset..offset + length], &text);
                offset += length;
            }
            Err(e) => {
                let shown = &bytes[offset..bytes.len().min(offset + ERROR_BYTES)];
                report_failure(&e, offset, shown);
                print_line(e.address(), shown, "<decode error>");
                failures += 1;
                offset += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} byte(s) could not be decoded", failures);
    }
    Ok(())
}

fn report_failure(error: &DecodeError, offset: usize, bytes: &[u8]) {
    eprintln!(
        "Failed to decode instruction at address 0x{:08X} (offset 0x{:08X}): {}",
        error.address(),
        offset,
        error
    );
    eprintln!("Bytes at failure point: {}", byte_column(bytes).trim_end());
}

/// Lists up to `count` instructions that end at `target`.
fn list_before(
    disasm: &X86Disassembler,
    image: &MemoryImage,
    target: u32,
    count: usize,
) -> Result<()> {
    if target < image.origin() || target > image.end() {
        bail!(
            "Address {:#x} is outside the image ({:#x}..{:#x})",
            target,
            image.origin(),
            image.end()
        );
    }

    let listing = Listing::new(disasm, image);
    let lines = listing.lines_before(target, count);
    if lines.is_empty() {
        bail!("No instruction boundary found before {:#x}", target);
    }
    for line in &lines {
        let mut bytes = [0u8; MAX_INSTRUCTION_LENGTH];
        let read = image.read_bytes(line.linear_address, &mut bytes[..line.size as usize]);
        print_line(line.linear_address, &bytes[..read], &line.text);
    }
    Ok(())
}
