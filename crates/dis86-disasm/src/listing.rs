//! Debugger-facing listing lines.
//!
//! A code view shows a window of instructions around the instruction
//! pointer. Lines after an address come from straight decoding, lines before
//! it from the [`BoundaryScanner`]. The debugger itself (register access,
//! memory translation, stepping) lives outside this crate and is described by
//! [`DebugTarget`].

use dis86_core::{Instruction, RegisterValue};

use crate::display::format_instruction;
use crate::error::DecodeError;
use crate::scanner::BoundaryScanner;
use crate::source::CodeMemory;
use crate::x86::{X86Disassembler, MAX_INSTRUCTION_LENGTH};

/// One formatted line of a code view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    /// Linear address of the instruction.
    pub linear_address: u32,
    /// Address as eight upper-case hex digits.
    pub address_text: String,
    /// Encoded bytes as upper-case hex pairs separated by spaces.
    pub bytes_text: String,
    /// Assembly text.
    pub text: String,
    /// Encoded length in bytes.
    pub size: u32,
    /// The decoded instruction.
    pub instruction: Instruction,
}

/// Capabilities a debugger front end provides around the disassembler.
///
/// Nothing in this crate implements it; callers hand an implementation to
/// [`Listing::for_target`] to list code around the current instruction.
pub trait DebugTarget {
    /// Memory view type.
    type Memory: CodeMemory + ?Sized;

    /// Number of registers the target exposes.
    fn register_count(&self) -> usize;

    /// Display name of register `index`.
    fn register_name(&self, index: usize) -> Option<&str>;

    /// Current value of register `index`.
    fn register_value(&self, index: usize) -> Option<RegisterValue>;

    /// Linear address of the next instruction to execute.
    fn instruction_pointer(&self) -> u32;

    /// Linear memory as seen by the target.
    fn memory(&self) -> &Self::Memory;
}

/// Builds listing lines over a memory view.
#[derive(Debug)]
pub struct Listing<'a, M: ?Sized> {
    disassembler: &'a X86Disassembler,
    memory: &'a M,
}

impl<'a, M: CodeMemory + ?Sized> Listing<'a, M> {
    pub fn new(disassembler: &'a X86Disassembler, memory: &'a M) -> Self {
        Self {
            disassembler,
            memory,
        }
    }

    /// Decodes and formats the instruction at `address`.
    pub fn disassemble(&self, address: u32) -> Result<ListingLine, DecodeError> {
        let instruction = self.disassembler.decode_at(self.memory, address)?;

        let mut buf = [0u8; MAX_INSTRUCTION_LENGTH];
        let size = instruction.length as usize;
        let read = self.memory.read_bytes(address, &mut buf[..size]);
        let bytes_text = buf[..read]
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(ListingLine {
            linear_address: address,
            address_text: format!("{:08X}", address),
            bytes_text,
            text: format_instruction(&instruction),
            size: instruction.length,
            instruction,
        })
    }

    /// Lists up to `count` instructions starting at `start`.
    ///
    /// Stops at the first decode failure or when the next address would wrap.
    pub fn lines_after(&self, start: u32, count: usize) -> Vec<ListingLine> {
        let mut lines = Vec::with_capacity(count);
        let mut address = start;
        while lines.len() < count {
            let line = match self.disassemble(address) {
                Ok(line) => line,
                Err(e) => {
                    log::debug!("forward listing stopped: {}", e);
                    break;
                }
            };
            let next = address.checked_add(line.size);
            lines.push(line);
            match next {
                Some(next) => address = next,
                None => break,
            }
        }
        lines
    }

    /// Lists up to `count` instructions ending at `target`, in address order.
    pub fn lines_before(&self, target: u32, count: usize) -> Vec<ListingLine> {
        let scanner = BoundaryScanner::new(self.disassembler);
        let starts = scanner.instructions_before(self.memory, target, count);
        if starts.len() < count {
            log::debug!(
                "backward listing from {:#x} stopped after {} of {} lines",
                target,
                starts.len(),
                count
            );
        }
        starts
            .into_iter()
            .filter_map(|start| self.disassemble(start).ok())
            .collect()
    }

    /// Lists `before` lines ending at `address` followed by `after` lines
    /// starting at it.
    pub fn window(&self, address: u32, before: usize, after: usize) -> Vec<ListingLine> {
        let mut lines = self.lines_before(address, before);
        lines.extend(self.lines_after(address, after));
        lines
    }
}

impl<'a, M: CodeMemory + ?Sized> Listing<'a, M> {
    /// Lists code around a target's instruction pointer.
    pub fn for_target<T>(
        disassembler: &'a X86Disassembler,
        target: &'a T,
        before: usize,
        after: usize,
    ) -> Vec<ListingLine>
    where
        T: DebugTarget<Memory = M> + ?Sized,
    {
        let listing = Listing::new(disassembler, target.memory());
        listing.window(target.instruction_pointer(), before, after)
    }
}
