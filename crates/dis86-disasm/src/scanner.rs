//! Backward instruction boundary recovery.
//!
//! x86 encodings carry no alignment or length markers, so the start of the
//! instruction before a known boundary can only be found by trial decoding.
//! The scanner walks candidate start addresses downward from the target and
//! accepts the nearest one whose decoded length ends exactly on the target.
//! A coincidental match is accepted as readily as the intended one.

use crate::source::CodeMemory;
use crate::x86::{X86Disassembler, MAX_INSTRUCTION_LENGTH};

/// Finds instruction starts preceding a known boundary.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryScanner<'d> {
    disassembler: &'d X86Disassembler,
    max_lookback: u32,
}

impl<'d> BoundaryScanner<'d> {
    /// Creates a scanner that looks back up to the longest instruction.
    pub fn new(disassembler: &'d X86Disassembler) -> Self {
        Self {
            disassembler,
            max_lookback: MAX_INSTRUCTION_LENGTH as u32,
        }
    }

    /// Limits how far before the target candidates are tried, clamped to
    /// `1..=MAX_INSTRUCTION_LENGTH`.
    pub fn with_max_lookback(mut self, max_lookback: u32) -> Self {
        self.max_lookback = max_lookback.clamp(1, MAX_INSTRUCTION_LENGTH as u32);
        self
    }

    /// Furthest distance before the target that is tried.
    pub fn max_lookback(&self) -> u32 {
        self.max_lookback
    }

    /// Returns the start of the instruction that ends at `target`.
    ///
    /// Returns `None` when no candidate within the lookback window decodes to
    /// a length landing on `target`, or when `target` is 0.
    pub fn previous_instruction<M: CodeMemory + ?Sized>(
        &self,
        memory: &M,
        target: u32,
    ) -> Option<u32> {
        let mut candidate = target.checked_sub(1)?;
        while target - candidate <= self.max_lookback {
            if let Ok(inst) = self.disassembler.decode_at(memory, candidate) {
                if candidate.checked_add(inst.length) == Some(target) {
                    return Some(candidate);
                }
            }
            candidate = match candidate.checked_sub(1) {
                Some(next) => next,
                None => break,
            };
        }
        log::debug!("no instruction boundary found before {:#x}", target);
        None
    }

    /// Returns up to `count` instruction starts before `target`, in
    /// ascending address order.
    ///
    /// Scanning stops at the first address with no recoverable predecessor,
    /// so fewer than `count` addresses may be returned.
    pub fn instructions_before<M: CodeMemory + ?Sized>(
        &self,
        memory: &M,
        target: u32,
        count: usize,
    ) -> Vec<u32> {
        let mut starts = Vec::with_capacity(count);
        let mut boundary = target;
        while starts.len() < count {
            match self.previous_instruction(memory, boundary) {
                Some(start) => {
                    starts.push(start);
                    boundary = start;
                }
                None => break,
            }
        }
        starts.reverse();
        starts
    }
}
