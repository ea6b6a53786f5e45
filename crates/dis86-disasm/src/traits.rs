//! Disassembler traits.

use crate::DecodeError;
use dis86_core::Instruction;

/// Trait for instruction decoders over byte slices.
pub trait Disassembler {
    /// Decode a single instruction starting at the given address.
    ///
    /// # Arguments
    /// * `bytes` - The raw bytes to decode
    /// * `address` - The linear address of the first byte
    ///
    /// # Returns
    /// The decoded instruction; its `length` is the number of bytes consumed.
    fn decode_instruction(&self, bytes: &[u8], address: u32) -> Result<Instruction, DecodeError>;

    /// Returns the minimum instruction size.
    fn min_instruction_size(&self) -> usize;

    /// Returns the maximum instruction size.
    fn max_instruction_size(&self) -> usize;

    /// Disassemble a block of code into instructions.
    ///
    /// An undecodable byte yields an error entry and decoding resumes at the
    /// next byte.
    fn disassemble_block(
        &self,
        bytes: &[u8],
        start_address: u32,
    ) -> Vec<Result<Instruction, DecodeError>> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let remaining = &bytes[offset..];
            let address = start_address.wrapping_add(offset as u32);

            match self.decode_instruction(remaining, address) {
                Ok(instruction) => {
                    offset += instruction.length as usize;
                    instructions.push(Ok(instruction));
                }
                Err(e) => {
                    log::trace!("skipping undecodable byte at {:#x}: {}", address, e);
                    offset += 1;
                    instructions.push(Err(e));
                }
            }
        }

        instructions
    }
}
