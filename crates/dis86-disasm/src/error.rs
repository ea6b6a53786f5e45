//! Disassembly error types.

use thiserror::Error;

/// Error type for instruction decoding.
///
/// Every variant means "no valid instruction starts at this address". Callers
/// such as the boundary scanner and the block walker treat them alike and
/// move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte source ran out before the instruction was complete.
    #[error("truncated instruction at {address:#x}: need {needed} bytes, have {available}")]
    Truncated {
        address: u32,
        needed: usize,
        available: usize,
    },

    /// The opcode bytes select an undefined table slot.
    #[error("invalid opcode at {address:#x}: {bytes:02x?}")]
    InvalidOpcode { address: u32, bytes: Vec<u8> },

    /// Prefixes pushed the instruction past the architectural length limit.
    #[error("instruction at {address:#x} exceeds {limit} bytes")]
    TooLong { address: u32, limit: usize },
}

impl DecodeError {
    /// Creates a new Truncated error.
    pub fn truncated(address: u32, needed: usize, available: usize) -> Self {
        Self::Truncated {
            address,
            needed,
            available,
        }
    }

    /// Creates a new InvalidOpcode error.
    pub fn invalid_opcode(address: u32, bytes: &[u8]) -> Self {
        Self::InvalidOpcode {
            address,
            bytes: bytes.to_vec(),
        }
    }

    /// Creates a new TooLong error.
    pub fn too_long(address: u32, limit: usize) -> Self {
        Self::TooLong { address, limit }
    }

    /// Returns the address the failed decode started at.
    pub fn address(&self) -> u32 {
        match *self {
            Self::Truncated { address, .. }
            | Self::InvalidOpcode { address, .. }
            | Self::TooLong { address, .. } => address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DecodeError::truncated(0x100, 3, 1);
        assert_eq!(
            err.to_string(),
            "truncated instruction at 0x100: need 3 bytes, have 1"
        );

        let err = DecodeError::invalid_opcode(0x7c00, &[0x0f, 0x04]);
        assert_eq!(err.to_string(), "invalid opcode at 0x7c00: [0f, 04]");
        assert_eq!(err.address(), 0x7c00);

        let err = DecodeError::too_long(0x10, 15);
        assert_eq!(err.to_string(), "instruction at 0x10 exceeds 15 bytes");
    }
}
