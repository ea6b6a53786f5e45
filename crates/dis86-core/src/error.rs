//! Error types for dis86-core.

use thiserror::Error;

use crate::RegisterWidth;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A segment register index outside `es`..`gs`.
    #[error("invalid segment register index: {0}")]
    InvalidSegment(u8),

    /// A register value was read at a width it does not carry.
    #[error("register value is {actual:?}, cannot read it as {requested:?}")]
    WidthMismatch {
        actual: RegisterWidth,
        requested: RegisterWidth,
    },
}
