use std::io;

use thiserror::Error;

/// Machine faults are fatal: they terminate the driver loop and surface
/// through its result. `Io` covers ROM loading before the machine runs.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("unknown opcode {word:#06X} at {pc:#05X}")]
    UnknownOpcode { word: u16, pc: u16 },

    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("address out of range: {0:#06X}")]
    AddressOutOfRange(u16),

    #[error("ROM I/O: {0}")]
    Io(#[from] io::Error),
}
