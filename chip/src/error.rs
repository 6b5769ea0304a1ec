use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ProcessError {
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Invalid memory access '{0}'.")]
    Memory(#[from] MemoryError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum MemoryError {
    #[error("Address {address:#06X} is outside of the memory.")]
    OutOfBounds { address: usize },
    #[error("Address {address:#06X} is reserved for the interpreter and can not be written.")]
    Reserved { address: usize },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("The program has {size} bytes, but only {max} bytes fit into memory.")]
    ProgramTooLarge { size: usize, max: usize },
    #[error("Unable to read the program '{0}'.")]
    Io(#[from] std::io::Error),
    #[error("Unable to extract the program from the archive '{0}'.")]
    Archive(#[from] zip::result::ZipError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum ConfigError {
    #[error("The display scale has to be at least 1.")]
    Scale,
    #[error("At least one instruction has to run per frame.")]
    InstructionsPerFrame,
    #[error("The tone frequency has to be at least 1 Hz.")]
    ToneFrequency,
    #[error("The volume {0} can not be negative.")]
    Volume(i16),
}
