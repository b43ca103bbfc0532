// Generator Error Handling

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CompilerError {
    // Emission errors
    NoActiveScope,
    EmptyChain(String),
    DuplicateName(String),
    UnknownName(String),
    InvalidWidth(u32),

    // Relocation errors
    RelocationOverflow(String, usize, usize), // chain, length, window
    EmptyRelocation(String),

    // Encoding errors
    UnknownMnemonic(String),
    InvalidOperand(String),
    NoEncoding(String, Vec<String>, Vec<String>), // mnemonic, operand types, candidates
    FieldOverflow(i64, u32),                      // value, width

    // Configuration, IO and backend errors
    ConfigError(String),
    IOError(String),
    BackendError(String),
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::NoActiveScope => {
                write!(f, "No active emission scope - command emitted outside a chain")
            }
            CompilerError::EmptyChain(name) => {
                write!(f, "Chain '{}' must have at least one command", name)
            }
            CompilerError::DuplicateName(name) => {
                write!(f, "Duplicate variable name: {}", name)
            }
            CompilerError::UnknownName(name) => {
                write!(f, "Variable '{}' is not registered", name)
            }
            CompilerError::InvalidWidth(width) => {
                write!(f, "Invalid bit width {}", width)
            }
            CompilerError::RelocationOverflow(chain, length, window) => {
                write!(
                    f,
                    "Chain '{}' is {} units long but the relocation window only reserves {}",
                    chain, length, window
                )
            }
            CompilerError::EmptyRelocation(what) => {
                write!(f, "Relocation window for {} has zero length", what)
            }
            CompilerError::UnknownMnemonic(mnemonic) => {
                write!(f, "Unknown mnemonic '{}'", mnemonic)
            }
            CompilerError::InvalidOperand(operand) => {
                write!(f, "Invalid operand '{}'", operand)
            }
            CompilerError::NoEncoding(mnemonic, types, candidates) => {
                write!(
                    f,
                    "No encodings found for mnemonic {} and types [{}] (possible instructions: [{}])",
                    mnemonic,
                    types.join(", "),
                    candidates.join(", ")
                )
            }
            CompilerError::FieldOverflow(value, width) => {
                write!(f, "Value {} too wide for width {} field", value, width)
            }
            CompilerError::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CompilerError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
            CompilerError::BackendError(msg) => {
                write!(f, "Backend error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CompilerError {}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IOError(err.to_string())
    }
}
