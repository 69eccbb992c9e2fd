//! Error kinds for handheld operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to react, e.g. a host program
/// maps `NoSingleFixFound` to its own exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid configuration or command-line parameters
    ConfigInvalid,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input
    ParseFailed,

    /// Unknown instruction mnemonic
    InvalidOpcode,

    /// Missing or malformed instruction operand
    InvalidOperand,

    // =========================================================================
    // Execution errors
    // =========================================================================
    /// A jump left the program somewhere other than exactly one past the end
    ProgramCounterOutOfRange,

    /// The accumulator overflowed a signed 64-bit integer
    AccumulatorOverflow,

    /// No single jmp/nop flip makes the program terminate
    NoSingleFixFound,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// Serialization/deserialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::InvalidOpcode => "InvalidOpcode",
            ErrorKind::InvalidOperand => "InvalidOperand",

            ErrorKind::ProgramCounterOutOfRange => "ProgramCounterOutOfRange",
            ErrorKind::AccumulatorOverflow => "AccumulatorOverflow",
            ErrorKind::NoSingleFixFound => "NoSingleFixFound",

            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
            ErrorKind::SerializationFailed => "SerializationFailed",
        }
    }

    /// Whether this kind comes from reading or decoding input rather than
    /// from executing a program
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::ParseFailed
                | ErrorKind::InvalidOpcode
                | ErrorKind::InvalidOperand
                | ErrorKind::FileNotFound
                | ErrorKind::PermissionDenied
                | ErrorKind::IoFailed
                | ErrorKind::SerializationFailed
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
