//! Error types for the codec library.

use thiserror::Error;

/// Error variants for encode and decode operations.
///
/// Decode errors are integrity faults: the artifact did not come from the
/// matching encoder. No partial output is ever returned alongside them.
#[derive(Debug, Error)]
pub enum Error {
    /// BWT reconstruction index does not address a row of the rotation table.
    #[error("bwt index {index} out of range for length {len}")]
    BwtIndexOutOfRange {
        /// Index supplied with the artifact.
        index: usize,
        /// Length of the transformed block.
        len: usize,
    },

    /// LZW code that the decoder's dictionary cannot resolve.
    #[error("lzw code {code} exceeds next assignable code {next_code}")]
    LzwInvalidCode {
        /// Code read from the stream.
        code: u16,
        /// Code the decoder would assign next.
        next_code: usize,
    },

    /// The payload ended before the metadata said it would.
    #[error("truncated stream: {0}")]
    TruncatedStream(&'static str),

    /// The payload decodes to something inconsistent with its metadata.
    #[error("corrupt stream: {0}")]
    CorruptStream(&'static str),

    /// Input exceeds the precision the coder can represent.
    #[error("input of {len} bytes exceeds limit of {max}")]
    InputTooLarge {
        /// Input length.
        len: u64,
        /// Largest supported input length.
        max: u64,
    },

    /// A Huffman code does not fit the 64-bit code register.
    #[error("huffman code length {0} exceeds 64 bits")]
    CodeTooLong(u32),

    /// Codec configuration rejected by validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
