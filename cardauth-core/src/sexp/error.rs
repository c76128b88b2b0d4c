//! S-expression error types.

/// Errors raised while parsing or rendering an S-expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SexpError {
    /// The input holds nothing but whitespace.
    #[error("empty S-expression")]
    Empty,

    /// The input ended inside an expression.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A byte that cannot start or continue the current element.
    #[error("unexpected byte 0x{byte:02x} at offset {offset}")]
    UnexpectedByte { offset: usize, byte: u8 },

    /// A length prefix that overflows or is not followed by `:`.
    #[error("invalid length prefix at offset {offset}")]
    InvalidLength { offset: usize },

    /// A `#...#` atom with non-hex digits or an odd digit count.
    #[error("invalid hex string at offset {offset}")]
    InvalidHex { offset: usize },

    /// A `|...|` atom that is not valid base64.
    #[error("invalid base64 string at offset {offset}")]
    InvalidBase64 { offset: usize },

    /// Bytes following the closing parenthesis of the top-level list.
    #[error("trailing data at offset {offset}")]
    TrailingData { offset: usize },

    /// Lists nested deeper than [`super::MAX_DEPTH`].
    #[error("nesting deeper than {max} levels")]
    TooDeep { max: usize },

    /// Rendering produced no output.
    #[error("S-expression could not be rendered")]
    Encoding,
}
