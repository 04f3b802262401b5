/// Protocol error taxonomy.
///
/// Decoding never coerces: anything that does not match the envelope shape
/// surfaces as one of these variants. At the session boundary every variant
/// is terminal for the owning connection only.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Transport-level failure while reading or writing a frame.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame carried a version byte this build does not speak.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u8),

    /// Frame kind did not match the expected direction (request vs reply).
    #[error("unexpected frame kind {0:#04x}")]
    UnexpectedKind(u8),

    /// An enumeration tag with no defined value.
    #[error("unknown {field} tag {value}")]
    UnknownTag { field: &'static str, value: u8 },

    /// Length prefix announced a body larger than the configured limit.
    #[error("frame of {0} bytes exceeds the frame size limit")]
    FrameTooLarge(usize),

    /// Body ended before all announced fields were present.
    #[error("truncated frame body")]
    Truncated,

    /// Body was longer than the fields it announced.
    #[error("{0} trailing bytes after frame body")]
    TrailingBytes(usize),
}
