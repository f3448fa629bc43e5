//! Error types for the protocol layer.
//!
//! Each crate in Emberlink defines its own error enum. This keeps errors
//! specific and meaningful — when you see a `ProtocolError`, you know
//! the problem is in the byte stream itself, not in networking or
//! dispatch.

/// Errors that can occur while reading fields from a [`PacketBuffer`].
///
/// The two variants have very different severities, and callers must
/// treat them differently:
///
/// - [`InsufficientData`](Self::InsufficientData) is *transient*. The
///   stream is fine — the rest of the message simply hasn't arrived yet.
///   The read loop absorbs it, waits for more bytes, and retries the
///   identical parse. It is an expected outcome on the hot path and is
///   never surfaced as an error to the user.
/// - [`MalformedString`](Self::MalformedString) is *fatal to the
///   connection*. Once a payload decodes to invalid UTF-8 we can no
///   longer trust our alignment within the stream, so every subsequent
///   read would be garbage. The only safe response is to tear the
///   connection down.
///
/// [`PacketBuffer`]: crate::PacketBuffer
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Fewer unread bytes remain than the field requires.
    ///
    /// Carries the byte counts so TRACE logging can show how far short
    /// the buffer fell. Recoverable: retry after more bytes arrive.
    #[error("insufficient data: need {needed} bytes, {available} available")]
    InsufficientData {
        /// Bytes the field needed from the cursor onward.
        needed: usize,
        /// Bytes actually available from the cursor onward.
        available: usize,
    },

    /// A length-prefixed string payload was not valid UTF-8.
    ///
    /// Unrecoverable for the whole connection — byte alignment for all
    /// subsequent messages is now unknown.
    #[error("malformed string payload: {0}")]
    MalformedString(#[from] std::str::Utf8Error),
}

impl ProtocolError {
    /// Returns `true` for errors that simply mean "wait for more bytes
    /// and retry", as opposed to errors that desynchronize the stream.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProtocolError::InsufficientData { .. })
    }
}
