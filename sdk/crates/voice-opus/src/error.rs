//! Error types for the Opus codec plugin.

/// A failure reported by the Opus engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{function}: {message} (opus error {code})")]
pub struct EngineError {
    /// Engine entry point that failed, e.g. `opus_encoder_create`.
    pub function: String,
    /// Numeric libopus error code (negative).
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub const BAD_ARG: i32 = -1;
    pub const BUFFER_TOO_SMALL: i32 = -2;
    pub const INTERNAL_ERROR: i32 = -3;
    pub const INVALID_PACKET: i32 = -4;
    pub const ALLOC_FAIL: i32 = -7;

    pub fn new(function: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        EngineError {
            function: function.into(),
            code,
            message: message.into(),
        }
    }
}

impl From<opus::Error> for EngineError {
    fn from(err: opus::Error) -> Self {
        EngineError {
            function: err.function().to_string(),
            code: err.code() as i32,
            message: err.to_string(),
        }
    }
}

/// Errors returned by [`OpusCodec`](crate::OpusCodec), encoders and decoders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The engine refused to create a handle, or rejected its initial tuning.
    #[error("failed to initialize opus engine: {0}")]
    EngineInit(#[source] EngineError),

    #[error("unsupported frame size {frame_size} at {sample_rate} Hz")]
    InvalidFrameSize { frame_size: usize, sample_rate: u32 },

    #[error("pcm buffer holds {actual} samples, frame needs {expected}")]
    BufferLengthMismatch { expected: usize, actual: usize },

    #[error("opus encode failed: {0}")]
    Encode(#[source] EngineError),

    #[error("opus decode failed: {0}")]
    Decode(#[source] EngineError),

    /// A run-time tuning request (FEC, packet loss) failed.
    #[error("opus control request failed: {0}")]
    Control(#[source] EngineError),

    #[error("codec instance has been released")]
    Released,
}

impl CodecError {
    /// True when the caller handed in a malformed frame. The engine was not called.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CodecError::InvalidFrameSize { .. } | CodecError::BufferLengthMismatch { .. }
        )
    }
}
