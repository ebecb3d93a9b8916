//! Opus audio codec plugin for voice-codec hosts.
//!
//! Nothing is registered on import. Call [`register`] (or build an
//! [`OpusCodec`] and [`advertise`](OpusCodec::advertise) it) once at startup,
//! before the client negotiates codecs:
//!
//! ```no_run
//! use voice_opus::Application;
//!
//! voice_opus::register(Application::Voip, true, 10).expect("opus registration");
//! ```
//!
//! Encoders and decoders are not thread safe. Each belongs to one stream.

mod codec;
mod config;
mod decoder;
mod encoder;
mod engine;
mod error;
mod frame;
#[cfg(feature = "python")]
mod python;
#[cfg(test)]
mod testing;

use std::sync::Arc;

pub use codec::OpusCodec;
pub use config::{Application, CodecConfig, ParseApplicationError};
pub use decoder::OpusDecoder;
pub use encoder::OpusEncoder;
pub use engine::{DecoderEngine, EncoderEngine, Engine, LibOpus};
pub use error::{CodecError, EngineError};
pub use frame::FrameDuration;
pub use voice_codec::RegistryError;

/// Voice-protocol codec id of Opus.
pub const CODEC_ID: u32 = voice_codec::codec_id::OPUS;

/// Configure the codec and register it with the process-wide codec registry.
///
/// `fec` enables in-band forward error correction; it is always on for
/// [`Application::Voip`]. `packet_loss` is the expected loss percentage:
/// higher values lower overall quality but hold up better when packets go
/// missing.
pub fn register(
    application: Application,
    fec: bool,
    packet_loss: u8,
) -> Result<Arc<OpusCodec>, RegistryError> {
    OpusCodec::configure(application, fec, packet_loss).advertise_global()
}
