//! The codec factory registered with the host.

use std::sync::Arc;

use voice_codec::{
    AudioCodec, AudioDecoder, AudioEncoder, AudioFormat, CodecRegistry, CodecResult, RegistryError,
};

use crate::config::{Application, CodecConfig};
use crate::decoder::OpusDecoder;
use crate::encoder::OpusEncoder;
use crate::engine::{Engine, LibOpus};
use crate::error::CodecError;
use crate::CODEC_ID;

/// Opus codec factory.
///
/// Holds the configuration every encoder is built with. The configuration is
/// fixed at construction, so a factory can be shared freely once registered.
#[derive(Debug, Clone)]
pub struct OpusCodec<E: Engine = LibOpus> {
    config: CodecConfig,
    format: AudioFormat,
    engine: E,
}

impl OpusCodec<LibOpus> {
    pub fn new(config: CodecConfig) -> Self {
        OpusCodec::with_engine(config, AudioFormat::default(), LibOpus)
    }

    pub fn configure(application: Application, fec: bool, packet_loss: u8) -> Self {
        OpusCodec::new(CodecConfig::new(application, fec, packet_loss))
    }
}

impl<E: Engine> OpusCodec<E> {
    /// Build a factory over an arbitrary engine, for PCM laid out as `format`.
    pub fn with_engine(config: CodecConfig, format: AudioFormat, engine: E) -> Self {
        OpusCodec {
            config: config.normalized(),
            format,
            engine,
        }
    }

    /// Use a PCM layout other than the host default.
    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn id(&self) -> u32 {
        CODEC_ID
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Create an encoder at max bitrate with the configured FEC and packet loss.
    pub fn new_encoder(&self) -> Result<OpusEncoder<E>, CodecError> {
        OpusEncoder::new(
            self.engine.clone(),
            self.format,
            self.config.application,
            self.config.fec,
            self.config.packet_loss,
        )
    }

    pub fn new_decoder(&self) -> Result<OpusDecoder<E>, CodecError> {
        OpusDecoder::new(self.engine.clone(), self.format)
    }

    /// Register with `registry` so the client can negotiate Opus.
    pub fn advertise(self, registry: &CodecRegistry) -> Result<Arc<Self>, RegistryError> {
        let codec = Arc::new(self);
        registry.register(CODEC_ID, codec.clone())?;
        tracing::info!(
            "Opus codec advertised: {}, fec={}, packet_loss={}",
            codec.config.application,
            codec.config.fec,
            codec.config.packet_loss
        );
        Ok(codec)
    }

    /// Register with the process-wide registry.
    pub fn advertise_global(self) -> Result<Arc<Self>, RegistryError> {
        self.advertise(voice_codec::global())
    }
}

impl<E: Engine> AudioCodec for OpusCodec<E> {
    fn id(&self) -> u32 {
        CODEC_ID
    }

    fn new_encoder(&self) -> CodecResult<Box<dyn AudioEncoder>> {
        Ok(Box::new(OpusCodec::new_encoder(self)?))
    }

    fn new_decoder(&self) -> CodecResult<Box<dyn AudioDecoder>> {
        Ok(Box::new(OpusCodec::new_decoder(self)?))
    }
}
