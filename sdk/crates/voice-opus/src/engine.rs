//! The seam between the codec plugin and the Opus implementation.
//!
//! [`LibOpus`] drives libopus through the `opus` crate. Everything above this
//! module talks to the traits only.

use voice_codec::AudioFormat;

use crate::config::Application;
use crate::error::EngineError;

/// One live encoder handle.
pub trait EncoderEngine {
    /// Encode one interleaved frame, returning the number of bytes written to `out`.
    fn encode(&mut self, pcm: &[i16], out: &mut [u8]) -> Result<usize, EngineError>;

    fn set_max_bitrate(&mut self) -> Result<(), EngineError>;

    fn set_inband_fec(&mut self, enabled: bool) -> Result<(), EngineError>;

    fn inband_fec(&mut self) -> Result<bool, EngineError>;

    fn set_packet_loss_perc(&mut self, percent: i32) -> Result<(), EngineError>;

    fn packet_loss_perc(&mut self) -> Result<i32, EngineError>;
}

/// One live decoder handle.
pub trait DecoderEngine {
    /// Decode one packet, returning the number of samples per channel written.
    /// An empty packet means the packet was lost.
    fn decode(&mut self, packet: &[u8], out: &mut [i16]) -> Result<usize, EngineError>;
}

/// Creates engine handles.
pub trait Engine: Clone + Send + Sync + 'static {
    type Encoder: EncoderEngine + Send + 'static;
    type Decoder: DecoderEngine + Send + 'static;

    fn new_encoder(
        &self,
        format: AudioFormat,
        application: Application,
    ) -> Result<Self::Encoder, EngineError>;

    fn new_decoder(&self, format: AudioFormat) -> Result<Self::Decoder, EngineError>;
}

/// libopus, via the `opus` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibOpus;

fn engine_channels(channels: u16, function: &str) -> Result<opus::Channels, EngineError> {
    match channels {
        1 => Ok(opus::Channels::Mono),
        2 => Ok(opus::Channels::Stereo),
        n => Err(EngineError::new(
            function,
            EngineError::BAD_ARG,
            format!("unsupported channel count {}", n),
        )),
    }
}

impl Engine for LibOpus {
    type Encoder = opus::Encoder;
    type Decoder = opus::Decoder;

    fn new_encoder(
        &self,
        format: AudioFormat,
        application: Application,
    ) -> Result<opus::Encoder, EngineError> {
        let channels = engine_channels(format.channels, "opus_encoder_create")?;
        Ok(opus::Encoder::new(
            format.sample_rate,
            channels,
            application.to_engine(),
        )?)
    }

    fn new_decoder(&self, format: AudioFormat) -> Result<opus::Decoder, EngineError> {
        let channels = engine_channels(format.channels, "opus_decoder_create")?;
        Ok(opus::Decoder::new(format.sample_rate, channels)?)
    }
}

impl EncoderEngine for opus::Encoder {
    fn encode(&mut self, pcm: &[i16], out: &mut [u8]) -> Result<usize, EngineError> {
        Ok(opus::Encoder::encode(self, pcm, out)?)
    }

    fn set_max_bitrate(&mut self) -> Result<(), EngineError> {
        Ok(self.set_bitrate(opus::Bitrate::Max)?)
    }

    fn set_inband_fec(&mut self, enabled: bool) -> Result<(), EngineError> {
        Ok(opus::Encoder::set_inband_fec(self, enabled)?)
    }

    fn inband_fec(&mut self) -> Result<bool, EngineError> {
        Ok(self.get_inband_fec()?)
    }

    fn set_packet_loss_perc(&mut self, percent: i32) -> Result<(), EngineError> {
        Ok(opus::Encoder::set_packet_loss_perc(self, percent)?)
    }

    fn packet_loss_perc(&mut self) -> Result<i32, EngineError> {
        Ok(self.get_packet_loss_perc()?)
    }
}

impl DecoderEngine for opus::Decoder {
    fn decode(&mut self, packet: &[u8], out: &mut [i16]) -> Result<usize, EngineError> {
        Ok(opus::Decoder::decode(self, packet, out, false)?)
    }
}
