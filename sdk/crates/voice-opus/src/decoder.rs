//! Opus decoder wrapper.

use std::cell::Cell;
use std::marker::PhantomData;

use voice_codec::{AudioDecoder, AudioFormat, CodecResult};

use crate::engine::{DecoderEngine, Engine, LibOpus};
use crate::error::CodecError;
use crate::frame::check_decode_frame_size;
use crate::CODEC_ID;

/// Decodes Opus packets into interleaved 16-bit PCM.
///
/// No in-band FEC recovery is attempted. An empty packet is handed to the
/// engine as a lost packet and comes back as `frame_size` samples per channel
/// of concealment audio.
pub struct OpusDecoder<E: Engine = LibOpus> {
    engine: E,
    handle: Option<E::Decoder>,
    format: AudioFormat,
    _not_sync: PhantomData<Cell<()>>,
}

impl<E: Engine> OpusDecoder<E> {
    pub(crate) fn new(engine: E, format: AudioFormat) -> Result<Self, CodecError> {
        let handle = engine.new_decoder(format).map_err(CodecError::EngineInit)?;
        tracing::debug!(
            "Opus decoder created: {} Hz, {} ch",
            format.sample_rate,
            format.channels
        );
        Ok(OpusDecoder {
            engine,
            handle: Some(handle),
            format,
            _not_sync: PhantomData,
        })
    }

    pub fn id(&self) -> u32 {
        CODEC_ID
    }

    /// Decode one packet, accepting at most `frame_size` samples per channel.
    /// `frame_size` may not exceed 120 ms.
    pub fn decode(&mut self, data: &[u8], frame_size: usize) -> Result<Vec<i16>, CodecError> {
        let handle = self.handle.as_mut().ok_or(CodecError::Released)?;
        check_decode_frame_size(self.format, frame_size)?;

        let mut output = vec![0i16; self.format.interleaved_len(frame_size)];
        let decoded = handle.decode(data, &mut output).map_err(CodecError::Decode)?;
        output.truncate(self.format.interleaved_len(decoded));
        Ok(output)
    }

    /// Replace the engine handle with a fresh one. Keeps the old handle on failure.
    pub fn reset(&mut self) -> Result<(), CodecError> {
        if self.handle.is_none() {
            return Err(CodecError::Released);
        }
        let fresh = self
            .engine
            .new_decoder(self.format)
            .map_err(CodecError::EngineInit)?;
        self.handle = Some(fresh);
        tracing::debug!("Opus decoder reset");
        Ok(())
    }

    /// Release the engine handle. The decoder is unusable afterwards.
    pub fn release(&mut self) {
        if self.handle.take().is_some() {
            tracing::debug!("Opus decoder released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.format.channels
    }
}

impl<E: Engine> Drop for OpusDecoder<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: Engine> AudioDecoder for OpusDecoder<E> {
    fn id(&self) -> u32 {
        CODEC_ID
    }

    fn decode(&mut self, data: &[u8], frame_size: usize) -> CodecResult<Vec<i16>> {
        Ok(OpusDecoder::decode(self, data, frame_size)?)
    }

    fn reset(&mut self) -> CodecResult<()> {
        Ok(OpusDecoder::reset(self)?)
    }
}
