//! Opus encoder wrapper.

use std::cell::Cell;
use std::marker::PhantomData;

use bytes::Bytes;
use voice_codec::{AudioEncoder, AudioFormat, CodecResult};

use crate::config::Application;
use crate::engine::{EncoderEngine, Engine, LibOpus};
use crate::error::CodecError;
use crate::frame::check_encode_input;
use crate::CODEC_ID;

/// Encodes interleaved 16-bit PCM frames into Opus packets.
///
/// Owns exactly one engine handle until [`release`](Self::release) or drop.
/// Not `Sync`: an encoder belongs to one stream and one caller at a time.
pub struct OpusEncoder<E: Engine = LibOpus> {
    engine: E,
    handle: Option<E::Encoder>,
    application: Application,
    format: AudioFormat,
    _not_sync: PhantomData<Cell<()>>,
}

impl<E: Engine> OpusEncoder<E> {
    pub(crate) fn new(
        engine: E,
        format: AudioFormat,
        application: Application,
        fec: bool,
        packet_loss: u8,
    ) -> Result<Self, CodecError> {
        let handle = build_handle(&engine, format, application, fec, i32::from(packet_loss))?;
        tracing::debug!(
            "Opus encoder created: {} Hz, {} ch, {}, fec={}, packet_loss={}",
            format.sample_rate,
            format.channels,
            application,
            fec,
            packet_loss
        );
        Ok(OpusEncoder {
            engine,
            handle: Some(handle),
            application,
            format,
            _not_sync: PhantomData,
        })
    }

    pub fn id(&self) -> u32 {
        CODEC_ID
    }

    /// Encode one frame of `frame_size` samples per channel.
    ///
    /// `pcm` must hold exactly `frame_size * channels` interleaved samples and
    /// `frame_size` must be a 2.5, 5, 10, 20, 40 or 60 ms frame. The packet is
    /// at most `max_bytes` long.
    pub fn encode(
        &mut self,
        pcm: &[i16],
        frame_size: usize,
        max_bytes: usize,
    ) -> Result<Bytes, CodecError> {
        let handle = self.handle.as_mut().ok_or(CodecError::Released)?;
        check_encode_input(self.format, pcm.len(), frame_size)?;

        let mut output = vec![0u8; max_bytes];
        let len = handle.encode(pcm, &mut output).map_err(CodecError::Encode)?;
        output.truncate(len);
        Ok(Bytes::from(output))
    }

    /// Replace the engine handle with a fresh one.
    ///
    /// The FEC flag and packet-loss percentage active on the old handle carry
    /// over. If the new handle cannot be built the old one stays in place.
    pub fn reset(&mut self) -> Result<(), CodecError> {
        let current = self.handle.as_mut().ok_or(CodecError::Released)?;
        let fec = current.inband_fec().map_err(CodecError::Control)?;
        let packet_loss = current.packet_loss_perc().map_err(CodecError::Control)?;

        let fresh = build_handle(&self.engine, self.format, self.application, fec, packet_loss)?;
        self.handle = Some(fresh);
        tracing::debug!(
            "Opus encoder reset: fec={}, packet_loss={}",
            fec,
            packet_loss
        );
        Ok(())
    }

    /// Release the engine handle. The encoder is unusable afterwards.
    pub fn release(&mut self) {
        if self.handle.take().is_some() {
            tracing::debug!("Opus encoder released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    pub fn set_fec(&mut self, enabled: bool) -> Result<(), CodecError> {
        self.handle_mut()?
            .set_inband_fec(enabled)
            .map_err(CodecError::Control)
    }

    /// In-band FEC flag currently active on the engine.
    pub fn fec(&mut self) -> Result<bool, CodecError> {
        self.handle_mut()?.inband_fec().map_err(CodecError::Control)
    }

    pub fn set_packet_loss(&mut self, percent: u8) -> Result<(), CodecError> {
        self.handle_mut()?
            .set_packet_loss_perc(i32::from(percent))
            .map_err(CodecError::Control)
    }

    /// Expected packet-loss percentage currently active on the engine.
    pub fn packet_loss(&mut self) -> Result<u8, CodecError> {
        let percent = self
            .handle_mut()?
            .packet_loss_perc()
            .map_err(CodecError::Control)?;
        Ok(percent.clamp(0, 100) as u8)
    }

    pub fn application(&self) -> Application {
        self.application
    }

    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.format.channels
    }

    fn handle_mut(&mut self) -> Result<&mut E::Encoder, CodecError> {
        self.handle.as_mut().ok_or(CodecError::Released)
    }
}

fn build_handle<E: Engine>(
    engine: &E,
    format: AudioFormat,
    application: Application,
    fec: bool,
    packet_loss: i32,
) -> Result<E::Encoder, CodecError> {
    let mut handle = engine
        .new_encoder(format, application)
        .map_err(CodecError::EngineInit)?;
    handle.set_max_bitrate().map_err(CodecError::EngineInit)?;
    handle.set_inband_fec(fec).map_err(CodecError::EngineInit)?;
    handle
        .set_packet_loss_perc(packet_loss)
        .map_err(CodecError::EngineInit)?;
    Ok(handle)
}

impl<E: Engine> Drop for OpusEncoder<E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<E: Engine> AudioEncoder for OpusEncoder<E> {
    fn id(&self) -> u32 {
        CODEC_ID
    }

    fn encode(&mut self, pcm: &[i16], frame_size: usize, max_bytes: usize) -> CodecResult<Bytes> {
        Ok(OpusEncoder::encode(self, pcm, frame_size, max_bytes)?)
    }

    fn reset(&mut self) -> CodecResult<()> {
        Ok(OpusEncoder::reset(self)?)
    }
}
