//! Scripted engine for unit tests: records every call and fails on demand.

use std::sync::{Arc, Mutex, MutexGuard};

use voice_codec::AudioFormat;

use crate::config::Application;
use crate::engine::{DecoderEngine, EncoderEngine, Engine};
use crate::error::EngineError;

#[derive(Debug, Default)]
pub(crate) struct Script {
    pub fail_encoder_create: bool,
    pub fail_decoder_create: bool,
    pub fail_encode: bool,
    pub fail_decode: bool,
    /// Bytes each encode call reports written.
    pub encode_len: usize,
    /// Samples per channel each decode call reports written; `None` fills the buffer.
    pub decode_len: Option<usize>,

    pub encoders_created: usize,
    pub decoders_created: usize,
    pub live_encoders: usize,
    pub live_decoders: usize,
    pub encode_calls: usize,
    pub decode_calls: usize,
    pub max_bitrate_requests: usize,
    pub last_application: Option<Application>,
}

#[derive(Debug, Clone)]
pub(crate) struct ScriptedEngine {
    script: Arc<Mutex<Script>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        ScriptedEngine {
            script: Arc::new(Mutex::new(Script {
                encode_len: 3,
                ..Script::default()
            })),
        }
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }
}

pub(crate) struct ScriptedEncoder {
    script: Arc<Mutex<Script>>,
    fec: bool,
    packet_loss: i32,
}

pub(crate) struct ScriptedDecoder {
    script: Arc<Mutex<Script>>,
    channels: usize,
}

impl Engine for ScriptedEngine {
    type Encoder = ScriptedEncoder;
    type Decoder = ScriptedDecoder;

    fn new_encoder(
        &self,
        _format: AudioFormat,
        application: Application,
    ) -> Result<ScriptedEncoder, EngineError> {
        let mut script = self.script();
        if script.fail_encoder_create {
            return Err(EngineError::new(
                "opus_encoder_create",
                EngineError::ALLOC_FAIL,
                "memory allocation failed",
            ));
        }
        script.encoders_created += 1;
        script.live_encoders += 1;
        script.last_application = Some(application);
        Ok(ScriptedEncoder {
            script: Arc::clone(&self.script),
            fec: false,
            packet_loss: 0,
        })
    }

    fn new_decoder(&self, format: AudioFormat) -> Result<ScriptedDecoder, EngineError> {
        let mut script = self.script();
        if script.fail_decoder_create {
            return Err(EngineError::new(
                "opus_decoder_create",
                EngineError::ALLOC_FAIL,
                "memory allocation failed",
            ));
        }
        script.decoders_created += 1;
        script.live_decoders += 1;
        Ok(ScriptedDecoder {
            script: Arc::clone(&self.script),
            channels: format.channels as usize,
        })
    }
}

impl EncoderEngine for ScriptedEncoder {
    fn encode(&mut self, _pcm: &[i16], out: &mut [u8]) -> Result<usize, EngineError> {
        let mut script = self.script.lock().unwrap();
        script.encode_calls += 1;
        if script.fail_encode {
            return Err(EngineError::new(
                "opus_encode",
                EngineError::INTERNAL_ERROR,
                "internal error",
            ));
        }
        if script.encode_len > out.len() {
            return Err(EngineError::new(
                "opus_encode",
                EngineError::BUFFER_TOO_SMALL,
                "buffer too small",
            ));
        }
        out[..script.encode_len].fill(0xAB);
        Ok(script.encode_len)
    }

    fn set_max_bitrate(&mut self) -> Result<(), EngineError> {
        self.script.lock().unwrap().max_bitrate_requests += 1;
        Ok(())
    }

    fn set_inband_fec(&mut self, enabled: bool) -> Result<(), EngineError> {
        self.fec = enabled;
        Ok(())
    }

    fn inband_fec(&mut self) -> Result<bool, EngineError> {
        Ok(self.fec)
    }

    fn set_packet_loss_perc(&mut self, percent: i32) -> Result<(), EngineError> {
        if !(0..=100).contains(&percent) {
            return Err(EngineError::new(
                "opus_encoder_ctl",
                EngineError::BAD_ARG,
                "invalid argument",
            ));
        }
        self.packet_loss = percent;
        Ok(())
    }

    fn packet_loss_perc(&mut self) -> Result<i32, EngineError> {
        Ok(self.packet_loss)
    }
}

impl Drop for ScriptedEncoder {
    fn drop(&mut self) {
        self.script.lock().unwrap().live_encoders -= 1;
    }
}

impl DecoderEngine for ScriptedDecoder {
    fn decode(&mut self, _packet: &[u8], out: &mut [i16]) -> Result<usize, EngineError> {
        let mut script = self.script.lock().unwrap();
        script.decode_calls += 1;
        if script.fail_decode {
            return Err(EngineError::new(
                "opus_decode",
                EngineError::INVALID_PACKET,
                "corrupted stream",
            ));
        }
        let capacity = out.len() / self.channels;
        let written = script.decode_len.unwrap_or(capacity).min(capacity);
        out[..written * self.channels].fill(7);
        Ok(written)
    }
}

impl Drop for ScriptedDecoder {
    fn drop(&mut self) {
        self.script.lock().unwrap().live_decoders -= 1;
    }
}
