//! Audio codec plugin contract for voice chat clients.
//!
//! A codec plugs into the client by implementing [`AudioCodec`] and
//! registering itself under its voice-protocol codec id with
//! [`register_audio_codec`]. The audio pipeline then asks the registered
//! codec for one [`AudioEncoder`]/[`AudioDecoder`] per stream and feeds it
//! interleaved 16-bit PCM at [`AUDIO_SAMPLE_RATE`] with [`AUDIO_CHANNELS`]
//! channels.

mod registry;

use bytes::Bytes;

pub use registry::{audio_codec, global, register_audio_codec, CodecRegistry, RegistryError};

/// Sample rate of every PCM buffer exchanged with a codec, in Hz.
pub const AUDIO_SAMPLE_RATE: u32 = 48000;

/// Channel count of every PCM buffer exchanged with a codec.
pub const AUDIO_CHANNELS: u16 = 1;

/// Codec ids as enumerated by the voice protocol's codec negotiation.
pub mod codec_id {
    pub const CELT_ALPHA: u32 = 0;
    pub const SPEEX: u32 = 2;
    pub const CELT_BETA: u32 = 3;
    pub const OPUS: u32 = 4;
}

/// Boxed error returned across the plugin boundary.
///
/// Codecs box their own typed errors; callers that care can downcast.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type CodecResult<T> = Result<T, BoxError>;

/// PCM layout a codec is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        AudioFormat {
            sample_rate,
            channels,
        }
    }

    /// Number of interleaved samples in a frame of `frame_size` samples per channel.
    pub fn interleaved_len(&self, frame_size: usize) -> usize {
        frame_size * self.channels as usize
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::new(AUDIO_SAMPLE_RATE, AUDIO_CHANNELS)
    }
}

/// A codec the client can negotiate. Produces encoders and decoders on demand.
pub trait AudioCodec: Send + Sync {
    /// Voice-protocol codec id, see [`codec_id`].
    fn id(&self) -> u32;

    fn new_encoder(&self) -> CodecResult<Box<dyn AudioEncoder>>;

    fn new_decoder(&self) -> CodecResult<Box<dyn AudioDecoder>>;
}

/// Per-stream encoder. Owned by one thread at a time, but may be moved to
/// the audio thread.
pub trait AudioEncoder: Send {
    fn id(&self) -> u32;

    /// Encode one frame of interleaved PCM (`frame_size` samples per channel)
    /// into a packet of at most `max_bytes` bytes.
    fn encode(&mut self, pcm: &[i16], frame_size: usize, max_bytes: usize) -> CodecResult<Bytes>;

    fn reset(&mut self) -> CodecResult<()>;
}

/// Per-stream decoder. Owned by one thread at a time, but may be moved to
/// the audio thread.
pub trait AudioDecoder: Send {
    fn id(&self) -> u32;

    /// Decode one packet into interleaved PCM. `frame_size` is the largest
    /// number of samples per channel the caller accepts.
    fn decode(&mut self, data: &[u8], frame_size: usize) -> CodecResult<Vec<i16>>;

    fn reset(&mut self) -> CodecResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_matches_host_constants() {
        let format = AudioFormat::default();
        assert_eq!(format.sample_rate, AUDIO_SAMPLE_RATE);
        assert_eq!(format.channels, AUDIO_CHANNELS);
    }

    #[test]
    fn interleaved_len_scales_with_channels() {
        assert_eq!(AudioFormat::new(48000, 1).interleaved_len(960), 960);
        assert_eq!(AudioFormat::new(48000, 2).interleaved_len(960), 1920);
    }

    struct SilentEncoder;

    impl AudioEncoder for SilentEncoder {
        fn id(&self) -> u32 {
            codec_id::OPUS
        }

        fn encode(&mut self, _pcm: &[i16], _frame: usize, _max_bytes: usize) -> CodecResult<Bytes> {
            Ok(Bytes::from_static(&[0xF8]))
        }

        fn reset(&mut self) -> CodecResult<()> {
            Ok(())
        }
    }

    #[test]
    fn boxed_encoder_moves_to_audio_thread() {
        let mut encoder: Box<dyn AudioEncoder> = Box::new(SilentEncoder);
        encoder.reset().unwrap();
        let packet = std::thread::spawn(move || encoder.encode(&[0; 960], 960, 4000).unwrap())
            .join()
            .unwrap();
        assert_eq!(packet.len(), 1);
    }
}
