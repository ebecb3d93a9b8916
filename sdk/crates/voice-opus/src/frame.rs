//! Opus frame durations and PCM buffer checks.

use voice_codec::AudioFormat;

use crate::error::CodecError;

/// Frame durations an Opus encoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameDuration {
    Ms2_5,
    Ms5,
    Ms10,
    Ms20,
    Ms40,
    Ms60,
}

impl FrameDuration {
    pub const ALL: [FrameDuration; 6] = [
        FrameDuration::Ms2_5,
        FrameDuration::Ms5,
        FrameDuration::Ms10,
        FrameDuration::Ms20,
        FrameDuration::Ms40,
        FrameDuration::Ms60,
    ];

    /// Duration in units of 2.5 ms.
    fn quanta(self) -> usize {
        match self {
            FrameDuration::Ms2_5 => 1,
            FrameDuration::Ms5 => 2,
            FrameDuration::Ms10 => 4,
            FrameDuration::Ms20 => 8,
            FrameDuration::Ms40 => 16,
            FrameDuration::Ms60 => 24,
        }
    }

    /// Samples per channel in one frame at `sample_rate`.
    pub fn samples(self, sample_rate: u32) -> usize {
        // 2.5 ms = 1/400 s
        self.quanta() * (sample_rate as usize / 400)
    }

    pub fn from_samples(sample_rate: u32, frame_size: usize) -> Option<FrameDuration> {
        if frame_size == 0 {
            return None;
        }
        FrameDuration::ALL
            .into_iter()
            .find(|d| d.samples(sample_rate) == frame_size)
    }
}

/// Longest stretch of audio one Opus packet can carry, in units of 2.5 ms (120 ms).
const MAX_PACKET_QUANTA: usize = 48;

/// Samples per channel in the longest Opus packet at `sample_rate`.
pub(crate) fn max_packet_samples(sample_rate: u32) -> usize {
    MAX_PACKET_QUANTA * (sample_rate as usize / 400)
}

/// Check a decoder output size. Zero and anything past 120 ms are refused
/// before a buffer is allocated.
pub(crate) fn check_decode_frame_size(
    format: AudioFormat,
    frame_size: usize,
) -> Result<(), CodecError> {
    if frame_size == 0 || frame_size > max_packet_samples(format.sample_rate) {
        return Err(CodecError::InvalidFrameSize {
            frame_size,
            sample_rate: format.sample_rate,
        });
    }
    Ok(())
}

/// Check an encoder input buffer before it goes anywhere near the engine.
pub(crate) fn check_encode_input(
    format: AudioFormat,
    pcm_len: usize,
    frame_size: usize,
) -> Result<(), CodecError> {
    if FrameDuration::from_samples(format.sample_rate, frame_size).is_none() {
        return Err(CodecError::InvalidFrameSize {
            frame_size,
            sample_rate: format.sample_rate,
        });
    }

    let expected = format.interleaved_len(frame_size);
    if pcm_len != expected {
        return Err(CodecError::BufferLengthMismatch {
            expected,
            actual: pcm_len,
        });
    }
    Ok(())
}
