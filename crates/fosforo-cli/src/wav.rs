//! WAV file reading and writing on top of hound.
//!
//! The scope wants two equal-length normalized channels; mono files feed
//! both channels, extra channels beyond the second are ignored.

use std::path::Path;

/// Error types for WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// hound-level read/write error.
    #[error("WAV file error: {0}")]
    Hound(#[from] hound::Error),

    /// The file has no audio channels.
    #[error("WAV file has no channels")]
    NoChannels,

    /// Sample format not handled.
    #[error("unsupported sample format: {0} bits")]
    UnsupportedFormat(u16),
}

/// Decoded stereo samples plus the capture rate.
pub struct StereoWav {
    /// Left channel (scope channel A), normalized to [-1, 1].
    pub left: Vec<f32>,
    /// Right channel (scope channel B), same length as `left`.
    pub right: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Read a WAV file into normalized stereo buffers.
pub fn read_stereo(path: impl AsRef<Path>) -> Result<StereoWav, WavError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(WavError::NoChannels);
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = match spec.bits_per_sample {
                16 => f32::from(i16::MAX),
                24 => 8_388_607.0,
                32 => i32::MAX as f32,
                bits => return Err(WavError::UnsupportedFormat(bits)),
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels as usize;
    let frames = interleaved.len() / channels;
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for frame in interleaved.chunks_exact(channels) {
        left.push(frame[0].clamp(-1.0, 1.0));
        right.push(frame[channels.min(2) - 1].clamp(-1.0, 1.0));
    }

    Ok(StereoWav {
        left,
        right,
        sample_rate: spec.sample_rate,
    })
}

/// Write two normalized channels as a 16-bit stereo WAV.
pub fn write_stereo(
    path: impl AsRef<Path>,
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
) -> Result<(), WavError> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let frames = left.len().min(right.len());
    for i in 0..frames {
        writer.write_sample((left[i].clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)?;
        writer.write_sample((right[i].clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
