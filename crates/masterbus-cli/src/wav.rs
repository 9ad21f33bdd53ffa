//! WAV reading and writing for the mastering commands.

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Deinterleaved stereo audio.
#[derive(Debug, Clone, Default)]
pub struct StereoBuffer {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Wraps two equally long channel buffers.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        Self { left, right }
    }

    /// Duplicates a mono buffer to both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Number of sample frames.
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// True when no frames are present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocates a zeroed buffer of the same length.
    pub fn silence_like(&self) -> Self {
        Self {
            left: vec![0.0; self.left.len()],
            right: vec![0.0; self.right.len()],
        }
    }
}

/// Reads a WAV file as stereo f32 and returns it with the sample rate.
///
/// Mono files are duplicated to both channels; files with more than two
/// channels keep only the first two.
pub fn read_stereo(path: impl AsRef<Path>) -> anyhow::Result<(StereoBuffer, u32)> {
    let path = path.as_ref();
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    anyhow::ensure!(channels > 0, "'{}' has no channels", path.display());

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to decode '{}'", path.display()))?,
        SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("failed to decode '{}'", path.display()))?
        }
    };

    let buffer = if channels == 1 {
        StereoBuffer::from_mono(interleaved)
    } else {
        let frames = interleaved.len() / channels;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in interleaved.chunks(channels) {
            left.push(frame[0]);
            right.push(frame.get(1).copied().unwrap_or(frame[0]));
        }
        StereoBuffer::new(left, right)
    };

    Ok((buffer, spec.sample_rate))
}

/// Writes a stereo buffer to a WAV file.
///
/// `bits_per_sample` of 32 writes IEEE float; 16 or 24 write PCM.
pub fn write_stereo(
    path: impl AsRef<Path>,
    buffer: &StereoBuffer,
    sample_rate: u32,
    bits_per_sample: u16,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create '{}'", path.display()))?;

    if bits_per_sample == 32 {
        for (&l, &r) in buffer.left.iter().zip(buffer.right.iter()) {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let max_val = (1i32 << (bits_per_sample - 1)) as f32;
        for (&l, &r) in buffer.left.iter().zip(buffer.right.iter()) {
            writer.write_sample((l * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            writer.write_sample((r * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
        }
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_stereo_roundtrip_f32() {
        let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
        let right: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).cos()).collect();
        let buffer = StereoBuffer::new(left.clone(), right.clone());

        let file = NamedTempFile::new().unwrap();
        write_stereo(file.path(), &buffer, 48000, 32).unwrap();

        let (loaded, sample_rate) = read_stereo(file.path()).unwrap();
        assert_eq!(sample_rate, 48000);
        assert_eq!(loaded.len(), buffer.len());
        for (a, b) in left.iter().zip(loaded.left.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
        for (a, b) in right.iter().zip(loaded.right.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stereo_roundtrip_i16() {
        let left: Vec<f32> = (0..500).map(|i| (i as f32 * 0.01).sin() * 0.9).collect();
        let buffer = StereoBuffer::new(left.clone(), left.clone());

        let file = NamedTempFile::new().unwrap();
        write_stereo(file.path(), &buffer, 44100, 16).unwrap();

        let (loaded, sample_rate) = read_stereo(file.path()).unwrap();
        assert_eq!(sample_rate, 44100);
        for (a, b) in left.iter().zip(loaded.left.iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_mono_duplicates_to_both_channels() {
        let mono: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();

        let file = NamedTempFile::new().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for &s in &mono {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let (loaded, _) = read_stereo(file.path()).unwrap();
        assert_eq!(loaded.left, mono);
        assert_eq!(loaded.right, mono);
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(read_stereo("/nonexistent/input.wav").is_err());
    }
}
