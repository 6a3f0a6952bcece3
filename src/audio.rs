//! Audio loading for recognition engines.
//!
//! Engines consume 16 kHz mono `f32` samples in `[-1.0, 1.0]`. WAV files that
//! already have that layout are read directly; everything else is decoded by
//! the `ffmpeg` binary.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::AudioError;

/// Sample rate every engine expects.
pub const SAMPLE_RATE: u32 = 16_000;

fn expected_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Read a 16 kHz, 16-bit, mono PCM WAV file into normalized samples.
///
/// # Errors
///
/// Fails if the file cannot be read or uses any other layout.
///
/// # Examples
///
/// ```rust,no_run
/// use whisp::audio::read_wav_samples;
/// use std::path::Path;
///
/// let samples = read_wav_samples(Path::new("audio.wav"))?;
/// println!("Loaded {} samples", samples.len());
/// # Ok::<(), whisp::error::AudioError>(())
/// ```
pub fn read_wav_samples(wav_path: &Path) -> Result<Vec<f32>, AudioError> {
    let mut reader = hound::WavReader::open(wav_path)?;
    let spec = reader.spec();
    let expected = expected_spec();

    if spec.channels != expected.channels {
        return Err(AudioError::Format(format!(
            "expected {} channels, found {}",
            expected.channels, spec.channels
        )));
    }
    if spec.sample_rate != expected.sample_rate {
        return Err(AudioError::Format(format!(
            "expected {} Hz sample rate, found {} Hz",
            expected.sample_rate, spec.sample_rate
        )));
    }
    if spec.bits_per_sample != expected.bits_per_sample {
        return Err(AudioError::Format(format!(
            "expected {} bits per sample, found {}",
            expected.bits_per_sample, spec.bits_per_sample
        )));
    }
    if spec.sample_format != expected.sample_format {
        return Err(AudioError::Format(format!(
            "expected Int sample format, found {:?}",
            spec.sample_format
        )));
    }

    let samples: Result<Vec<f32>, _> = reader
        .samples::<i16>()
        .map(|sample| sample.map(normalize))
        .collect();
    Ok(samples?)
}

/// Decode any ffmpeg-readable file to 16 kHz mono samples.
pub fn decode_with_ffmpeg(path: &Path) -> Result<Vec<f32>, AudioError> {
    let output = Command::new("ffmpeg")
        .args(["-nostdin", "-v", "error", "-i"])
        .arg(path)
        .args(["-ac", "1", "-ar", &SAMPLE_RATE.to_string(), "-f", "s16le", "-"])
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(AudioError::Decode(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(pcm_s16le_to_f32(&output.stdout))
}

/// Load samples, reading WAV directly when possible and falling back to ffmpeg.
pub fn load_samples(path: &Path) -> Result<Vec<f32>, AudioError> {
    match read_wav_samples(path) {
        Ok(samples) => Ok(samples),
        Err(err) => {
            log::debug!("direct wav read failed ({err}), decoding with ffmpeg");
            decode_with_ffmpeg(path)
        }
    }
}

/// Number of seconds covered by `sample_count` samples at [`SAMPLE_RATE`].
pub fn samples_to_seconds(sample_count: usize) -> f64 {
    sample_count as f64 / SAMPLE_RATE as f64
}

fn normalize(sample: i16) -> f32 {
    // i16::MIN maps slightly below -1.0 without the clamp
    (sample as f32 / i16::MAX as f32).max(-1.0)
}

fn pcm_s16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| normalize(i16::from_le_bytes([pair[0], pair[1]])))
        .collect()
}
