//! In-memory WAV encoding.

use super::PCM_SCALE;
use base64::Engine;
use std::io::Cursor;

const BITS_PER_SAMPLE: u16 = 16;
const WAV_HEADER_BYTES: usize = 44;

/// Scale samples by `gain`, clipping to full scale.
pub fn apply_gain(samples: &mut [f32], gain: f32) {
    if (gain - 1.0).abs() < f32::EPSILON {
        return;
    }
    for sample in samples.iter_mut() {
        *sample = (*sample * gain).clamp(-1.0, 1.0);
    }
}

/// Encode mono float samples as a 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(WAV_HEADER_BYTES + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in samples {
            writer.write_sample(to_pcm16(*sample))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Inverse of dividing by [`PCM_SCALE`], so decoded PCM survives unchanged.
fn to_pcm16(sample: f32) -> i16 {
    (sample * PCM_SCALE)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Encode samples as WAV and return the file as standard base64.
pub fn encode_wav_base64(samples: &[f32], sample_rate: u32) -> Result<String, hound::Error> {
    let bytes = encode_wav(samples, sample_rate)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
