//! WAV container for provider PCM.

use std::io::{Seek, Write};

use crate::error::Result;

pub const CHANNELS: u16 = 1;
pub const SAMPLE_RATE: u32 = 24_000;
pub const BITS_PER_SAMPLE: u16 = 16;

pub fn spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Wrap little-endian 16-bit PCM in a WAV header and write it to `writer`.
///
/// A dangling odd byte is dropped. Returns the number of samples written.
pub fn write_pcm<W: Write + Seek>(writer: W, pcm: &[u8]) -> Result<usize> {
    let mut wav = hound::WavWriter::new(writer, spec())?;

    let chunks = pcm.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        tracing::warn!("PCM payload has odd length {}, dropping last byte", pcm.len());
    }

    let mut samples = 0;
    for pair in chunks {
        wav.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
        samples += 1;
    }
    wav.finalize()?;

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_parameters() {
        let mut buf = Cursor::new(Vec::new());
        write_pcm(&mut buf, &[0, 0, 1, 0]).unwrap();

        buf.set_position(0);
        let reader = hound::WavReader::new(buf).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    }

    #[test]
    fn test_samples_are_little_endian() {
        let mut buf = Cursor::new(Vec::new());
        let written = write_pcm(&mut buf, &[0x34, 0x12, 0xFF, 0xFF]).unwrap();
        assert_eq!(written, 2);

        buf.set_position(0);
        let mut reader = hound::WavReader::new(buf).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0x1234, -1]);
    }

    #[test]
    fn test_odd_byte_dropped() {
        let mut buf = Cursor::new(Vec::new());
        assert_eq!(write_pcm(&mut buf, &[1, 0, 2]).unwrap(), 1);
    }
}
