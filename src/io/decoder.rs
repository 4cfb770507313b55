//! Audio decoding using Symphonia

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer as PcmBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::interleaved_to_mono;

/// Decoded mono audio
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Mono samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count of the source before downmixing
    pub channels: usize,
}

impl AudioClip {
    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an audio file to mono PCM samples
///
/// The container is probed with the file extension as a hint, the first
/// track with a known codec is decoded in full, and every packet is
/// converted to interleaved `f32` before being averaged down to mono.
/// Corrupt packets are skipped with a warning.
///
/// # Arguments
///
/// * `path` - Path to audio file (any format Symphonia is built with)
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` if the file cannot be opened, the
/// format is unsupported, there is no audio track, or no samples decode
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioClip, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)
        .map_err(|e| AnalysisError::DecodingError(format!("{}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            AnalysisError::DecodingError(format!("{}: no supported audio tracks", path.display()))
        })?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count());
    let mut interleaved: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                channels.get_or_insert(spec.channels.count());

                let mut buf = PcmBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped_packets += 1;
                log::warn!("Skipping corrupt packet in {}: {}", path.display(), msg);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let sample_rate = sample_rate.filter(|&sr| sr > 0).ok_or_else(|| {
        AnalysisError::DecodingError(format!("{}: unknown sample rate", path.display()))
    })?;
    let channels = channels.unwrap_or(1).max(1);

    let samples = interleaved_to_mono(&interleaved, channels)?;
    if samples.is_empty() {
        return Err(AnalysisError::DecodingError(format!(
            "{}: no audio samples decoded",
            path.display()
        )));
    }

    log::debug!(
        "Decoded {} frames at {} Hz from {} channel(s), {} packet(s) skipped",
        samples.len(),
        sample_rate,
        channels,
        skipped_packets
    );

    Ok(AudioClip {
        samples,
        sample_rate,
        channels,
    })
}
