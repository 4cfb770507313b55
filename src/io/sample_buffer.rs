//! Sample windowing and buffering utilities

/// Zero-padded buffer for centered, overlapping frame extraction
///
/// The signal is padded with `frame_size / 2` zeros on both sides so that
/// frame `k` is centered on sample `k * hop_size`. A signal of `n` samples
/// yields `1 + n / hop_size` frames.
#[derive(Debug)]
pub struct SampleBuffer {
    /// Padded buffer data
    data: Vec<f32>,
    /// Start of the next frame within `data`
    position: usize,
    /// Frames left to emit
    remaining: usize,
    frame_size: usize,
    hop_size: usize,
}

impl SampleBuffer {
    /// Create a centered buffer over `samples`
    ///
    /// Callers are expected to pass non-zero `frame_size` and `hop_size`.
    pub fn centered(samples: &[f32], frame_size: usize, hop_size: usize) -> Self {
        let pad = frame_size / 2;
        let mut data = Vec::with_capacity(samples.len() + 2 * pad);
        data.resize(pad, 0.0);
        data.extend_from_slice(samples);
        data.resize(samples.len() + 2 * pad, 0.0);

        let remaining = if samples.is_empty() || hop_size == 0 {
            0
        } else {
            1 + samples.len() / hop_size
        };

        Self {
            data,
            position: 0,
            remaining,
            frame_size,
            hop_size,
        }
    }

    /// Number of frames this buffer will produce in total
    pub fn frame_count(&self) -> usize {
        self.remaining + self.position / self.hop_size.max(1)
    }

    /// Get next frame of samples; the tail of the last frames is zero-filled
    pub fn next_window(&mut self) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        let mut window = vec![0.0f32; self.frame_size];
        let start = self.position.min(self.data.len());
        let end = (self.position + self.frame_size).min(self.data.len());
        window[..end - start].copy_from_slice(&self.data[start..end]);

        self.position += self.hop_size;
        self.remaining -= 1;
        Some(window)
    }
}
