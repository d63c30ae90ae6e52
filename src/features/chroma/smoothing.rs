//! Temporal chroma smoothing
//!
//! The smoother carries its state explicitly: build one per analysis call and
//! drop it afterwards. Two analyses never share smoothing history.

use super::Chroma;

/// Exponential moving average over chroma frames
///
/// `out[t] = alpha * out[t-1] + (1 - alpha) * in[t]`, seeded with the first frame.
#[derive(Debug, Clone)]
pub struct ChromaSmoother {
    alpha: f32,
    state: Option<Chroma>,
}

impl ChromaSmoother {
    /// Create a smoother; `alpha` is clamped to [0, 1)
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 0.999),
            state: None,
        }
    }

    /// Feed one frame and get the smoothed frame back
    pub fn process(&mut self, frame: &Chroma) -> Chroma {
        let next = match &self.state {
            None => *frame,
            Some(prev) => {
                let mut out = [0.0; 12];
                for i in 0..12 {
                    out[i] = self.alpha * prev[i] + (1.0 - self.alpha) * frame[i];
                }
                out
            }
        };
        self.state = Some(next);
        next
    }

    /// True once a frame has been processed
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }
}

/// Smooth a whole sequence with a fresh smoother
///
/// `alpha == 0` returns the frames unchanged.
pub fn smooth_chroma(chroma_frames: &[Chroma], alpha: f32) -> Vec<Chroma> {
    if alpha <= 0.0 {
        return chroma_frames.to_vec();
    }
    log::debug!(
        "Smoothing {} chroma frames with alpha {}",
        chroma_frames.len(),
        alpha
    );
    let mut smoother = ChromaSmoother::new(alpha);
    chroma_frames.iter().map(|f| smoother.process(f)).collect()
}
