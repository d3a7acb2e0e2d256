use std::sync::Arc;

/// Build one full sine cycle of `sample_count` entries scaled to `peak`.
///
/// Values are truncated toward zero, so the table never exceeds `peak` in
/// magnitude. `sample_count` must be non-zero.
pub fn generate(sample_count: usize, peak: i16) -> Vec<i16> {
    let peak = peak as f32;
    (0..sample_count)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / sample_count as f32;
            (peak * phase.sin()) as i16
        })
        .collect()
}

/// Read-only single-cycle table shared by every oscillator of a voice.
#[derive(Clone, Debug)]
pub struct Wavetable {
    samples: Arc<[i16]>,
}

impl Wavetable {
    pub fn sine(sample_count: usize, peak: i16) -> Self {
        Self {
            samples: generate(sample_count, peak).into(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Linearly interpolated lookup. `phase` is in cycles; only its fractional
    /// part is used. Output is normalized to full-scale `i16` (so a peak of
    /// 30000 plays back at about 0.92).
    #[inline]
    pub fn lookup(&self, phase: f32) -> f32 {
        let n = self.samples.len();
        if n == 0 {
            return 0.0;
        }
        let pos = (phase - phase.floor()) * n as f32;
        let i0 = (pos as usize).min(n - 1);
        let i1 = (i0 + 1) % n;
        let frac = pos - i0 as f32;
        let a = self.samples[i0] as f32;
        let b = self.samples[i1] as f32;
        (a + (b - a) * frac) / i16::MAX as f32
    }
}
