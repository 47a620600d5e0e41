//! Real to complex transform engine
//!
//! The only place real/complex conversion happens. Wraps a fixed-size
//! realfft plan pair together with the analysis and synthesis windows.

use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::sync::Arc;

use super::window::{analysis_window, synthesis_window};

/// Windowed forward/inverse transform of a fixed size.
///
/// All plans and scratch storage are allocated at construction; `forward` and
/// `inverse` perform no allocation.
pub struct TransformEngine {
    fft_size: usize,
    analysis_window: Vec<f64>,
    synthesis_window: Vec<f64>,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    forward_scratch: Vec<Complex<f64>>,
    inverse_scratch: Vec<Complex<f64>>,
}

impl TransformEngine {
    /// Create an engine for the given window length and hop.
    pub fn new(fft_size: usize, hop_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);
        let forward_scratch = forward.make_scratch_vec();
        let inverse_scratch = inverse.make_scratch_vec();

        let analysis = analysis_window(fft_size, hop_size);
        let synthesis = synthesis_window(&analysis, hop_size);

        Self {
            fft_size,
            analysis_window: analysis,
            synthesis_window: synthesis,
            forward,
            inverse,
            forward_scratch,
            inverse_scratch,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of complex bins per spectrum (fft_size/2 + 1 for a real transform).
    pub fn spectrum_size(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Apply the analysis window in place, then the forward transform.
    ///
    /// The frame is consumed as transform scratch; only `spectrum` is
    /// meaningful afterwards.
    pub fn forward(&mut self, frame: &mut [f64], spectrum: &mut [Complex<f64>]) {
        for (sample, &w) in frame.iter_mut().zip(&self.analysis_window) {
            *sample *= w;
        }

        self.forward
            .process_with_scratch(frame, spectrum, &mut self.forward_scratch)
            .expect("FFT processing failed");
    }

    /// Apply the inverse transform, then the synthesis window and the
    /// 1/fft_size transform scale.
    ///
    /// The spectrum is consumed as transform scratch; only `frame` is
    /// meaningful afterwards.
    pub fn inverse(&mut self, spectrum: &mut [Complex<f64>], frame: &mut [f64]) {
        // A real inverse requires purely real DC and Nyquist bins
        spectrum[0].im = 0.0;
        if self.fft_size % 2 == 0 {
            let nyquist = spectrum.len() - 1;
            spectrum[nyquist].im = 0.0;
        }

        self.inverse
            .process_with_scratch(spectrum, frame, &mut self.inverse_scratch)
            .expect("FFT processing failed");

        let scale = 1.0 / self.fft_size as f64;
        for (sample, &w) in frame.iter_mut().zip(&self.synthesis_window) {
            *sample *= w * scale;
        }
    }
}
