//! Analysis and synthesis windows for the short-time transform
//!
//! The window pair is chosen so that windowed overlap-add reconstructs unity
//! gain for every valid (window_size, hop_size) combination, not only the
//! classical overlap fractions.

use std::f64::consts::PI;

/// Generate the analysis window.
///
/// Periodic Hann for overlapping frames. When the hop covers the whole
/// window the frames are disjoint and a tapered window could never sum back
/// to unity, so the window degenerates to rectangular.
pub fn analysis_window(window_size: usize, hop_size: usize) -> Vec<f64> {
    if hop_size == window_size {
        return vec![1.0; window_size];
    }

    (0..window_size)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / window_size as f64;
            0.5 - 0.5 * angle.cos()
        })
        .collect()
}

/// Generate the synthesis window matching a given analysis window.
///
/// Each output position is touched by the window positions of one residue
/// class modulo the hop, so normalizing by the summed squared analysis
/// window over that class makes the overlap-add sum exactly one:
///
/// s[n] = a[n] / sum_j a^2[(n mod hop) + j * hop]
pub fn synthesis_window(analysis: &[f64], hop_size: usize) -> Vec<f64> {
    let mut norm = vec![0.0; hop_size];
    for (n, &a) in analysis.iter().enumerate() {
        norm[n % hop_size] += a * a;
    }
    debug_assert!(norm.iter().all(|&d| d > 0.0));

    analysis
        .iter()
        .enumerate()
        .map(|(n, &a)| a / norm[n % hop_size])
        .collect()
}
