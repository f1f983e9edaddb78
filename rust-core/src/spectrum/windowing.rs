//! Windowing helpers for overlapped frame analysis
//!
//! Builds the per-analysis coefficient buffer, applies it to frames and
//! computes the scale that puts a full-scale sine at 0 dB.

use super::windows::{self, WindowType};

/// Build the coefficient buffer for one analysis
///
/// Starts from an all-ones (rectangular) buffer and applies the selected
/// window function to it in place.
pub fn window_coefficients(window_type: WindowType, length: usize) -> Vec<f32> {
    let mut window = vec![1.0f32; length];
    windows::apply(window_type, &mut window);
    window
}

/// Multiply a frame of samples by the window into `out`
///
/// All three slices must have the same length.
pub fn apply_window_into(samples: &[f32], window: &[f32], out: &mut [f32]) {
    debug_assert_eq!(samples.len(), window.len());
    debug_assert_eq!(out.len(), window.len());

    for ((o, &s), &w) in out.iter_mut().zip(samples).zip(window) {
        *o = s * w;
    }
}

/// Power normalization for spectrum levels
///
/// With `S` the sum of the window coefficients, a sine of amplitude 1.0 has
/// a power-spectrum peak of about S²/4, so the factor is 4/S². Falls back
/// to 1.0 for a window whose coefficients do not sum to a positive value.
pub fn normalization_scale(window: &[f32]) -> f64 {
    let sum: f64 = window.iter().map(|&w| w as f64).sum();
    if sum > 0.0 {
        4.0 / (sum * sum)
    } else {
        1.0
    }
}
