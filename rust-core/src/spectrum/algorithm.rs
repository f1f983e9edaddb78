//! Analysis algorithms
//!
//! Each [`Algorithm`] is a pair of strategies: a [`FrameTransform`] run on
//! every windowed frame and accumulated into the curve, and a
//! [`PostProcess`] run once over the accumulated curve.

use super::fft::FftEngine;
use crate::error::{AnalysisError, Result};

/// Number of bins at each end of a cepstrum left out of its value range
pub const CEPSTRUM_EDGE_BINS: usize = 4;

/// Analysis mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Power spectrum in dB
    #[default]
    Spectrum,

    /// Autocorrelation via the square root of the power spectrum
    Autocorrelation,

    /// Autocorrelation via the cube root of the power spectrum
    /// (Tolonen & Karjalainen)
    CubeRootAutocorrelation,

    /// Cube-root autocorrelation with octave peaks pruned
    EnhancedAutocorrelation,

    /// Inverse transform of the log power spectrum
    Cepstrum,
}

impl Algorithm {
    /// All algorithms, in menu order
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Spectrum,
        Algorithm::Autocorrelation,
        Algorithm::CubeRootAutocorrelation,
        Algorithm::EnhancedAutocorrelation,
        Algorithm::Cepstrum,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(AnalysisError::UnknownAlgorithm(index))
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Spectrum => "Spectrum",
            Algorithm::Autocorrelation => "Standard Autocorrelation",
            Algorithm::CubeRootAutocorrelation => "Cuberoot Autocorrelation",
            Algorithm::EnhancedAutocorrelation => "Enhanced Autocorrelation",
            Algorithm::Cepstrum => "Cepstrum",
        }
    }

    /// True when the curve is indexed by frequency rather than lag
    pub fn is_spectrum(&self) -> bool {
        matches!(self, Algorithm::Spectrum)
    }

    /// Unit of the curve's horizontal axis
    pub fn x_unit(&self) -> &'static str {
        if self.is_spectrum() {
            "Hz"
        } else {
            "s"
        }
    }

    /// Unit of the curve's values
    pub fn y_unit(&self) -> &'static str {
        if self.is_spectrum() {
            "dB"
        } else {
            ""
        }
    }

    pub fn frame_transform(&self) -> FrameTransform {
        match self {
            Algorithm::Spectrum => FrameTransform::PowerSpectrum,
            Algorithm::Autocorrelation => FrameTransform::Autocorrelation(Compression::SquareRoot),
            Algorithm::CubeRootAutocorrelation | Algorithm::EnhancedAutocorrelation => {
                FrameTransform::Autocorrelation(Compression::CubeRoot)
            }
            Algorithm::Cepstrum => FrameTransform::Cepstrum,
        }
    }

    pub fn post_process(&self) -> PostProcess {
        match self {
            Algorithm::Spectrum => PostProcess::Decibels,
            Algorithm::Autocorrelation | Algorithm::CubeRootAutocorrelation => PostProcess::Average,
            Algorithm::EnhancedAutocorrelation => PostProcess::PrunePeaks,
            Algorithm::Cepstrum => PostProcess::AverageIgnoringEdges,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compression applied to the power spectrum before the second FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    SquareRoot,
    CubeRoot,
}

impl Compression {
    fn apply(&self, power: f32) -> f32 {
        match self {
            Compression::SquareRoot => power.sqrt(),
            Compression::CubeRoot => power.powf(1.0 / 3.0),
        }
    }
}

/// Per-frame transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTransform {
    /// |X[k]|²
    PowerSpectrum,

    /// Real part of FFT(compress(|X[k]|²))
    Autocorrelation(Compression),

    /// IFFT(ln(max(|X[k]|², floor)))
    Cepstrum,
}

/// Scratch buffers for one analysis, each `window_size` long
pub struct FrameScratch {
    out: Vec<f32>,
    out2: Vec<f32>,
}

impl FrameScratch {
    pub fn new(window_size: usize) -> Self {
        Self {
            out: vec![0.0; window_size],
            out2: vec![0.0; window_size],
        }
    }
}

impl FrameTransform {
    /// Transform one windowed frame and add the result into `accum`
    ///
    /// `frame` holds the windowed samples and is clobbered. `accum` is the
    /// first half of the curve, `window_size / 2` long.
    pub fn accumulate(
        &self,
        fft: &mut FftEngine,
        frame: &mut [f32],
        scratch: &mut FrameScratch,
        accum: &mut [f32],
    ) -> Result<()> {
        let n = fft.fft_size();
        let half = n / 2;
        let FrameScratch { out, out2 } = scratch;
        let (out, out2) = (out.as_mut_slice(), out2.as_mut_slice());

        match self {
            FrameTransform::PowerSpectrum => {
                fft.power_spectrum(frame, out)?;
                for (a, &p) in accum[..half].iter_mut().zip(out.iter()) {
                    *a += p;
                }
            }

            FrameTransform::Autocorrelation(compression) => {
                fft.forward_real(frame, out, out2)?;
                for i in 0..n {
                    let power = out[i] * out[i] + out2[i] * out2[i];
                    frame[i] = compression.apply(power);
                }

                fft.forward_real(frame, out, out2)?;
                for (a, &re) in accum[..half].iter_mut().zip(out.iter()) {
                    *a += re;
                }
            }

            FrameTransform::Cepstrum => {
                fft.forward_real(frame, out, out2)?;

                // Floor assumes a maximum time-domain amplitude of 1.0
                let min_power = cepstrum_power_floor(n);
                for i in 0..n {
                    let power = out[i] * out[i] + out2[i] * out2[i];
                    frame[i] = power.max(min_power).ln();
                }

                fft.inverse_real(frame, None, out)?;
                for (a, &re) in accum[..half].iter_mut().zip(out.iter()) {
                    *a += re;
                }
            }
        }

        Ok(())
    }
}

/// Smallest power fed to the cepstrum's logarithm
pub fn cepstrum_power_floor(window_size: usize) -> f32 {
    (1e-20 * (window_size as f64) * (window_size as f64)) as f32
}

/// Minimum and maximum of a processed curve, for scale calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveRange {
    pub min: f32,
    pub max: f32,
}

impl CurveRange {
    fn of(values: &[f32]) -> Self {
        values.iter().fold(
            CurveRange {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |range, &v| CurveRange {
                min: range.min.min(v),
                max: range.max.max(v),
            },
        )
    }
}

/// Post-processing of the accumulated curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Scale by normalization / windows, then 10·log10
    Decibels,

    /// Divide by the window count
    Average,

    /// Average, then remove octave-doubling peaks
    PrunePeaks,

    /// Average; value range skips the outermost bins
    AverageIgnoringEdges,
}

impl PostProcess {
    /// Finish the accumulated half curve in place and report its range
    pub fn apply(&self, curve: &mut [f32], windows: usize, normalization: f64) -> CurveRange {
        match self {
            PostProcess::Decibels => {
                to_decibels(curve, normalization / windows as f64);
                CurveRange::of(curve)
            }
            PostProcess::Average => {
                average(curve, windows);
                CurveRange::of(curve)
            }
            PostProcess::PrunePeaks => {
                average(curve, windows);
                prune_peaks(curve);
                CurveRange::of(curve)
            }
            PostProcess::AverageIgnoringEdges => {
                average(curve, windows);
                range_ignoring_edges(curve, CEPSTRUM_EDGE_BINS)
            }
        }
    }
}

/// value ← 10·log10(value · scale)
pub fn to_decibels(curve: &mut [f32], scale: f64) {
    for v in curve.iter_mut() {
        *v = (10.0 * (*v as f64 * scale).log10()) as f32;
    }
}

pub fn average(curve: &mut [f32], windows: usize) {
    let windows = windows as f32;
    for v in curve.iter_mut() {
        *v /= windows;
    }
}

/// Peak pruning after Tolonen & Karjalainen (2000)
///
/// Clips at zero, subtracts the clipped curve stretched to twice its
/// length (linearly interpolated), and clips at zero again.
pub fn prune_peaks(curve: &mut [f32]) {
    for v in curve.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
    let clipped = curve.to_vec();

    for (i, v) in curve.iter_mut().enumerate() {
        let j = i / 2;
        let stretched = if i % 2 == 0 {
            clipped[j]
        } else {
            (clipped[j] + clipped[j + 1]) / 2.0
        };
        *v = (*v - stretched).max(0.0);
    }
}

/// Range of `curve` without its first and last `edge` values
pub fn range_ignoring_edges(curve: &[f32], edge: usize) -> CurveRange {
    if curve.len() > 2 * edge {
        CurveRange::of(&curve[edge..curve.len() - edge])
    } else {
        CurveRange::of(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_indices() {
        for (i, alg) in Algorithm::ALL.iter().enumerate() {
            assert_eq!(alg.index(), i);
            assert_eq!(Algorithm::from_index(i).unwrap(), *alg);
        }
        assert_eq!(Algorithm::from_index(5), Err(AnalysisError::UnknownAlgorithm(5)));
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(
            Algorithm::EnhancedAutocorrelation.frame_transform(),
            FrameTransform::Autocorrelation(Compression::CubeRoot)
        );
        assert_eq!(
            Algorithm::Autocorrelation.frame_transform(),
            FrameTransform::Autocorrelation(Compression::SquareRoot)
        );
        assert_eq!(Algorithm::CubeRootAutocorrelation.post_process(), PostProcess::Average);
        assert_eq!(Algorithm::Cepstrum.post_process(), PostProcess::AverageIgnoringEdges);
    }

    #[test]
    fn test_units() {
        assert_eq!(Algorithm::Spectrum.x_unit(), "Hz");
        assert_eq!(Algorithm::Spectrum.y_unit(), "dB");
        assert_eq!(Algorithm::Cepstrum.x_unit(), "s");
    }

    #[test]
    fn test_to_decibels() {
        let mut curve = vec![1.0f32, 10.0, 100.0];
        to_decibels(&mut curve, 0.1);
        assert!((curve[0] + 10.0).abs() < 1e-5);
        assert!(curve[1].abs() < 1e-5);
        assert!((curve[2] - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_decibels_range() {
        let mut curve = vec![4.0f32, 400.0, 40.0];
        let range = PostProcess::Decibels.apply(&mut curve, 4, 1.0);
        assert!(range.min.abs() < 1e-5);
        assert!((range.max - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_average_range() {
        let mut curve = vec![2.0f32, -6.0, 4.0, 8.0];
        let range = PostProcess::Average.apply(&mut curve, 2, 123.0);
        assert_eq!(curve, vec![1.0, -3.0, 2.0, 4.0]);
        assert_eq!(range, CurveRange { min: -3.0, max: 4.0 });
    }

    #[test]
    fn test_prune_peaks_removes_octave_copy() {
        // Peaks at lag 2 and its double at lag 4
        let mut curve = vec![0.0f32, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        prune_peaks(&mut curve);

        // The stretched copy puts lag 2's peak onto lag 4
        assert_eq!(curve, vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_prune_peaks_clips_negatives() {
        let mut curve = vec![-1.0f32, 3.0, -2.0, 5.0];
        prune_peaks(&mut curve);
        assert!(curve.iter().all(|&v| v >= 0.0));
        // i=1: 3 - (0 + 3)/2
        assert_eq!(curve[1], 1.5);
        // i=3: 5 - (3 + 0)/2
        assert_eq!(curve[3], 3.5);
    }

    #[test]
    fn test_range_ignoring_edges() {
        let mut curve = vec![100.0f32; 16];
        curve[6] = -1.0;
        curve[9] = 2.0;
        curve[0] = -100.0;
        curve[15] = 500.0;
        for v in curve[4..12].iter_mut().filter(|v| **v == 100.0) {
            *v = 0.5;
        }

        let range = range_ignoring_edges(&curve, CEPSTRUM_EDGE_BINS);
        assert_eq!(range, CurveRange { min: -1.0, max: 2.0 });
    }

    #[test]
    fn test_cepstrum_floor() {
        let floor = cepstrum_power_floor(1024);
        assert!((floor - 1.048576e-14).abs() < 1e-19);
    }
}
