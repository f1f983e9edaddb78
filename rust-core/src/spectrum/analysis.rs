//! Spectrum analyst
//!
//! Slides a window across a fully buffered block with 50% overlap,
//! accumulates one transform per frame and post-processes the sum into a
//! single curve that can then be queried (see `query.rs`).

use tracing::{debug, warn};

use super::algorithm::{Algorithm, CurveRange, FrameScratch};
use super::fft::FftEngine;
use super::windowing::{apply_window_into, normalization_scale, window_coefficients};
use super::windows::WindowType;
use crate::error::{AnalysisError, Result};
use crate::progress::{NoProgress, ProgressSink};

/// Smallest accepted window size
pub const MIN_WINDOW_SIZE: usize = 32;

/// Largest accepted window size
pub const MAX_WINDOW_SIZE: usize = 65536;

/// Window sizes offered for selection
pub const WINDOW_SIZES: [usize; 10] = [128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768, 65536];

/// Spectrum analyst configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub algorithm: Algorithm,

    /// Window type applied to each frame
    pub window_type: WindowType,

    /// Frame length in samples, MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE
    pub window_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Spectrum,
            window_type: WindowType::Hann,
            window_size: 1024,
            sample_rate: 44100.0,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_window_type(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Check parameters that do not depend on the input
    pub fn validate(&self) -> Result<()> {
        if !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&self.window_size) {
            return Err(AnalysisError::WindowSizeOutOfRange {
                size: self.window_size,
                min: MIN_WINDOW_SIZE,
                max: MAX_WINDOW_SIZE,
            });
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}

/// One analysis: configuration plus the samples to analyze
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub config: AnalyzerConfig,
    pub samples: &'a [f32],
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(config: AnalyzerConfig, samples: &'a [f32]) -> Self {
        Self { config, samples }
    }

    /// Build a request from catalog indices
    ///
    /// # Arguments
    /// * `algorithm` - Index into [`Algorithm::ALL`]
    /// * `window_id` - Index into the window function catalog
    /// * `window_size` - Frame length in samples
    /// * `sample_rate` - Sample rate in Hz
    /// * `samples` - Input block
    pub fn from_indices(
        algorithm: usize,
        window_id: usize,
        window_size: usize,
        sample_rate: f64,
        samples: &'a [f32],
    ) -> Result<Self> {
        let config = AnalyzerConfig {
            algorithm: Algorithm::from_index(algorithm)?,
            window_type: WindowType::from_index(window_id)?,
            window_size,
            sample_rate,
        };
        Ok(Self::new(config, samples))
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if self.samples.len() < self.config.window_size {
            return Err(AnalysisError::InsufficientData {
                needed: self.config.window_size,
                available: self.samples.len(),
            });
        }
        Ok(())
    }
}

/// Overlapped windowed analysis engine
///
/// Holds the most recent processed curve together with the sample rate and
/// window size that produced it.
pub struct SpectrumAnalyst {
    pub(super) algorithm: Algorithm,
    pub(super) sample_rate: f64,
    pub(super) window_size: usize,

    /// `window_size` values; only the first half carries data
    pub(super) processed: Vec<f32>,

    fft_engine: Option<FftEngine>,
}

impl Default for SpectrumAnalyst {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyst {
    pub fn new() -> Self {
        Self {
            algorithm: Algorithm::Spectrum,
            sample_rate: 0.0,
            window_size: 0,
            processed: Vec::new(),
            fft_engine: None,
        }
    }

    /// Algorithm of the stored curve
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sample rate of the stored curve, 0.0 when there is none
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Window size of the stored curve, 0 when there is none
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Drop the stored curve
    pub fn clear(&mut self) {
        self.processed.clear();
        self.sample_rate = 0.0;
        self.window_size = 0;
    }

    /// Analyze a block without progress reporting
    pub fn calculate_with(&mut self, config: &AnalyzerConfig, samples: &[f32]) -> Result<CurveRange> {
        let request = AnalysisRequest::new(config.clone(), samples);
        self.calculate(&request, &mut NoProgress)
    }

    /// Analyze a block and replace the stored curve
    ///
    /// The previous curve is dropped before validation, so after an error
    /// no curve is available. On success returns the value range used for
    /// scale calibration.
    pub fn calculate(
        &mut self,
        request: &AnalysisRequest<'_>,
        progress: &mut dyn ProgressSink,
    ) -> Result<CurveRange> {
        self.clear();

        let config = &request.config;
        debug!(
            algorithm = %config.algorithm,
            window = %config.window_type.name(),
            window_size = config.window_size,
            sample_rate = config.sample_rate,
            samples = request.samples.len(),
            "starting analysis"
        );

        if let Err(err) = request.validate() {
            warn!(%err, "analysis request rejected");
            return Err(err);
        }

        let window_size = config.window_size;
        let half = window_size / 2;

        let window = window_coefficients(config.window_type, window_size);
        let normalization = normalization_scale(&window);

        let mut processed = vec![0.0f32; window_size];

        progress.set_range(request.samples.len());
        let windows = self.accumulate_frames(request, &window, &mut processed[..half], progress);
        progress.reset();
        let windows = windows?;

        if windows == 0 {
            return Err(AnalysisError::NoWindows);
        }

        let range = config
            .algorithm
            .post_process()
            .apply(&mut processed[..half], windows, normalization);

        self.algorithm = config.algorithm;
        self.sample_rate = config.sample_rate;
        self.window_size = window_size;
        self.processed = processed;

        debug!(windows, min = range.min, max = range.max, "analysis complete");

        Ok(range)
    }

    /// Run the frame transform over every full window, returning the count
    fn accumulate_frames(
        &mut self,
        request: &AnalysisRequest<'_>,
        window: &[f32],
        accum: &mut [f32],
        progress: &mut dyn ProgressSink,
    ) -> Result<usize> {
        let window_size = window.len();
        let hop = window_size / 2;
        let data = request.samples;
        let transform = request.config.algorithm.frame_transform();

        let fft = self.fft_engine(window_size);
        let mut frame = vec![0.0f32; window_size];
        let mut scratch = FrameScratch::new(window_size);

        let mut windows = 0;
        let mut start = 0;
        while start + window_size <= data.len() {
            apply_window_into(&data[start..start + window_size], window, &mut frame);
            transform.accumulate(fft, &mut frame, &mut scratch, accum)?;

            progress.set_value(start);

            start += hop;
            windows += 1;
        }

        Ok(windows)
    }

    /// FFT engine for `size`, replanned only when the size changes
    fn fft_engine(&mut self, size: usize) -> &mut FftEngine {
        let needs_new_fft = self
            .fft_engine
            .as_ref()
            .map_or(true, |engine| engine.fft_size() != size);

        if needs_new_fft {
            self.fft_engine = Some(FftEngine::new(size));
        }
        self.fft_engine.get_or_insert_with(|| FftEngine::new(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::f32::consts::PI;

    #[derive(Default)]
    struct RecordingProgress {
        range: Option<usize>,
        values: Vec<usize>,
        resets: usize,
    }

    impl ProgressSink for RecordingProgress {
        fn set_range(&mut self, total: usize) {
            self.range = Some(total);
        }
        fn set_value(&mut self, current: usize) {
            self.values.push(current);
        }
        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn sine(len: usize, freq: f32, rate: f32) -> Vec<f32> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f32 / rate).sin())
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.algorithm, Algorithm::Spectrum);
        assert_eq!(config.window_type, WindowType::Hann);
        assert_eq!(config.window_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = AnalyzerConfig::default().with_window_size(16);
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidParameters);

        let config = AnalyzerConfig::default().with_window_size(131072);
        assert!(config.validate().is_err());

        let config = AnalyzerConfig::default().with_sample_rate(0.0);
        assert_eq!(config.validate(), Err(AnalysisError::InvalidSampleRate(0.0)));

        for size in [MIN_WINDOW_SIZE, MAX_WINDOW_SIZE] {
            assert!(AnalyzerConfig::default().with_window_size(size).validate().is_ok());
        }
    }

    #[test]
    fn test_request_from_indices() {
        let samples = vec![0.0f32; 64];
        let request = AnalysisRequest::from_indices(4, 3, 32, 8000.0, &samples).unwrap();
        assert_eq!(request.config.algorithm, Algorithm::Cepstrum);
        assert_eq!(request.config.window_type, WindowType::Hann);

        let err = AnalysisRequest::from_indices(0, 42, 32, 8000.0, &samples).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);

        let err = AnalysisRequest::from_indices(7, 0, 32, 8000.0, &samples).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownAlgorithm(7));
    }

    #[test]
    fn test_window_stepping_and_progress() {
        let mut analyst = SpectrumAnalyst::new();
        let samples = sine(2048, 440.0, 8000.0);
        let config = AnalyzerConfig::default()
            .with_window_size(1024)
            .with_sample_rate(8000.0);
        let request = AnalysisRequest::new(config, &samples);
        let mut progress = RecordingProgress::default();

        analyst.calculate(&request, &mut progress).unwrap();

        // Hop of 512: frames start at 0, 512 and 1024
        assert_eq!(progress.range, Some(2048));
        assert_eq!(progress.values, vec![0, 512, 1024]);
        assert_eq!(progress.resets, 1);
    }

    #[test]
    fn test_state_after_success() {
        let mut analyst = SpectrumAnalyst::new();
        assert_eq!(analyst.window_size(), 0);

        let samples = sine(4096, 1000.0, 48000.0);
        let config = AnalyzerConfig::default()
            .with_window_size(512)
            .with_sample_rate(48000.0)
            .with_algorithm(Algorithm::Autocorrelation);
        analyst.calculate_with(&config, &samples).unwrap();

        assert_eq!(analyst.algorithm(), Algorithm::Autocorrelation);
        assert_eq!(analyst.window_size(), 512);
        assert_eq!(analyst.sample_rate(), 48000.0);

        // Upper half is never populated
        assert_eq!(analyst.processed.len(), 512);
        assert!(analyst.processed[256..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_failure_clears_previous_curve() {
        let mut analyst = SpectrumAnalyst::new();
        let samples = sine(4096, 1000.0, 48000.0);
        let config = AnalyzerConfig::default().with_sample_rate(48000.0);
        analyst.calculate_with(&config, &samples).unwrap();
        assert_eq!(analyst.window_size(), 1024);

        let err = analyst
            .calculate_with(&config.clone().with_window_size(8192), &samples)
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                needed: 8192,
                available: 4096
            }
        );
        assert!(analyst.processed.is_empty());
        assert_eq!(analyst.window_size(), 0);
        assert_eq!(analyst.sample_rate(), 0.0);
    }

    #[test]
    fn test_rejected_request_skips_progress() {
        let mut analyst = SpectrumAnalyst::new();
        let samples = vec![0.0f32; 100];
        let config = AnalyzerConfig::default().with_window_size(20);
        let mut progress = RecordingProgress::default();

        assert!(analyst
            .calculate(&AnalysisRequest::new(config, &samples), &mut progress)
            .is_err());
        assert_eq!(progress.range, None);
        assert_eq!(progress.resets, 0);
    }

    #[test]
    fn test_fft_engine_reused_for_same_size() {
        let mut analyst = SpectrumAnalyst::new();
        let samples = sine(2048, 300.0, 8000.0);
        let config = AnalyzerConfig::default()
            .with_window_size(256)
            .with_sample_rate(8000.0);

        let first = analyst.calculate_with(&config, &samples).unwrap();
        assert_eq!(analyst.fft_engine.as_ref().map(|e| e.fft_size()), Some(256));

        let second = analyst.calculate_with(&config, &samples).unwrap();
        assert_eq!(first, second);

        analyst
            .calculate_with(&config.with_window_size(512), &samples)
            .unwrap();
        assert_eq!(analyst.fft_engine.as_ref().map(|e| e.fft_size()), Some(512));
    }
}
