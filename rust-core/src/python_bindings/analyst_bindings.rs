//! Python bindings for the spectrum analyst

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use super::enum_bindings::{PyAlgorithm, PyWindowType};
use crate::spectrum::{query, AnalyzerConfig, SpectrumAnalyst};

/// Spectrum analyst exposed to Python
#[pyclass(name = "SpectrumAnalyst")]
pub struct PySpectrumAnalyst {
    analyst: SpectrumAnalyst,
}

#[pymethods]
impl PySpectrumAnalyst {
    #[new]
    fn new() -> Self {
        Self {
            analyst: SpectrumAnalyst::new(),
        }
    }

    /// Analyze a block of samples, replacing the stored curve
    ///
    /// Args:
    ///     samples: Input samples as float32 numpy array
    ///     sample_rate: Sample rate in Hz
    ///     algorithm: Analysis algorithm
    ///     window_type: Window applied to each frame
    ///     window_size: Frame length in samples (32..=65536)
    ///
    /// Returns:
    ///     (min, max) of the processed curve
    ///
    /// Raises:
    ///     ValueError: on invalid parameters or too few samples
    #[pyo3(signature = (samples, sample_rate, algorithm=PyAlgorithm::Spectrum, window_type=PyWindowType::Hann, window_size=1024))]
    fn calculate(
        &mut self,
        samples: PyReadonlyArray1<f32>,
        sample_rate: f64,
        algorithm: PyAlgorithm,
        window_type: PyWindowType,
        window_size: usize,
    ) -> PyResult<(f32, f32)> {
        let config = AnalyzerConfig {
            algorithm: algorithm.into(),
            window_type: window_type.into(),
            window_size,
            sample_rate,
        };

        let range = self.analyst.calculate_with(&config, samples.as_slice()?)?;
        Ok((range.min, range.max))
    }

    /// Meaningful half of the processed curve
    fn processed<'py>(&self, py: Python<'py>) -> &'py PyArray1<f32> {
        PyArray1::from_slice(py, self.analyst.processed())
    }

    fn processed_size(&self) -> usize {
        self.analyst.processed_size()
    }

    /// Curve value over a frequency (Hz) or lag (s) range
    fn processed_value(&self, start: f32, end: f32) -> f32 {
        self.analyst.processed_value(start, end)
    }

    /// Nearest local maximum to a frequency (Hz) or lag (s)
    ///
    /// Returns:
    ///     (position, value), (0.0, 0.0) if the curve has no maximum
    fn find_peak(&self, position: f32) -> (f32, f32) {
        let peak = self.analyst.find_peak(position);
        (peak.position, peak.value)
    }

    /// Curve as tab-separated text with a header line
    fn export_text(&self) -> String {
        let mut text = String::from(query::export_header(self.analyst.algorithm()));
        for row in self.analyst.export_rows() {
            text.push('\n');
            text.push_str(&row.to_string());
        }
        text
    }
}
