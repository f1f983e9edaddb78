//! Python enums for algorithm and window selection

use pyo3::prelude::*;

use crate::spectrum::{Algorithm, WindowType};

/// Analysis algorithm exposed to Python
#[pyclass(name = "Algorithm")]
#[derive(Clone)]
pub enum PyAlgorithm {
    Spectrum,
    Autocorrelation,
    CubeRootAutocorrelation,
    EnhancedAutocorrelation,
    Cepstrum,
}

impl From<PyAlgorithm> for Algorithm {
    fn from(py_alg: PyAlgorithm) -> Self {
        match py_alg {
            PyAlgorithm::Spectrum => Algorithm::Spectrum,
            PyAlgorithm::Autocorrelation => Algorithm::Autocorrelation,
            PyAlgorithm::CubeRootAutocorrelation => Algorithm::CubeRootAutocorrelation,
            PyAlgorithm::EnhancedAutocorrelation => Algorithm::EnhancedAutocorrelation,
            PyAlgorithm::Cepstrum => Algorithm::Cepstrum,
        }
    }
}

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Rectangular,
    Bartlett,
    Hamming,
    Hann,
    Blackman,
    BlackmanHarris,
    Welch,
    Gaussian25,
    Gaussian35,
    Gaussian45,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Rectangular => WindowType::Rectangular,
            PyWindowType::Bartlett => WindowType::Bartlett,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::BlackmanHarris => WindowType::BlackmanHarris,
            PyWindowType::Welch => WindowType::Welch,
            PyWindowType::Gaussian25 => WindowType::Gaussian(2.5),
            PyWindowType::Gaussian35 => WindowType::Gaussian(3.5),
            PyWindowType::Gaussian45 => WindowType::Gaussian(4.5),
        }
    }
}

#[pymethods]
impl PyWindowType {
    /// Display name of the window function
    fn name(&self) -> String {
        WindowType::from(self.clone()).name()
    }
}
