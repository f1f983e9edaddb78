//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::AnalysisError;

mod analyst_bindings;
mod enum_bindings;

impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn spectral_analyst(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<analyst_bindings::PySpectrumAnalyst>()?;

    m.add_class::<enum_bindings::PyAlgorithm>()?;
    m.add_class::<enum_bindings::PyWindowType>()?;

    Ok(())
}
