//! Spectral Analyst - windowed spectrum, autocorrelation and cepstrum engine
//!
//! Turns a fully buffered block of audio into a single curve over frequency
//! or lag, and answers value and peak queries against it.

#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod error;
pub mod progress;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{AnalysisError, ErrorKind, Result};
pub use progress::{NoProgress, ProgressSink};
pub use spectrum::{
    Algorithm, AnalysisRequest, AnalyzerConfig, CurveRange, Peak, SpectrumAnalyst, WindowType,
};
