//! Spectral analysis of buffered audio

pub mod algorithm;
pub mod analysis;
pub mod cubic;
pub mod fft;
pub mod query;
pub mod windowing;
pub mod windows;

pub use algorithm::{Algorithm, CurveRange};
pub use analysis::{AnalysisRequest, AnalyzerConfig, SpectrumAnalyst};
pub use fft::FftEngine;
pub use query::{ExportRow, Peak};
pub use windows::WindowType;
