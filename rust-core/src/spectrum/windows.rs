//! Window function catalog for spectral analysis
//!
//! Entries are addressed by a stable index so that callers holding a plain
//! integer id (menus, saved settings, Python) can select a taper.

use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// Window function types, in catalog order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    /// Rectangular window (no windowing)
    Rectangular,

    /// Triangular window rising to 1.0 at the centre
    Bartlett,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~53 dB
    Hamming,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~44 dB
    Hann,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    /// Sidelobe attenuation: ~74 dB
    Blackman,

    /// 4-term Blackman-Harris window, ~92 dB sidelobe attenuation
    BlackmanHarris,

    /// Welch (parabolic) window: w[n] = 4·n/M·(1 - n/M)
    Welch,

    /// Gaussian window with shape parameter `a`
    Gaussian(f64),
}

impl WindowType {
    /// Catalog, indexed by window function id
    pub const ALL: [WindowType; 10] = [
        WindowType::Rectangular,
        WindowType::Bartlett,
        WindowType::Hamming,
        WindowType::Hann,
        WindowType::Blackman,
        WindowType::BlackmanHarris,
        WindowType::Welch,
        WindowType::Gaussian(2.5),
        WindowType::Gaussian(3.5),
        WindowType::Gaussian(4.5),
    ];

    /// Number of entries in the catalog
    pub const COUNT: usize = Self::ALL.len();

    /// Number of entries in the catalog
    pub fn count() -> usize {
        Self::COUNT
    }

    /// Look up a window function by catalog id
    pub fn from_index(id: usize) -> Result<Self> {
        Self::ALL
            .get(id)
            .copied()
            .ok_or(AnalysisError::UnknownWindowFunction {
                id,
                count: Self::COUNT,
            })
    }

    /// Catalog id of this window function, if it is a catalog entry
    pub fn index(&self) -> Option<usize> {
        Self::ALL.iter().position(|w| w == self)
    }

    /// Human-readable name
    pub fn name(&self) -> String {
        match self {
            WindowType::Rectangular => "Rectangular".to_string(),
            WindowType::Bartlett => "Bartlett".to_string(),
            WindowType::Hamming => "Hamming".to_string(),
            WindowType::Hann => "Hann".to_string(),
            WindowType::Blackman => "Blackman".to_string(),
            WindowType::BlackmanHarris => "Blackman-Harris".to_string(),
            WindowType::Welch => "Welch".to_string(),
            WindowType::Gaussian(a) => format!("Gaussian(a={a:.1})"),
        }
    }

    /// Coefficient of sample `n` in a window of `length` samples
    fn coefficient(&self, n: usize, length: usize) -> f64 {
        let m = length as f64;
        let x = n as f64;

        match *self {
            WindowType::Rectangular => 1.0,

            WindowType::Bartlett => {
                let half = (length / 2).max(1) as f64;
                if x < half {
                    x / half
                } else {
                    1.0 - (x - half) / half
                }
            }

            WindowType::Hamming => {
                let angle = 2.0 * PI * x / (m - 1.0);
                0.54 - 0.46 * angle.cos()
            }

            WindowType::Hann => {
                let angle = 2.0 * PI * x / (m - 1.0);
                0.5 - 0.5 * angle.cos()
            }

            WindowType::Blackman => {
                let angle1 = 2.0 * PI * x / (m - 1.0);
                let angle2 = 4.0 * PI * x / (m - 1.0);
                0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos()
            }

            WindowType::BlackmanHarris => {
                let angle = 2.0 * PI * x / (m - 1.0);
                0.35875 - 0.48829 * angle.cos() + 0.14128 * (2.0 * angle).cos()
                    - 0.01168 * (3.0 * angle).cos()
            }

            WindowType::Welch => 4.0 * x / m * (1.0 - x / m),

            WindowType::Gaussian(a) => {
                let half = m / 2.0;
                let t = a * (x - half) / half;
                (-0.5 * t * t).exp()
            }
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f32> {
    if length < 2 {
        return vec![1.0; length];
    }

    (0..length)
        .map(|n| window_type.coefficient(n, length) as f32)
        .collect()
}

/// Apply a window function to a buffer in place
pub fn apply(window_type: WindowType, buffer: &mut [f32]) {
    if window_type == WindowType::Rectangular {
        return;
    }
    let length = buffer.len();
    for (n, s) in buffer.iter_mut().enumerate() {
        *s *= window_type.coefficient(n, length) as f32;
    }
}
