//! Transform kernels built on realfft
//!
//! Forward and inverse real FFTs plus the power spectrum, planned once per
//! window size and reused for every frame of an analysis.

use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::sync::Arc;

use crate::error::Result;

/// FFT engine for real-valued frames
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real-to-complex processor
    r2c: Arc<dyn RealToComplex<f32>>,

    /// Complex-to-real processor
    c2r: Arc<dyn ComplexToReal<f32>>,

    /// Reusable time-domain buffer (realfft uses its input as scratch)
    time_buffer: Vec<f32>,

    /// Reusable half spectrum, fft_size/2 + 1 bins
    spectrum_buffer: Vec<Complex<f32>>,

    forward_scratch: Vec<Complex<f32>>,
    inverse_scratch: Vec<Complex<f32>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, even)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(fft_size);
        let c2r = planner.plan_fft_inverse(fft_size);

        let time_buffer = r2c.make_input_vec();
        let spectrum_buffer = r2c.make_output_vec();
        let forward_scratch = r2c.make_scratch_vec();
        let inverse_scratch = c2r.make_scratch_vec();

        Self {
            fft_size,
            r2c,
            c2r,
            time_buffer,
            spectrum_buffer,
            forward_scratch,
            inverse_scratch,
        }
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    fn forward_half(&mut self, input: &[f32]) -> Result<()> {
        self.time_buffer.copy_from_slice(&input[..self.fft_size]);
        self.r2c.process_with_scratch(
            &mut self.time_buffer,
            &mut self.spectrum_buffer,
            &mut self.forward_scratch,
        )?;
        Ok(())
    }

    /// Power spectrum |X[k]|² for k = 0..fft_size/2
    ///
    /// `output` receives `fft_size / 2` values; the Nyquist bin is dropped.
    pub fn power_spectrum(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        self.forward_half(input)?;

        let half = self.fft_size / 2;
        for (o, c) in output[..half].iter_mut().zip(&self.spectrum_buffer) {
            *o = c.norm_sqr();
        }
        Ok(())
    }

    /// Forward real FFT into full-length real and imaginary parts
    ///
    /// Bins above Nyquist are filled from the conjugate-symmetric half, so
    /// `real` and `imag` both hold `fft_size` values.
    pub fn forward_real(&mut self, input: &[f32], real: &mut [f32], imag: &mut [f32]) -> Result<()> {
        self.forward_half(input)?;

        let n = self.fft_size;
        for (k, c) in self.spectrum_buffer.iter().enumerate() {
            real[k] = c.re;
            imag[k] = c.im;
            if k > 0 && k < n - k {
                real[n - k] = c.re;
                imag[n - k] = -c.im;
            }
        }
        Ok(())
    }

    /// Inverse real FFT
    ///
    /// Reads bins 0..=fft_size/2 of `real` (and `imag`, or zero when absent)
    /// and writes `fft_size` time-domain samples scaled by 1/fft_size.
    pub fn inverse_real(&mut self, real: &[f32], imag: Option<&[f32]>, output: &mut [f32]) -> Result<()> {
        let n = self.fft_size;
        let last = self.spectrum_buffer.len() - 1;

        for (k, c) in self.spectrum_buffer.iter_mut().enumerate() {
            let im = match imag {
                // DC and Nyquist of a real signal carry no imaginary part
                Some(imag) if k != 0 && k != last => imag[k],
                _ => 0.0,
            };
            *c = Complex::new(real[k], im);
        }

        self.c2r.process_with_scratch(
            &mut self.spectrum_buffer,
            &mut output[..n],
            &mut self.inverse_scratch,
        )?;

        let scale = 1.0 / n as f32;
        for o in output[..n].iter_mut() {
            *o *= scale;
        }
        Ok(())
    }
}
