//! Queries against the processed curve
//!
//! Positions are frequencies in Hz for [`Algorithm::Spectrum`] and lags in
//! seconds for every other algorithm.

use std::fmt;

use super::algorithm::Algorithm;
use super::analysis::SpectrumAnalyst;
use super::cubic;

/// Peak located by [`SpectrumAnalyst::find_peak`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Peak {
    /// Frequency (Hz) or lag (s)
    pub position: f32,
    pub value: f32,
}

/// One line of a text export of the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportRow {
    Spectrum { frequency: f64, level: f32 },
    Lag { lag: f64, frequency: f64, level: f32 },
}

impl fmt::Display for ExportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportRow::Spectrum { frequency, level } => write!(f, "{frequency:.6}\t{level:.6}"),
            ExportRow::Lag {
                lag,
                frequency,
                level,
            } => write!(f, "{lag:.6}\t{frequency:.6}\t{level:.6}"),
        }
    }
}

/// Column titles matching [`SpectrumAnalyst::export_rows`]
pub fn export_header(algorithm: Algorithm) -> &'static str {
    if algorithm.is_spectrum() {
        "Frequency (Hz)\tLevel (dB)"
    } else {
        "Lag (seconds)\tFrequency (Hz)\tLevel"
    }
}

impl SpectrumAnalyst {
    /// Number of meaningful curve values, 0 when no curve is stored
    pub fn processed_size(&self) -> usize {
        self.processed.len() / 2
    }

    /// The meaningful half of the curve
    pub fn processed(&self) -> &[f32] {
        &self.processed[..self.processed_size()]
    }

    /// Convert a (fractional) curve index to frequency or lag
    pub fn bin_to_position(&self, bin: f32) -> f32 {
        if self.window_size == 0 {
            return 0.0;
        }
        if self.algorithm.is_spectrum() {
            (bin as f64 * self.sample_rate / self.window_size as f64) as f32
        } else {
            (bin as f64 / self.sample_rate) as f32
        }
    }

    /// Convert a frequency or lag to a fractional curve index
    pub fn position_to_bin(&self, position: f32) -> f32 {
        if self.window_size == 0 {
            return 0.0;
        }
        if self.algorithm.is_spectrum() {
            (position as f64 * self.window_size as f64 / self.sample_rate) as f32
        } else {
            (position as f64 * self.sample_rate) as f32
        }
    }

    /// Natural horizontal extent of the curve
    ///
    /// Spectrum runs from one bin above DC to Nyquist; the lag domains run
    /// from zero to the last lag.
    pub fn x_axis_range(&self) -> (f32, f32) {
        if self.window_size == 0 {
            return (0.0, 0.0);
        }
        if self.algorithm.is_spectrum() {
            (
                (self.sample_rate / self.window_size as f64) as f32,
                (self.sample_rate / 2.0) as f32,
            )
        } else {
            (0.0, (self.processed_size() as f64 / self.sample_rate) as f32)
        }
    }

    /// Curve value over the range `start..end` (Hz or s)
    ///
    /// A range narrower than one bin is read off a cubic through the four
    /// bins around its midpoint. Wider ranges return the bin values
    /// averaged over the range, with partially covered end bins weighted by
    /// their coverage.
    pub fn processed_value(&self, start: f32, end: f32) -> f32 {
        let size = self.processed_size();
        if size < 4 {
            return 0.0;
        }
        let p = self.processed();

        let mut bin0 = self.position_to_bin(start);
        let mut bin1 = self.position_to_bin(end);
        let binwidth = bin1 - bin0;

        if binwidth < 1.0 {
            let binmid = (bin0 + bin1) / 2.0;
            let mut ibin = binmid as i64 - 1;
            if ibin < 1 {
                ibin = 1;
            }
            if ibin >= size as i64 - 3 {
                ibin = (size as i64 - 4).max(0);
            }
            let i = ibin as usize;

            return cubic::interpolate(p[i], p[i + 1], p[i + 2], p[i + 3], binmid - ibin as f32);
        }

        let last = (size - 1) as f32;
        bin0 = bin0.clamp(0.0, last);
        bin1 = bin1.clamp(0.0, last);

        let mut value = 0.0f32;
        if bin1.trunc() > bin0.trunc() {
            value += p[bin0 as usize] * (bin0.trunc() + 1.0 - bin0);
        }
        let mut bin = bin0.trunc() + 1.0;
        while bin < bin1.trunc() {
            value += p[bin as usize];
            bin += 1.0;
        }
        value += p[bin1 as usize] * (bin1 - bin1.trunc());

        value / binwidth
    }

    /// Local maximum of the curve nearest `position` (Hz or s)
    ///
    /// Maxima are visited in increasing order and refined to sub-bin
    /// precision with a cubic fit. The scan stops at the first maximum past
    /// `position`, so the nearest one is searched among maxima up to that
    /// point. Returns a zero peak when the curve has no local maximum.
    pub fn find_peak(&self, position: f32) -> Peak {
        let p = self.processed();
        let size = p.len();
        let mut best = Peak::default();

        if size < 2 {
            return best;
        }

        let mut up = p[1] > p[0];
        let mut best_dist = f32::MAX;

        for bin in 3..size.saturating_sub(1) {
            let now_up = p[bin] > p[bin - 1];
            if !now_up && up {
                let left = bin - 2;
                if let Some(max) = cubic::maximize(p[left], p[left + 1], p[left + 2], p[left + 3]) {
                    let this_peak = self.bin_to_position(left as f32 + max.x);
                    let dist = (this_peak - position).abs();
                    if dist < best_dist {
                        best_dist = dist;
                        best = Peak {
                            position: this_peak,
                            value: max.value,
                        };
                    }
                    if this_peak > position {
                        break;
                    }
                }
            }
            up = now_up;
        }

        best
    }

    /// Curve as export rows, one per bin from 1 up
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let rate = self.sample_rate;
        let window_size = self.window_size as f64;

        self.processed()
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &level)| {
                let i = i as f64;
                if self.algorithm.is_spectrum() {
                    ExportRow::Spectrum {
                        frequency: i * rate / window_size,
                        level,
                    }
                } else {
                    ExportRow::Lag {
                        lag: i / rate,
                        frequency: rate / i,
                        level,
                    }
                }
            })
            .collect()
    }
}
