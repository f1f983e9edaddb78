//! Four-point cubic interpolation
//!
//! Given f(0)=y0, f(1)=y1, f(2)=y2 and f(3)=y3 there is exactly one cubic
//! through the points. It is used both to read the curve between bins and
//! to locate a peak with sub-bin precision.

/// Cubic a·x³ + b·x² + c·x + d through four equally spaced samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

/// Location and height of a cubic's local maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPeak {
    /// Position relative to the first sample (nominally 0..3)
    pub x: f32,
    pub value: f32,
}

impl Cubic {
    /// Fit the cubic through samples at x = 0, 1, 2, 3
    pub fn fit(y0: f32, y1: f32, y2: f32, y3: f32) -> Self {
        let (y0, y1, y2, y3) = (y0 as f64, y1 as f64, y2 as f64, y3 as f64);

        // Rounding residue from the thirds and sixths, relative to the input
        let tolerance = y0.abs().max(y1.abs()).max(y2.abs()).max(y3.abs()) * 1e-12;
        let snap = |v: f64| if v.abs() <= tolerance { 0.0 } else { v };

        Self {
            a: snap(y0 / -6.0 + y1 / 2.0 - y2 / 2.0 + y3 / 6.0),
            b: snap(y0 - 5.0 * y1 / 2.0 + 2.0 * y2 - y3 / 2.0),
            c: snap(-11.0 * y0 / 6.0 + 3.0 * y1 - 3.0 * y2 / 2.0 + y3 / 3.0),
            d: y0,
        }
    }

    /// Evaluate at `x`
    pub fn eval(&self, x: f64) -> f64 {
        ((self.a * x + self.b) * x + self.c) * x + self.d
    }

    /// Local maximum of the cubic
    ///
    /// Solves f'(x) = 3a·x² + 2b·x + c = 0 and keeps the root where
    /// f''(x) = 6a·x + 2b is negative. Returns `None` when there is no such
    /// root: negative discriminant, flat or monotone input, or a stationary
    /// point that is only an inflection.
    pub fn maximum(&self) -> Option<CubicPeak> {
        let da = 3.0 * self.a;
        let db = 2.0 * self.b;
        let dc = self.c;

        let x = if da == 0.0 {
            // Quadratic: a single turning point, a maximum only if b < 0
            if db >= 0.0 {
                return None;
            }
            -dc / db
        } else {
            let discriminant = db * db - 4.0 * da * dc;
            if discriminant < 0.0 {
                return None;
            }

            // Cancellation-free form of the quadratic formula
            let q = -0.5 * (db + db.signum() * discriminant.sqrt());
            let x1 = q / da;
            let x2 = if q != 0.0 { dc / q } else { x1 };

            if 2.0 * da * x1 + db < 0.0 {
                x1
            } else if 2.0 * da * x2 + db < 0.0 {
                x2
            } else {
                return None;
            }
        };

        Some(CubicPeak {
            x: x as f32,
            value: self.eval(x) as f32,
        })
    }
}

/// Value at `x` of the cubic through (0, y0), (1, y1), (2, y2), (3, y3)
///
/// `x` is not clamped; values outside 0..3 extrapolate.
pub fn interpolate(y0: f32, y1: f32, y2: f32, y3: f32, x: f32) -> f32 {
    Cubic::fit(y0, y1, y2, y3).eval(x as f64) as f32
}

/// Local maximum of the cubic through four samples, if it has one
pub fn maximize(y0: f32, y1: f32, y2: f32, y3: f32) -> Option<CubicPeak> {
    Cubic::fit(y0, y1, y2, y3).maximum()
}
