//! Ordinary least-squares line fit.

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line through the sample pairs. Needs at least two distinct x values.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let mean_x = xs[..n].iter().sum::<f64>() / nf;
        let mean_y = ys[..n].iter().sum::<f64>() / nf;

        let (mut sxx, mut sxy) = (0.0, 0.0);
        for (x, y) in xs[..n].iter().zip(&ys[..n]) {
            sxx += (x - mean_x) * (x - mean_x);
            sxy += (x - mean_x) * (y - mean_y);
        }
        if sxx.abs() < f64::EPSILON {
            return None;
        }
        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn apply(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Inverse mapping; `None` for a flat line
    pub fn invert(&self, y: f64) -> Option<f64> {
        (self.slope.abs() > f64::EPSILON).then(|| (y - self.intercept) / self.slope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let fit = LinearFit::fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.apply(10.0) - 21.0).abs() < 1e-12);
        assert!((fit.invert(21.0).unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_points() {
        let fit = LinearFit::fit(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 1.0, 2.0]).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate() {
        assert!(LinearFit::fit(&[1.0], &[2.0]).is_none());
        assert!(LinearFit::fit(&[3.0, 3.0], &[1.0, 2.0]).is_none());
    }
}
