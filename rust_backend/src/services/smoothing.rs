//! Gaussian smoothing of the binned grid.
//!
//! The count grid is blurred with a separable, isotropic Gaussian, compressed
//! with an element-wise square root and transposed into display orientation
//! (row = gap after, column = gap before), so that an image drawn with a
//! bottom-left origin matches a scatter of the same points.
//!
//! ## Boundary policy
//! Samples outside the grid are read by half-sample symmetric reflection
//! (`d c b a | a b c d | d c b a`). With a normalised symmetric kernel this
//! policy preserves the total mass of the grid exactly, up to rounding.
//!
//! ## Kernel support
//! The kernel is truncated at `truncate * sigma` bins (4 sigma by default),
//! giving `2 * round(4 * sigma) + 1` taps.

use serde::Serialize;

use crate::error::{TimeMapError, TimeMapResult};
use crate::services::binning::CountGrid;

/// Kernel half-width in standard deviations.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// Square grid of real densities.
///
/// Values are stored row-major: `values[row * side + col]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGrid {
    side: usize,
    values: Vec<f64>,
}

impl DensityGrid {
    pub fn from_counts(grid: &CountGrid) -> Self {
        Self {
            side: grid.side(),
            values: grid.as_slice().iter().map(|&c| c as f64).collect(),
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.side || col >= self.side {
            return None;
        }
        Some(self.values[row * self.side + col])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0_f64, f64::max)
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        if self.side == 0 {
            return Vec::new();
        }
        self.values.chunks(self.side).map(|r| r.to_vec()).collect()
    }

    /// Element-wise square root. Monotonic, so bin ranking is unchanged.
    pub fn sqrt(&self) -> Self {
        Self {
            side: self.side,
            values: self.values.iter().map(|v| v.max(0.0).sqrt()).collect(),
        }
    }

    pub fn transpose(&self) -> Self {
        let n = self.side;
        let mut values = vec![0.0; n * n];
        for row in 0..n {
            for col in 0..n {
                values[col * n + row] = self.values[row * n + col];
            }
        }
        Self { side: n, values }
    }
}

/// Separable Gaussian blur followed by square-root compression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensitySmoother {
    sigma: f64,
    truncate: f64,
}

impl DensitySmoother {
    pub fn new(sigma: f64) -> TimeMapResult<Self> {
        Self::with_truncate(sigma, DEFAULT_TRUNCATE)
    }

    pub fn with_truncate(sigma: f64, truncate: f64) -> TimeMapResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(TimeMapError::InvalidConfig(format!(
                "blur width must be positive, got {}",
                sigma
            )));
        }
        if !truncate.is_finite() || truncate <= 0.0 {
            return Err(TimeMapError::InvalidConfig(format!(
                "kernel truncation must be positive, got {}",
                truncate
            )));
        }
        Ok(Self { sigma, truncate })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Normalised 1-D Gaussian kernel for this smoother.
    pub fn kernel(&self) -> Vec<f64> {
        gaussian_kernel(self.sigma, self.truncate)
    }

    /// Blur only; keeps the `(x, y)` orientation of the count grid.
    pub fn blur(&self, grid: &CountGrid) -> DensityGrid {
        let kernel = self.kernel();
        let side = grid.side();
        let input = DensityGrid::from_counts(grid);

        // Along the first index, then along the second
        let pass1 = convolve_axis(&input.values, side, &kernel, Axis::Outer);
        let values = convolve_axis(&pass1, side, &kernel, Axis::Inner);

        DensityGrid { side, values }
    }

    /// Full smoothing: blur, square root, transpose into display orientation.
    pub fn smooth(&self, grid: &CountGrid) -> DensityGrid {
        let blurred = self.blur(grid);
        log::debug!(
            "Blurred {}x{} grid with sigma={} (mass {:.3} -> {:.3})",
            grid.side(),
            grid.side(),
            self.sigma,
            grid.total() as f64,
            blurred.total()
        );
        blurred.sqrt().transpose()
    }
}

/// Build a normalised Gaussian kernel of radius `round(truncate * sigma)`.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as i64;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();

    let sum: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    weights
}

/// Map an out-of-range index back into `[0, n)` by symmetric reflection.
#[inline]
fn reflect_index(i: i64, n: usize) -> usize {
    let n = n as i64;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    /// Varies `x` in `values[x * side + y]`.
    Outer,
    /// Varies `y` in `values[x * side + y]`.
    Inner,
}

fn convolve_axis(values: &[f64], side: usize, kernel: &[f64], axis: Axis) -> Vec<f64> {
    let radius = (kernel.len() / 2) as i64;
    let mut out = vec![0.0; values.len()];

    for fixed in 0..side {
        for moving in 0..side {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let src = reflect_index(moving as i64 + k as i64 - radius, side);
                let idx = match axis {
                    Axis::Outer => src * side + fixed,
                    Axis::Inner => fixed * side + src,
                };
                acc += w * values[idx];
            }
            let dst = match axis {
                Axis::Outer => moving * side + fixed,
                Axis::Inner => fixed * side + moving,
            };
            out[dst] = acc;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(side: usize, points: &[(usize, usize)]) -> CountGrid {
        let mut grid = CountGrid::zeros(side);
        for (x, y) in points {
            grid.increment(*x, *y);
        }
        grid
    }

    #[test]
    fn test_kernel_normalised_and_symmetric() {
        let kernel = gaussian_kernel(4.0, DEFAULT_TRUNCATE);
        assert_eq!(kernel.len(), 33);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() / 2 {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
        assert!(kernel[16] > kernel[15]);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(9, 4), 1);
        assert_eq!(reflect_index(3, 1), 0);
    }

    #[test]
    fn test_blur_preserves_mass_in_corner() {
        let grid = grid_with(16, &[(0, 0), (0, 0), (15, 3), (7, 7)]);
        let blurred = DensitySmoother::new(2.0).unwrap().blur(&grid);
        assert!((blurred.total() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_blur_preserves_mass_when_kernel_exceeds_grid() {
        let grid = grid_with(4, &[(1, 2), (3, 3)]);
        let blurred = DensitySmoother::new(8.0).unwrap().blur(&grid);
        assert!((blurred.total() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_blur_spreads_peak() {
        let grid = grid_with(9, &[(4, 4)]);
        let blurred = DensitySmoother::new(1.0).unwrap().blur(&grid);
        let peak = blurred.get(4, 4).unwrap();
        assert!(peak < 1.0);
        assert!(blurred.get(4, 5).unwrap() > 0.0);
        assert!(blurred.get(4, 5).unwrap() < peak);
        assert!((blurred.get(3, 4).unwrap() - blurred.get(5, 4).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_transposes_to_display_orientation() {
        // Point with small gap before (x=1) and large gap after (y=6)
        let grid = grid_with(8, &[(1, 6)]);
        let smoothed = DensitySmoother::new(0.5).unwrap().smooth(&grid);

        // Row is y, column is x
        let hot = smoothed.get(6, 1).unwrap();
        let mirrored = smoothed.get(1, 6).unwrap();
        assert!(hot > mirrored);
        assert_eq!(smoothed.max(), hot);
    }

    #[test]
    fn test_sqrt_is_monotonic() {
        let grid = grid_with(5, &[(0, 0), (0, 0), (0, 0), (2, 2), (4, 1)]);
        let blurred = DensitySmoother::new(1.0).unwrap().blur(&grid);
        let rooted = blurred.sqrt();
        let before = blurred.as_slice();
        let after = rooted.as_slice();
        for i in 0..before.len() {
            for j in 0..before.len() {
                if before[i] >= before[j] {
                    assert!(after[i] >= after[j]);
                }
            }
        }
    }

    #[test]
    fn test_shape_preserved() {
        let grid = grid_with(6, &[(2, 3)]);
        let smoothed = DensitySmoother::new(1.5).unwrap().smooth(&grid);
        assert_eq!(smoothed.side(), 6);
        assert_eq!(smoothed.as_slice().len(), 36);
        assert!(smoothed.as_slice().iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_invalid_sigma() {
        assert!(DensitySmoother::new(0.0).is_err());
        assert!(DensitySmoother::new(-3.0).is_err());
        assert!(DensitySmoother::with_truncate(2.0, 0.0).is_err());
    }

    #[test]
    fn test_transpose_round_trip() {
        let grid = DensityGrid::from_counts(&grid_with(3, &[(0, 2), (1, 0)]));
        assert_eq!(grid.transpose().transpose(), grid);
        assert_eq!(grid.transpose().get(2, 0), Some(1.0));
    }
}
