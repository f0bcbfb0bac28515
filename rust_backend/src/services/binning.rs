//! Log-scale 2-D histogram of separation pairs.
//!
//! Both axes share one transform derived from the union of the two gap
//! columns, so the grid diagonal always means "gap before == gap after".
//!
//! ## Edge cases
//! - All gaps identical: the log range is zero, the scale is zero and every
//!   pair lands in bin (0, 0).
//! - Float drift at the top of the range is clamped into `[0, side - 1]`.

use serde::Serialize;

use crate::core::domain::{LogScale, SeparationPair};
use crate::error::{TimeMapError, TimeMapResult};

/// Square grid of bin counts, indexed `(bin_x, bin_y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountGrid {
    side: usize,
    counts: Vec<u32>,
}

impl CountGrid {
    pub fn zeros(side: usize) -> Self {
        Self {
            side,
            counts: vec![0; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.side + y
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.side || y >= self.side {
            return None;
        }
        Some(self.counts[self.index(x, y)])
    }

    pub fn increment(&mut self, x: usize, y: usize) {
        let idx = self.index(x, y);
        self.counts[idx] += 1;
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Counts in `(x, y)` order, flattened with `y` varying fastest.
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    /// Nested copy of the grid, `rows()[x][y]`.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        if self.side == 0 {
            return Vec::new();
        }
        self.counts.chunks(self.side).map(|r| r.to_vec()).collect()
    }
}

/// Binned counts plus the transform that produced them.
///
/// The tick planner must reuse `scale` verbatim so tick coordinates agree
/// with bin coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedGrid {
    pub grid: CountGrid,
    pub scale: LogScale,
    /// Smallest and largest gap in seconds across both columns.
    pub range_secs: (f64, f64),
}

/// Maps separation pairs onto a fixed-size log-scale grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogGridBinner {
    side: usize,
}

impl LogGridBinner {
    pub fn new(side: usize) -> TimeMapResult<Self> {
        if side == 0 {
            return Err(TimeMapError::InvalidConfig(
                "grid side must be at least 1".to_string(),
            ));
        }
        Ok(Self { side })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Bin every pair into the grid.
    ///
    /// ## Errors
    /// - `InsufficientData` when `pairs` is empty
    /// - `NonPositiveSeparation` when a gap is zero, negative or not finite
    pub fn bin(&self, pairs: &[SeparationPair]) -> TimeMapResult<BinnedGrid> {
        if pairs.is_empty() {
            return Err(TimeMapError::InsufficientData { count: 0 });
        }

        let mut min_secs = f64::MAX;
        let mut max_secs = f64::MIN;
        for pair in pairs {
            for v in [pair.before.value(), pair.after.value()] {
                if !v.is_finite() || v <= 0.0 {
                    return Err(TimeMapError::NonPositiveSeparation(v));
                }
                min_secs = min_secs.min(v);
                max_secs = max_secs.max(v);
            }
        }

        let scale = LogScale::from_range(min_secs, max_secs, self.side);
        if scale.is_degenerate() && self.side > 1 {
            log::warn!(
                "All {} separations equal {}s; every pair maps to bin (0, 0)",
                pairs.len(),
                min_secs
            );
        }

        let mut grid = CountGrid::zeros(self.side);
        for pair in pairs {
            let x = scale.bin(pair.before.value());
            let y = scale.bin(pair.after.value());
            grid.increment(x, y);
        }

        log::debug!(
            "Binned {} pairs into {}x{} grid (min_val={:.4}, scale={:.4})",
            pairs.len(),
            self.side,
            self.side,
            scale.min_val,
            scale.scale
        );

        Ok(BinnedGrid {
            grid,
            scale,
            range_secs: (min_secs, max_secs),
        })
    }
}
