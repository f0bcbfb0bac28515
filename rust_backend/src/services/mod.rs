//! Numerical stages of the time map.
//!
//! Each service is a pure function of its inputs: the extractor turns event
//! instants into separation pairs, the binner histograms them on a shared log
//! scale, the smoother blurs the histogram and the tick planner labels the
//! axes with the same transform the binner used.

pub mod binning;
pub mod separations;
pub mod smoothing;
pub mod stats;
pub mod ticks;

pub use binning::{BinnedGrid, CountGrid, LogGridBinner};
pub use separations::{consecutive_gaps, SeparationExtractor};
pub use smoothing::{gaussian_kernel, DensityGrid, DensitySmoother};
pub use stats::{compute_stats, SeparationStats};
pub use ticks::{default_canonical_ticks, CanonicalTick, LogTickPlanner, TickSpace};
