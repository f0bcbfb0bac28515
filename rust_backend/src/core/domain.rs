//! Domain models for event separations, log scales and tick plans.
//!
//! These are the plain data structures that flow between the extractor, the
//! binner, the smoother and the tick planner. They carry no behaviour beyond
//! simple accessors and the shared log-scale transform.

use qtty::{Minutes, Seconds};
use serde::Serialize;

/// Gap before and gap after one interior event.
///
/// Both components are strictly positive once produced by the extractor:
/// zero-second gaps are coerced to one second before pairing.
///
/// # Examples
///
/// ```
/// use timemap::core::domain::SeparationPair;
///
/// let pair = SeparationPair::from_secs(10.0, 1.0);
/// assert_eq!(pair.before.value(), 10.0);
/// assert_eq!(pair.after.value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeparationPair {
    pub before: Seconds,
    pub after: Seconds,
}

impl SeparationPair {
    pub fn new(before: Seconds, after: Seconds) -> Self {
        Self { before, after }
    }

    pub fn from_secs(before: f64, after: f64) -> Self {
        Self::new(Seconds::new(before), Seconds::new(after))
    }
}

/// Separation pairs and the time-of-day of the event each pair belongs to.
///
/// `pairs[k]` and `time_of_day[k]` always describe the same interior event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Separations {
    pub pairs: Vec<SeparationPair>,
    pub time_of_day: Vec<Minutes>,
}

impl Separations {
    pub fn new(pairs: Vec<SeparationPair>, time_of_day: Vec<Minutes>) -> Self {
        debug_assert_eq!(pairs.len(), time_of_day.len());
        Self { pairs, time_of_day }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every gap value in seconds, both columns.
    pub fn all_gaps(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs
            .iter()
            .flat_map(|p| [p.before.value(), p.after.value()])
    }

    /// Minimum and maximum over the union of both gap columns.
    ///
    /// Returns `None` when there are no pairs.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.all_gaps().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Keep only the pairs whose gaps both exceed `threshold`, preserving
    /// the pair/time-of-day alignment.
    pub fn retain_above(&self, threshold: Seconds) -> Separations {
        let (pairs, time_of_day) = self
            .pairs
            .iter()
            .zip(self.time_of_day.iter())
            .filter(|(p, _)| p.before > threshold && p.after > threshold)
            .map(|(p, t)| (*p, *t))
            .unzip();

        Separations { pairs, time_of_day }
    }
}

/// Shared affine transform from log-seconds to grid coordinates.
///
/// Both grid axes use the same transform so that equal gaps land on equal
/// coordinates regardless of column. `scale` is zero when every gap is
/// identical, which maps every value to coordinate 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogScale {
    /// Natural log of the smallest gap.
    pub min_val: f64,
    /// Natural log of the largest gap.
    pub max_val: f64,
    pub scale: f64,
    pub side: usize,
}

impl LogScale {
    /// Derive the transform from the dataset's real (not logged) range.
    pub fn from_range(min_secs: f64, max_secs: f64, side: usize) -> Self {
        let min_val = min_secs.ln();
        let max_val = max_secs.ln();
        let range_val = max_val - min_val;
        let scale = if range_val > 0.0 {
            side.saturating_sub(1) as f64 / range_val
        } else {
            0.0
        };

        Self {
            min_val,
            max_val,
            scale,
            side,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.scale == 0.0
    }

    /// Largest valid coordinate along either axis.
    pub fn max_coordinate(&self) -> f64 {
        self.side.saturating_sub(1) as f64
    }

    /// Continuous grid coordinate of a value in seconds, clamped to the grid.
    ///
    /// The dataset maximum maps to exactly `side - 1`, whatever the rounding
    /// of the multiplication.
    pub fn coordinate(&self, secs: f64) -> f64 {
        let logged = secs.ln();
        if self.scale > 0.0 && logged >= self.max_val {
            return self.max_coordinate();
        }
        let raw = (logged - self.min_val) * self.scale;
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, self.max_coordinate())
    }

    /// Integer bin index of a value in seconds.
    pub fn bin(&self, secs: f64) -> usize {
        self.coordinate(secs).floor() as usize
    }
}

/// A single axis tick: position plus label.
///
/// The position is a grid coordinate for the heated map and raw seconds for
/// the scatter axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

impl Tick {
    pub fn new(position: f64, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}

/// Ordered list of ticks for one axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickPlan {
    pub ticks: Vec<Tick>,
}

impl TickPlan {
    pub fn new(ticks: Vec<Tick>) -> Self {
        Self { ticks }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.ticks.iter().map(|t| t.position).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|t| t.label.as_str()).collect()
    }
}
