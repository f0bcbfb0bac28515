//! Axis ticks for logarithmic time axes.
//!
//! Ticks are drawn from a fixed table of human-meaningful durations. Only the
//! entries inside the dataset's range are kept, and the range boundaries are
//! always added so the axis spans exactly the data. Boundaries carry empty
//! labels unless they coincide with a canonical duration.
//!
//! Positions are either grid coordinates (heated map, using the binner's
//! [`LogScale`] verbatim) or raw seconds (scatter view, where the plotting
//! surface applies its own log mapping).

use qtty::Seconds;
use serde::{Deserialize, Serialize};

use crate::core::domain::{LogScale, Tick, TickPlan};

/// One entry of the canonical duration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTick {
    pub seconds: Seconds,
    pub label: String,
}

impl CanonicalTick {
    pub fn new(seconds: f64, label: impl Into<String>) -> Self {
        Self {
            seconds: Seconds::new(seconds),
            label: label.into(),
        }
    }
}

/// 1 msec, 1 sec, 10 sec, 10 min, 2 hr, 1 day, 1 week.
pub fn default_canonical_ticks() -> Vec<CanonicalTick> {
    vec![
        CanonicalTick::new(1e-3, "1 msec"),
        CanonicalTick::new(1.0, "1 sec"),
        CanonicalTick::new(10.0, "10 sec"),
        CanonicalTick::new(10.0 * 60.0, "10 min"),
        CanonicalTick::new(2.0 * 3600.0, "2 hr"),
        CanonicalTick::new(24.0 * 3600.0, "1 day"),
        CanonicalTick::new(7.0 * 24.0 * 3600.0, "1 week"),
    ]
}

/// Coordinate space for tick positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickSpace {
    /// Grid coordinates through the binner's transform.
    Grid(LogScale),
    /// Raw seconds for an axis the renderer scales logarithmically itself.
    Seconds,
}

/// Plans ticks from a canonical duration table.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTickPlanner {
    canonical: Vec<CanonicalTick>,
}

impl LogTickPlanner {
    /// `canonical` must be sorted by strictly increasing duration.
    pub fn new(canonical: Vec<CanonicalTick>) -> Self {
        Self { canonical }
    }

    pub fn canonical(&self) -> &[CanonicalTick] {
        &self.canonical
    }

    /// Contiguous run of canonical ticks inside `[min_secs, max_secs]`.
    ///
    /// The lower index is clamped to the table length and the upper index to
    /// the start, so a range lying outside the table (or between two
    /// neighbouring entries) yields an empty slice rather than an error.
    pub fn select(&self, min_secs: f64, max_secs: f64) -> &[CanonicalTick] {
        let lower = self
            .canonical
            .iter()
            .position(|t| t.seconds.value() >= min_secs)
            .unwrap_or(self.canonical.len());
        let upper = self
            .canonical
            .iter()
            .rposition(|t| t.seconds.value() <= max_secs);

        match upper {
            Some(upper) if lower <= upper => &self.canonical[lower..=upper],
            _ => &[],
        }
    }

    /// Whether at least one canonical tick falls inside the range.
    pub fn covers(&self, min_secs: f64, max_secs: f64) -> bool {
        !self.select(min_secs, max_secs).is_empty()
    }

    /// Ordered `(seconds, label)` values: lower boundary, canonical ticks,
    /// upper boundary. A boundary equal to a canonical tick is not repeated.
    pub fn tick_values(&self, min_secs: f64, max_secs: f64) -> Vec<(f64, String)> {
        let selected = self.select(min_secs, max_secs);
        let mut values = Vec::with_capacity(selected.len() + 2);

        if selected.first().map(|t| t.seconds.value()) != Some(min_secs) {
            values.push((min_secs, String::new()));
        }

        values.extend(
            selected
                .iter()
                .map(|t| (t.seconds.value(), t.label.clone())),
        );

        if values.last().map(|(v, _)| *v) != Some(max_secs) {
            values.push((max_secs, String::new()));
        }

        values
    }

    /// Full tick plan in the requested coordinate space.
    pub fn plan(&self, min_secs: f64, max_secs: f64, space: TickSpace) -> TickPlan {
        let ticks = self
            .tick_values(min_secs, max_secs)
            .into_iter()
            .map(|(secs, label)| {
                let position = match space {
                    TickSpace::Grid(scale) => scale.coordinate(secs),
                    TickSpace::Seconds => secs,
                };
                Tick::new(position, label)
            })
            .collect();

        TickPlan::new(ticks)
    }
}

impl Default for LogTickPlanner {
    fn default() -> Self {
        Self::new(default_canonical_ticks())
    }
}
