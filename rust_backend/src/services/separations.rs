//! Event separation extraction.
//!
//! Turns a sequence of event instants into gap-before/gap-after pairs, one per
//! interior event, plus the time-of-day of each of those events.
//!
//! ## Alignment
//! For chronologically sorted instants `t[0..n]` the gaps are
//! `gap[i] = t[i+1] - t[i]` for `i in 0..n-1`. Interior event `j` (for
//! `j in 1..n-1`) gets the pair `(gap[j-1], gap[j])` and the time of day of
//! `t[j]`. The first and last events never produce a pair.

use chrono::{DateTime, Utc};
use qtty::{Minutes, Seconds};

use crate::config::TimeMapConfig;
use crate::core::domain::{SeparationPair, Separations};
use crate::error::{TimeMapError, TimeMapResult};
use crate::time::clock::{shift_timezone, TimeOfDayConvention};

/// Fewest events that still yield one separation pair.
pub const MIN_EVENTS: usize = 3;

/// Gap substituted for a zero-second separation, so its logarithm is defined.
pub const ZERO_GAP_REPLACEMENT_SECS: f64 = 1.0;

/// Builds [`Separations`] from event instants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationExtractor {
    timezone_shift_hours: i64,
    convention: TimeOfDayConvention,
}

impl SeparationExtractor {
    pub fn new(timezone_shift_hours: i64, convention: TimeOfDayConvention) -> Self {
        Self {
            timezone_shift_hours,
            convention,
        }
    }

    pub fn from_config(config: &TimeMapConfig) -> Self {
        Self::new(config.timezone_shift_hours, config.time_of_day)
    }

    /// Extract separation pairs and time-of-day scalars.
    ///
    /// Instants may arrive in any order (timelines are usually newest first);
    /// they are sorted oldest first before differencing.
    ///
    /// ## Errors
    /// `InsufficientData` when fewer than three instants are supplied.
    pub fn extract(&self, instants: &[DateTime<Utc>]) -> TimeMapResult<Separations> {
        if instants.len() < MIN_EVENTS {
            return Err(TimeMapError::InsufficientData {
                count: instants.len(),
            });
        }

        let mut ordered = instants.to_vec();
        ordered.sort();

        let gaps = consecutive_gaps(&ordered);

        let pairs: Vec<SeparationPair> = gaps
            .windows(2)
            .map(|w| SeparationPair::new(w[0], w[1]))
            .collect();

        let time_of_day: Vec<Minutes> = ordered[1..ordered.len() - 1]
            .iter()
            .map(|t| {
                let local = shift_timezone(t, self.timezone_shift_hours);
                self.convention.minutes(&local)
            })
            .collect();

        log::debug!(
            "Extracted {} separation pairs from {} events",
            pairs.len(),
            ordered.len()
        );

        Ok(Separations::new(pairs, time_of_day))
    }
}

impl Default for SeparationExtractor {
    fn default() -> Self {
        Self::from_config(&TimeMapConfig::default())
    }
}

/// Gaps in seconds between consecutive sorted instants, with zero gaps
/// coerced to one second.
pub fn consecutive_gaps(sorted: &[DateTime<Utc>]) -> Vec<Seconds> {
    sorted
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            let secs = match delta.num_nanoseconds() {
                Some(ns) => ns as f64 / 1e9,
                None => delta.num_milliseconds() as f64 / 1000.0,
            };
            if secs == 0.0 {
                Seconds::new(ZERO_GAP_REPLACEMENT_SECS)
            } else {
                Seconds::new(secs)
            }
        })
        .collect()
}
