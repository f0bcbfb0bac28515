//! Timezone normalisation and time-of-day scalars.
//!
//! Event times arrive in UTC. They are shifted by a fixed number of hours
//! and reduced to minutes within the day, which drives the color channel of
//! the scatter view. Two conventions exist: plain minutes since midnight, and
//! minutes remaining until midnight (the historical display, whose color bar
//! is drawn inverted).

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike, Utc};
use qtty::Minutes;
use serde::{Deserialize, Serialize};

use crate::core::domain::{Tick, TickPlan};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// How the time-of-day scalar is derived from the local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDayConvention {
    /// `hour * 60 + minute`.
    SinceMidnight,
    /// `1440 - (hour * 60 + minute)`, with midnight itself mapped to 0.
    #[default]
    UntilMidnight,
}

impl TimeOfDayConvention {
    /// Time-of-day scalar for a local timestamp, in [0, 1440).
    pub fn minutes(self, local: &NaiveDateTime) -> Minutes {
        let since = minutes_since_midnight(local);
        let value = match self {
            TimeOfDayConvention::SinceMidnight => since,
            TimeOfDayConvention::UntilMidnight => (MINUTES_PER_DAY - since) % MINUTES_PER_DAY,
        };
        Minutes::new(value as f64)
    }

    /// Color-bar ticks over [0, 1440] labelled for this convention.
    pub fn color_bar(self) -> ColorBarPlan {
        let labels = match self {
            TimeOfDayConvention::SinceMidnight => ["Midnight", "6:00", "Noon", "18:00", "Midnight"],
            TimeOfDayConvention::UntilMidnight => ["Midnight", "18:00", "Noon", "6:00", "Midnight"],
        };

        let step = (MINUTES_PER_DAY / 4) as f64;
        let ticks = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Tick::new(i as f64 * step, *label))
            .collect();

        ColorBarPlan {
            min: 0.0,
            max: MINUTES_PER_DAY as f64,
            ticks: TickPlan::new(ticks),
            inverted: self == TimeOfDayConvention::UntilMidnight,
        }
    }
}

/// Color-bar layout handed to the renderer alongside the scatter points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBarPlan {
    pub min: f64,
    pub max: f64,
    pub ticks: TickPlan,
    /// Draw the bar right-to-left so labels read Midnight, 6:00, Noon, 18:00.
    pub inverted: bool,
}

/// Shift a UTC instant into local wall-clock time by subtracting `hours`.
pub fn shift_timezone(instant: &DateTime<Utc>, hours: i64) -> NaiveDateTime {
    (*instant - TimeDelta::hours(hours)).naive_utc()
}

pub fn minutes_since_midnight(local: &NaiveDateTime) -> u32 {
    local.hour() * 60 + local.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 10, 10, h, m, s).unwrap()
    }

    #[test]
    fn test_shift_timezone_crosses_midnight() {
        let local = shift_timezone(&utc(2, 30, 0), 4);
        assert_eq!(local.hour(), 22);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn test_negative_shift_moves_forward() {
        let local = shift_timezone(&utc(10, 0, 0), -2);
        assert_eq!(local.hour(), 12);
    }

    #[test]
    fn test_since_midnight() {
        let local = shift_timezone(&utc(13, 45, 59), 0);
        let value = TimeOfDayConvention::SinceMidnight.minutes(&local);
        assert_eq!(value.value(), 13.0 * 60.0 + 45.0);
    }

    #[test]
    fn test_until_midnight() {
        let local = shift_timezone(&utc(18, 0, 0), 0);
        let value = TimeOfDayConvention::UntilMidnight.minutes(&local);
        assert_eq!(value.value(), 360.0);
    }

    #[test]
    fn test_until_midnight_at_midnight_is_zero() {
        let local = shift_timezone(&utc(0, 0, 30), 0);
        let value = TimeOfDayConvention::UntilMidnight.minutes(&local);
        assert_eq!(value.value(), 0.0);
    }

    #[test]
    fn test_color_bar_since_midnight() {
        let bar = TimeOfDayConvention::SinceMidnight.color_bar();
        assert_eq!(bar.ticks.positions(), vec![0.0, 360.0, 720.0, 1080.0, 1440.0]);
        assert_eq!(
            bar.ticks.labels(),
            vec!["Midnight", "6:00", "Noon", "18:00", "Midnight"]
        );
        assert!(!bar.inverted);
    }

    #[test]
    fn test_color_bar_until_midnight_matches_values() {
        let bar = TimeOfDayConvention::UntilMidnight.color_bar();
        assert!(bar.inverted);

        // 18:00 local maps to 360, which must carry the 18:00 label
        let local = shift_timezone(&utc(18, 0, 0), 0);
        let value = TimeOfDayConvention::UntilMidnight.minutes(&local).value();
        let tick = bar.ticks.ticks.iter().find(|t| t.position == value).unwrap();
        assert_eq!(tick.label, "18:00");
    }
}
