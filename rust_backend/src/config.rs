//! Time map configuration.
//!
//! Every tunable constant of the pipeline lives here: the grid resolution,
//! the blur width, the timezone normalisation, the timestamp format, the
//! time-of-day convention and the canonical tick table. Values can be built
//! in code or read from TOML; omitted keys fall back to their defaults.
//!
//! ```toml
//! grid_side = 512
//! blur_width = 6.0
//! timezone_shift_hours = 5
//! time_of_day = "since_midnight"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{TimeMapError, TimeMapResult};
use crate::services::ticks::{default_canonical_ticks, CanonicalTick};
use crate::time::clock::TimeOfDayConvention;

/// Timestamp layout of the timeline API's `created_at` field,
/// e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const TIMELINE_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMapConfig {
    /// Number of bins along each axis of the density grid.
    #[serde(default = "default_grid_side")]
    pub grid_side: usize,
    /// Standard deviation of the Gaussian blur, in bins.
    #[serde(default = "default_blur_width")]
    pub blur_width: f64,
    /// Hours subtracted from UTC before computing time of day.
    #[serde(default = "default_timezone_shift_hours")]
    pub timezone_shift_hours: i64,
    /// chrono format string used to parse record timestamps.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default)]
    pub time_of_day: TimeOfDayConvention,
    #[serde(default = "default_canonical_ticks")]
    pub canonical_ticks: Vec<CanonicalTick>,
    /// When set, only pairs whose gaps both exceed this many seconds are kept.
    #[serde(default)]
    pub min_separation_secs: Option<f64>,
}

fn default_grid_side() -> usize {
    1024
}

fn default_blur_width() -> f64 {
    4.0
}

fn default_timezone_shift_hours() -> i64 {
    4
}

fn default_timestamp_format() -> String {
    TIMELINE_TIMESTAMP_FORMAT.to_string()
}

impl Default for TimeMapConfig {
    fn default() -> Self {
        Self {
            grid_side: default_grid_side(),
            blur_width: default_blur_width(),
            timezone_shift_hours: default_timezone_shift_hours(),
            timestamp_format: default_timestamp_format(),
            time_of_day: TimeOfDayConvention::default(),
            canonical_ticks: default_canonical_ticks(),
            min_separation_secs: None,
        }
    }
}

impl TimeMapConfig {
    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(content: &str) -> TimeMapResult<Self> {
        let config: TimeMapConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_grid_side(mut self, grid_side: usize) -> Self {
        self.grid_side = grid_side;
        self
    }

    pub fn with_blur_width(mut self, blur_width: f64) -> Self {
        self.blur_width = blur_width;
        self
    }

    pub fn with_timezone_shift_hours(mut self, hours: i64) -> Self {
        self.timezone_shift_hours = hours;
        self
    }

    pub fn with_time_of_day(mut self, convention: TimeOfDayConvention) -> Self {
        self.time_of_day = convention;
        self
    }

    pub fn with_min_separation_secs(mut self, secs: Option<f64>) -> Self {
        self.min_separation_secs = secs;
        self
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> TimeMapResult<()> {
        if self.grid_side == 0 {
            return Err(TimeMapError::InvalidConfig(
                "grid_side must be at least 1".to_string(),
            ));
        }

        if !self.blur_width.is_finite() || self.blur_width <= 0.0 {
            return Err(TimeMapError::InvalidConfig(format!(
                "blur_width must be a positive number, got {}",
                self.blur_width
            )));
        }

        if !(-24..=24).contains(&self.timezone_shift_hours) {
            return Err(TimeMapError::InvalidConfig(format!(
                "timezone_shift_hours must be within [-24, 24], got {}",
                self.timezone_shift_hours
            )));
        }

        if self.timestamp_format.trim().is_empty() {
            return Err(TimeMapError::InvalidConfig(
                "timestamp_format must not be empty".to_string(),
            ));
        }

        for tick in &self.canonical_ticks {
            let secs = tick.seconds.value();
            if !secs.is_finite() || secs <= 0.0 {
                return Err(TimeMapError::InvalidConfig(format!(
                    "canonical tick '{}' must have a positive value, got {}",
                    tick.label, secs
                )));
            }
        }

        let increasing = self
            .canonical_ticks
            .windows(2)
            .all(|w| w[0].seconds < w[1].seconds);
        if !increasing {
            return Err(TimeMapError::InvalidConfig(
                "canonical ticks must be strictly increasing".to_string(),
            ));
        }

        if let Some(threshold) = self.min_separation_secs {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(TimeMapError::InvalidConfig(format!(
                    "min_separation_secs must be non-negative, got {}",
                    threshold
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimeMapConfig::default();
        assert_eq!(config.grid_side, 1024);
        assert_eq!(config.blur_width, 4.0);
        assert_eq!(config.timezone_shift_hours, 4);
        assert_eq!(config.canonical_ticks.len(), 7);
        assert_eq!(config.time_of_day, TimeOfDayConvention::UntilMidnight);
        assert!(config.min_separation_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = TimeMapConfig::from_toml_str(
            r#"
            grid_side = 256
            blur_width = 6.0
            time_of_day = "since_midnight"
            "#,
        )
        .unwrap();

        assert_eq!(config.grid_side, 256);
        assert_eq!(config.blur_width, 6.0);
        assert_eq!(config.time_of_day, TimeOfDayConvention::SinceMidnight);
        assert_eq!(config.timezone_shift_hours, 4);
        assert_eq!(config.timestamp_format, TIMELINE_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_from_toml_custom_ticks() {
        let config = TimeMapConfig::from_toml_str(
            r#"
            [[canonical_ticks]]
            seconds = 60.0
            label = "1 min"

            [[canonical_ticks]]
            seconds = 3600.0
            label = "1 hr"
            "#,
        )
        .unwrap();

        assert_eq!(config.canonical_ticks.len(), 2);
        assert_eq!(config.canonical_ticks[1].label, "1 hr");
        assert_eq!(config.canonical_ticks[1].seconds.value(), 3600.0);
    }

    #[test]
    fn test_from_toml_invalid_syntax() {
        let result = TimeMapConfig::from_toml_str("grid_side = ");
        assert!(matches!(result, Err(TimeMapError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_grid() {
        let config = TimeMapConfig::default().with_grid_side(0);
        assert!(matches!(
            config.validate(),
            Err(TimeMapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_blur() {
        assert!(TimeMapConfig::default()
            .with_blur_width(0.0)
            .validate()
            .is_err());
        assert!(TimeMapConfig::default()
            .with_blur_width(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_unsorted_ticks() {
        let mut config = TimeMapConfig::default();
        config.canonical_ticks.swap(1, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let config = TimeMapConfig::default().with_min_separation_secs(Some(-1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_large_shift() {
        let config = TimeMapConfig::default().with_timezone_shift_hours(30);
        assert!(config.validate().is_err());
    }
}
