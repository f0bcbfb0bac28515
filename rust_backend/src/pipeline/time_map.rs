use qtty::{Minutes, Seconds};
use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};

use crate::config::TimeMapConfig;
use crate::core::domain::{LogScale, Separations, TickPlan};
use crate::error::{TimeMapError, TimeMapResult};
use crate::parsing::timeline_parser::{
    parse_record_timestamps, parse_timeline_json_str, TimelineRecord,
};
use crate::services::binning::LogGridBinner;
use crate::services::separations::SeparationExtractor;
use crate::services::smoothing::{DensityGrid, DensitySmoother};
use crate::services::stats::SeparationStats;
use crate::services::ticks::{LogTickPlanner, TickSpace};
use crate::time::clock::ColorBarPlan;

/// Which view to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMapMode {
    /// Smoothed log-scale density grid
    Heated,
    /// Raw point cloud colored by time of day
    Scatter,
}

impl TimeMapMode {
    pub fn from_heated(heated: bool) -> Self {
        if heated {
            TimeMapMode::Heated
        } else {
            TimeMapMode::Scatter
        }
    }
}

/// Non-fatal conditions met while building a map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeMapWarning {
    /// Every separation has the same value; the grid collapses to one bin.
    DegenerateRange { seconds: f64 },
    /// No canonical duration lies inside the data range; only boundary
    /// ticks are emitted.
    OutsideCanonicalRange { min_secs: f64, max_secs: f64 },
}

/// Heated view: smoothed grid plus matching axis ticks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatedTimeMap {
    /// Display-oriented grid: row is gap after, column is gap before.
    pub grid: DensityGrid,
    pub scale: LogScale,
    pub x_ticks: TickPlan,
    pub y_ticks: TickPlan,
    pub pair_count: usize,
    pub stats: SeparationStats,
    pub warnings: Vec<TimeMapWarning>,
}

/// One point of the scatter view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub gap_before: Seconds,
    pub gap_after: Seconds,
    pub time_of_day: Minutes,
}

/// Scatter view: points, color channel and raw-seconds ticks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTimeMap {
    pub points: Vec<ScatterPoint>,
    /// Point indices sorted by time-of-day value, so the highest color values draw on top.
    pub draw_order: Vec<usize>,
    /// Shared limits of both log axes, in seconds.
    pub axis_limits: (f64, f64),
    pub x_ticks: TickPlan,
    pub y_ticks: TickPlan,
    pub color_bar: ColorBarPlan,
    pub stats: SeparationStats,
    pub warnings: Vec<TimeMapWarning>,
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeMapOutput {
    Heated(HeatedTimeMap),
    Scatter(ScatterTimeMap),
}

impl TimeMapOutput {
    pub fn mode(&self) -> TimeMapMode {
        match self {
            TimeMapOutput::Heated(_) => TimeMapMode::Heated,
            TimeMapOutput::Scatter(_) => TimeMapMode::Scatter,
        }
    }

    pub fn as_heated(&self) -> Option<&HeatedTimeMap> {
        match self {
            TimeMapOutput::Heated(map) => Some(map),
            TimeMapOutput::Scatter(_) => None,
        }
    }

    pub fn as_scatter(&self) -> Option<&ScatterTimeMap> {
        match self {
            TimeMapOutput::Scatter(map) => Some(map),
            TimeMapOutput::Heated(_) => None,
        }
    }

    pub fn warnings(&self) -> &[TimeMapWarning] {
        match self {
            TimeMapOutput::Heated(map) => &map.warnings,
            TimeMapOutput::Scatter(map) => &map.warnings,
        }
    }
}

/// Main time map pipeline
pub struct TimeMapPipeline {
    config: TimeMapConfig,
}

impl TimeMapPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: TimeMapConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: TimeMapConfig) -> TimeMapResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TimeMapConfig {
        &self.config
    }

    /// Parse a JSON timeline payload and build the requested view
    pub fn run_json_str(
        &self,
        json_str: &str,
        mode: TimeMapMode,
    ) -> TimeMapResult<TimeMapOutput> {
        let records = parse_timeline_json_str(json_str)?;
        self.run_records(&records, mode)
    }

    /// Build the requested view from timeline records
    pub fn run_records(
        &self,
        records: &[TimelineRecord],
        mode: TimeMapMode,
    ) -> TimeMapResult<TimeMapOutput> {
        log::info!(
            "Building {:?} time map from {} records",
            mode,
            records.len()
        );
        let instants = parse_record_timestamps(records, &self.config.timestamp_format)?;
        self.run(&instants, mode)
    }

    /// Build the requested view from event instants in any order
    pub fn run(
        &self,
        instants: &[DateTime<Utc>],
        mode: TimeMapMode,
    ) -> TimeMapResult<TimeMapOutput> {
        // Step 1: Extract separations
        let separations = self.extract(instants)?;

        // Step 2: Branch on the requested view
        match mode {
            TimeMapMode::Heated => self.heated(&separations).map(TimeMapOutput::Heated),
            TimeMapMode::Scatter => self.scatter(&separations).map(TimeMapOutput::Scatter),
        }
    }

    /// Extract separations and apply the optional gap threshold
    pub fn extract(&self, instants: &[DateTime<Utc>]) -> TimeMapResult<Separations> {
        let separations = SeparationExtractor::from_config(&self.config).extract(instants)?;

        let Some(threshold) = self.config.min_separation_secs else {
            return Ok(separations);
        };

        let kept = separations.retain_above(Seconds::new(threshold));
        log::debug!(
            "Kept {} of {} pairs above {}s",
            kept.len(),
            separations.len(),
            threshold
        );

        if kept.is_empty() {
            log::warn!("No separation pair exceeds {}s", threshold);
            return Err(TimeMapError::InsufficientData { count: 0 });
        }
        Ok(kept)
    }

    /// Build the heated view from already extracted separations
    pub fn heated(&self, separations: &Separations) -> TimeMapResult<HeatedTimeMap> {
        let binner = LogGridBinner::new(self.config.grid_side)?;
        let smoother = DensitySmoother::new(self.config.blur_width)?;
        let planner = self.planner();

        let binned = binner.bin(&separations.pairs)?;
        let (min_secs, max_secs) = binned.range_secs;
        let grid = smoother.smooth(&binned.grid);

        let x_ticks = planner.plan(min_secs, max_secs, TickSpace::Grid(binned.scale));
        let y_ticks = x_ticks.clone();

        let warnings = self.range_warnings(&planner, min_secs, max_secs);

        Ok(HeatedTimeMap {
            grid,
            scale: binned.scale,
            x_ticks,
            y_ticks,
            pair_count: separations.len(),
            stats: SeparationStats::from_separations(separations),
            warnings,
        })
    }

    /// Build the scatter view from already extracted separations
    pub fn scatter(&self, separations: &Separations) -> TimeMapResult<ScatterTimeMap> {
        let (min_secs, max_secs) = separations
            .range()
            .ok_or(TimeMapError::InsufficientData { count: 0 })?;
        let planner = self.planner();

        let points: Vec<ScatterPoint> = separations
            .pairs
            .iter()
            .zip(separations.time_of_day.iter())
            .map(|(pair, tod)| ScatterPoint {
                gap_before: pair.before,
                gap_after: pair.after,
                time_of_day: *tod,
            })
            .collect();

        let mut draw_order: Vec<usize> = (0..points.len()).collect();
        draw_order.sort_by(|&a, &b| {
            points[a]
                .time_of_day
                .value()
                .total_cmp(&points[b].time_of_day.value())
        });

        let x_ticks = planner.plan(min_secs, max_secs, TickSpace::Seconds);
        let y_ticks = x_ticks.clone();

        let warnings = self.range_warnings(&planner, min_secs, max_secs);

        Ok(ScatterTimeMap {
            points,
            draw_order,
            axis_limits: (min_secs, max_secs),
            x_ticks,
            y_ticks,
            color_bar: self.config.time_of_day.color_bar(),
            stats: SeparationStats::from_separations(separations),
            warnings,
        })
    }

    fn planner(&self) -> LogTickPlanner {
        LogTickPlanner::new(self.config.canonical_ticks.clone())
    }

    fn range_warnings(
        &self,
        planner: &LogTickPlanner,
        min_secs: f64,
        max_secs: f64,
    ) -> Vec<TimeMapWarning> {
        let mut warnings = Vec::new();

        if min_secs == max_secs {
            log::warn!("All separations equal {}s", min_secs);
            warnings.push(TimeMapWarning::DegenerateRange { seconds: min_secs });
        }

        if !planner.covers(min_secs, max_secs) {
            log::warn!(
                "No canonical tick inside [{}s, {}s]; using boundary ticks only",
                min_secs,
                max_secs
            );
            warnings.push(TimeMapWarning::OutsideCanonicalRange { min_secs, max_secs });
        }

        warnings
    }
}

impl Default for TimeMapPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to build a time map with the default configuration
pub fn build_time_map(instants: &[DateTime<Utc>], heated: bool) -> TimeMapResult<TimeMapOutput> {
    TimeMapPipeline::new().run(instants, TimeMapMode::from_heated(heated))
}
