//! Orchestration of the time map stages.
//!
//! [`TimeMapPipeline`] runs the separation extractor once, then either bins,
//! smooths and labels a heated density grid, or packages the raw pairs with
//! their time-of-day color channel for a scatter plot.

pub mod time_map;

pub use time_map::{
    build_time_map, HeatedTimeMap, ScatterPoint, ScatterTimeMap, TimeMapMode, TimeMapOutput,
    TimeMapPipeline, TimeMapWarning,
};
