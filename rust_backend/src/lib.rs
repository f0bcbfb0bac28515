//! Time map construction for event streams.
//!
//! Turns a sequence of event timestamps into the data behind two views of
//! posting rhythm: a scatter of consecutive gaps (gap before vs gap after,
//! colored by time of day) and a smoothed, log-scaled density grid of the
//! same gaps with axis ticks that line up with the grid.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use timemap::config::TimeMapConfig;
//! use timemap::pipeline::{TimeMapMode, TimeMapPipeline};
//!
//! let start = Utc.with_ymd_and_hms(2018, 10, 10, 12, 0, 0).unwrap();
//! let events: Vec<_> = [0, 10, 10, 40, 7200]
//!     .iter()
//!     .map(|s| start + TimeDelta::seconds(*s))
//!     .collect();
//!
//! let pipeline = TimeMapPipeline::with_config(TimeMapConfig::default().with_grid_side(64))
//!     .unwrap();
//! let output = pipeline.run(&events, TimeMapMode::Heated).unwrap();
//! assert_eq!(output.as_heated().unwrap().pair_count, 3);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod pipeline;
pub mod services;
pub mod time;

pub use config::TimeMapConfig;
pub use error::{TimeMapError, TimeMapResult};
pub use pipeline::{TimeMapMode, TimeMapOutput, TimeMapPipeline};
