//! File loading utilities.
//!
//! Thin wrappers that read timeline payloads and configuration files from
//! disk, attaching file context to any error.
//!
//! # Example
//!
//! ```no_run
//! use timemap::io::loaders::TimelineLoader;
//! use std::path::Path;
//!
//! let records = TimelineLoader::load_from_file(Path::new("timeline.json"))
//!     .expect("Failed to load");
//! println!("Loaded {} records", records.len());
//! ```

pub mod loaders;


pub use loaders::{ConfigLoader, TimelineLoader, CONFIG_FILE_NAME};
