//! Parsers for timeline payloads.
//!
//! The retrieval collaborator hands over timeline records as JSON; this module
//! turns them into [`TimelineRecord`]s and their timestamp strings into UTC
//! instants.
//!
//! # Example
//!
//! ```
//! use timemap::parsing::timeline_parser::parse_timeline_json_str;
//!
//! let records = parse_timeline_json_str(
//!     r#"[{"id": 1, "created_at": "Wed Oct 10 20:19:24 +0000 2018"}]"#,
//! )
//! .unwrap();
//! assert_eq!(records.len(), 1);
//! ```

pub mod timeline_parser;


pub use timeline_parser::{
    parse_record_timestamps, parse_timeline_json_str, parse_timestamp, TimelineRecord,
};
