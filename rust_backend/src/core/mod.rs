//! Core domain models for time maps.
//!
//! This module defines the data structures shared by every stage of the
//! pipeline: separation pairs, the log-scale transform and axis tick plans.

pub mod domain;

pub use domain::{LogScale, SeparationPair, Separations, Tick, TickPlan};
