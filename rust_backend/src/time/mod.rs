//! Wall-clock handling for event timestamps.

pub mod clock;

pub use clock::{
    minutes_since_midnight, shift_timezone, ColorBarPlan, TimeOfDayConvention, MINUTES_PER_DAY,
};
