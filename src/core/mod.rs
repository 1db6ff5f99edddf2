//! Services consumed by presentation layers, plus the clock abstraction.

pub mod services;
pub mod time;
