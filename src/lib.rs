//! Net worth projection over an 80-year horizon, for one scenario or four
//! side-by-side scenarios.

pub mod api;
pub mod core;
