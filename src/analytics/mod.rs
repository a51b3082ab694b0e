pub mod bertram;
pub mod series;
pub mod sweep;
pub mod thresholds;
