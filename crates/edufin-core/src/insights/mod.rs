//! Threshold-based observations over the computed analytics.

mod rules;

pub use rules::{evaluate, InsightInput, InsightThresholds};
