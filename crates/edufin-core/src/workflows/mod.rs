//! One-pass dashboard pipeline over a loaded dataset.

mod dashboard;

pub use dashboard::{run_dashboard, AnalysisReport, DashboardConfig, RevenueTables};
