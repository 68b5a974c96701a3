//! Period aggregation and growth analytics over payment records.

mod buckets;
mod growth;

pub use buckets::{aggregate, latest_bucket, total_revenue};
pub use growth::{average_growth_pct, cagr, growth, GrowthPoint};
