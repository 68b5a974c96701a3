//! Cost, margin and subscription-proxy metrics derived from total revenue.

mod snapshot;
mod unit_economics;

pub use snapshot::{
    compute_snapshot, CostModel, MetricSnapshot, Runway, SnapshotInput,
};
pub use unit_economics::{
    customer_acquisition_cost, recurring_revenue, CacInput, RecurringRevenue,
    DEFAULT_INSTALLMENT_COUNT,
};
