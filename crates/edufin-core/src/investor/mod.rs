//! Forward projection and investor valuation.

mod projection;
mod valuation;

pub use projection::{build_projection, ProjectionInput, ProjectionRow, MAX_PROJECTION_YEARS};
pub use valuation::{valuate, InvestorInput, InvestorOutcome};
