pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "aggregation")]
pub mod aggregation;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "investor")]
pub mod investor;

#[cfg(feature = "insights")]
pub mod insights;

#[cfg(feature = "dataset")]
pub mod dataset;

#[cfg(feature = "workflows")]
pub mod workflows;

pub use error::EduFinError;
pub use types::*;

/// Standard result type for all edufin operations
pub type EduFinResult<T> = Result<T, EduFinError>;
