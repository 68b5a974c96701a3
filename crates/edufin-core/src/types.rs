use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%), except fields explicitly
/// suffixed `_pct`, which are percentages in [0, 100].
pub type Rate = Decimal;

/// Multiples (e.g., 6x exit EBITDA)
pub type Multiple = Decimal;

/// Calendar bucketing granularity for revenue aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Month,
    Quarter,
    Year,
}

/// Key of one revenue bucket. Ordering within a granularity follows the
/// period start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PeriodKey {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
}

impl PeriodKey {
    /// Derive the bucket key a payment date falls into.
    pub fn from_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Quarter => PeriodKey::Quarter {
                year: date.year(),
                quarter: (date.month() - 1) / 3 + 1,
            },
            Granularity::Year => PeriodKey::Year { year: date.year() },
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            PeriodKey::Month { .. } => Granularity::Month,
            PeriodKey::Quarter { .. } => Granularity::Quarter,
            PeriodKey::Year { .. } => Granularity::Year,
        }
    }

    /// Stable display label: `2024-03`, `2024Q1`, `2024`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Month { year, month } => write!(f, "{year}-{month:02}"),
            PeriodKey::Quarter { year, quarter } => write!(f, "{year}Q{quarter}"),
            PeriodKey::Year { year } => write!(f, "{year}"),
        }
    }
}

/// One cleaned payment row handed over by the loading/mapping boundary.
/// Immutable once built; the engine only derives aggregates from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_date: NaiveDate,
    /// Collected amount; the loader coerces non-numeric values to zero.
    pub collected_amount: Money,
    /// Total program fee, used by the recurring-revenue proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fee: Option<Money>,
    /// Batch / cohort identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

/// Summed revenue for one calendar period. Sequences of buckets are always
/// sorted ascending by period start; missing periods are absent, not zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub period: PeriodKey,
    pub revenue: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_period_key_from_date() {
        let date = d(2024, 8, 17);
        assert_eq!(
            PeriodKey::from_date(date, Granularity::Month),
            PeriodKey::Month { year: 2024, month: 8 }
        );
        assert_eq!(
            PeriodKey::from_date(date, Granularity::Quarter),
            PeriodKey::Quarter { year: 2024, quarter: 3 }
        );
        assert_eq!(
            PeriodKey::from_date(date, Granularity::Year),
            PeriodKey::Year { year: 2024 }
        );
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(
            PeriodKey::from_date(d(2024, 1, 1), Granularity::Quarter),
            PeriodKey::Quarter { year: 2024, quarter: 1 }
        );
        assert_eq!(
            PeriodKey::from_date(d(2024, 3, 31), Granularity::Quarter),
            PeriodKey::Quarter { year: 2024, quarter: 1 }
        );
        assert_eq!(
            PeriodKey::from_date(d(2024, 12, 31), Granularity::Quarter),
            PeriodKey::Quarter { year: 2024, quarter: 4 }
        );
    }

    #[test]
    fn test_period_key_ordering_and_labels() {
        let nov = PeriodKey::Month { year: 2023, month: 11 };
        let jan = PeriodKey::Month { year: 2024, month: 1 };
        assert!(nov < jan);
        assert_eq!(nov.label(), "2023-11");
        assert_eq!(PeriodKey::Quarter { year: 2024, quarter: 2 }.label(), "2024Q2");
        assert_eq!(PeriodKey::Year { year: 2024 }.label(), "2024");
    }
}
