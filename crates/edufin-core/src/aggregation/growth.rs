use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{PeriodBucket, PeriodKey, Rate};

/// One entry of a growth series, aligned 1:1 with its bucket sequence.
/// `growth_pct` is `None` for the first bucket and whenever the prior
/// bucket's revenue is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub period: PeriodKey,
    pub revenue: Decimal,
    pub growth_pct: Option<Decimal>,
}

/// Period-over-period percentage change across a sorted bucket sequence.
///
/// The comparison base is whatever bucket is immediately prior in the
/// sequence, even across a calendar gap; gaps are not zero-filled.
pub fn growth(buckets: &[PeriodBucket]) -> Vec<GrowthPoint> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let growth_pct = if i == 0 {
                None
            } else {
                let prev = buckets[i - 1].revenue;
                if prev.is_zero() {
                    None
                } else {
                    Some((bucket.revenue - prev) / prev * dec!(100))
                }
            };
            GrowthPoint {
                period: bucket.period,
                revenue: bucket.revenue,
                growth_pct,
            }
        })
        .collect()
}

/// Mean of the defined growth percentages, `None` when no point is defined.
pub fn average_growth_pct(series: &[GrowthPoint]) -> Option<Decimal> {
    let defined: Vec<Decimal> = series.iter().filter_map(|p| p.growth_pct).collect();
    if defined.is_empty() {
        return None;
    }
    let sum: Decimal = defined.iter().sum();
    Some(sum / Decimal::from(defined.len()))
}

/// Compound growth rate between the first and last bucket:
/// `(last/first)^(1/(n-1)) - 1`.
///
/// Fewer than 2 buckets or a non-positive first revenue report 0 rather
/// than an error; unlike growth points, this metric has no NA sentinel.
pub fn cagr(buckets: &[PeriodBucket]) -> Rate {
    if buckets.len() < 2 {
        return Decimal::ZERO;
    }
    let first = buckets[0].revenue;
    let last = buckets[buckets.len() - 1].revenue;
    if first <= Decimal::ZERO || last <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let periods = Decimal::from(buckets.len() as u64 - 1);
    let ratio = last / first;
    ratio.powd(Decimal::ONE / periods) - Decimal::ONE
}
