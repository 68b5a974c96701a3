use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::{Granularity, Money, PaymentRecord, PeriodBucket, PeriodKey};

/// Group payment records into calendar buckets and sum collected amounts.
///
/// Output is sorted ascending by period start. Periods without any record
/// are absent, never zero-filled. Empty input yields an empty sequence.
pub fn aggregate(records: &[PaymentRecord], granularity: Granularity) -> Vec<PeriodBucket> {
    let mut totals: BTreeMap<PeriodKey, Money> = BTreeMap::new();

    for record in records {
        let key = PeriodKey::from_date(record.payment_date, granularity);
        *totals.entry(key).or_insert(Decimal::ZERO) += record.collected_amount;
    }

    totals
        .into_iter()
        .map(|(period, revenue)| PeriodBucket { period, revenue })
        .collect()
}

/// Sum of collected amounts across every record.
pub fn total_revenue(records: &[PaymentRecord]) -> Money {
    records.iter().map(|r| r.collected_amount).sum()
}

/// The most recent bucket of a sorted bucket sequence.
pub fn latest_bucket(buckets: &[PeriodBucket]) -> Option<&PeriodBucket> {
    buckets.last()
}
