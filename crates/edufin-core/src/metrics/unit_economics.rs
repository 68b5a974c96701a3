use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EduFinError;
use crate::types::Money;
use crate::EduFinResult;

/// Installments a program fee is collected over unless configured otherwise.
pub const DEFAULT_INSTALLMENT_COUNT: u32 = 3;

/// Spend components behind customer acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacInput {
    pub ad_spend: Money,
    pub sales_cost: Money,
    pub tooling_cost: Money,
    pub new_customers: u32,
}

/// Blended customer acquisition cost; `None` when no customers were
/// acquired (undefined, not zero).
pub fn customer_acquisition_cost(input: &CacInput) -> Option<Money> {
    if input.new_customers == 0 {
        return None;
    }
    let total = input.ad_spend + input.sales_cost + input.tooling_cost;
    Some(total / Decimal::from(input.new_customers))
}

/// Subscription-proxy recurring revenue derived from the program fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRevenue {
    pub mrr: Money,
    pub arr: Money,
}

/// MRR proxy: total program fee spread over its installment count;
/// ARR is 12 × MRR.
pub fn recurring_revenue(
    total_program_fee: Money,
    installment_count: u32,
) -> EduFinResult<RecurringRevenue> {
    if installment_count == 0 {
        return Err(EduFinError::InvalidInput {
            field: "installment_count".into(),
            reason: "Installment count must be at least 1".into(),
        });
    }
    let mrr = total_program_fee / Decimal::from(installment_count);
    Ok(RecurringRevenue {
        mrr,
        arr: mrr * dec!(12),
    })
}
