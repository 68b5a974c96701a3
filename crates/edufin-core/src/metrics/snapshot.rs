use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EduFinError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::EduFinResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cost structure applied to total revenue. Percentages are in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CostModel {
    /// House default for an education-services P&L: 22% operational cost,
    /// 52% OPEX, 8% reinvestment.
    Preset,
    Custom {
        operational_cost_pct: Decimal,
        opex_pct: Decimal,
        reinvestment_pct: Decimal,
    },
}

/// Cost model resolved to fractions of revenue.
struct CostRates {
    operational_cost: Rate,
    opex: Rate,
    reinvestment: Rate,
}

impl CostModel {
    fn rates(&self) -> EduFinResult<CostRates> {
        let (operational_cost_pct, opex_pct, reinvestment_pct) = match self {
            CostModel::Preset => (dec!(22), dec!(52), dec!(8)),
            CostModel::Custom {
                operational_cost_pct,
                opex_pct,
                reinvestment_pct,
            } => (*operational_cost_pct, *opex_pct, *reinvestment_pct),
        };

        for (field, pct) in [
            ("operational_cost_pct", operational_cost_pct),
            ("opex_pct", opex_pct),
            ("reinvestment_pct", reinvestment_pct),
        ] {
            if pct < Decimal::ZERO || pct > dec!(100) {
                return Err(EduFinError::InvalidInput {
                    field: field.into(),
                    reason: format!("Percentage must be within [0, 100], got {pct}"),
                });
            }
        }

        let hundred = dec!(100);
        Ok(CostRates {
            operational_cost: operational_cost_pct / hundred,
            opex: opex_pct / hundred,
            reinvestment: reinvestment_pct / hundred,
        })
    }
}

/// Input for a cost/margin snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInput {
    pub total_revenue: Money,
    pub cost_model: CostModel,
    /// Cash balance used to derive runway. Without it runway is not reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_on_hand: Option<Money>,
}

/// Months of runway left at the current burn rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Runway {
    Months(Decimal),
    /// Burn rate is zero; runway is unbounded, which is distinct from
    /// zero months left.
    Unbounded,
}

/// Cost and margin metrics derived from a single total-revenue scalar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub total_revenue: Money,
    pub operational_cost: Money,
    pub opex: Money,
    pub gross_profit: Money,
    pub ebitda: Money,
    pub ebitda_margin_pct: Decimal,
    /// Approximated as revenue × EBITDA margin; depreciation, interest and
    /// tax are not modelled.
    pub net_profit: Money,
    pub fcf: Money,
    pub burn_rate: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runway: Option<Runway>,
    /// False when total revenue is zero or negative; every figure above is
    /// zero in that case.
    pub computable: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the full cost/margin snapshot from total revenue.
///
/// Derivation order is fixed: cost slices, gross profit, EBITDA, net
/// profit, FCF, burn, runway. Non-positive revenue yields an all-zero
/// snapshot flagged not-computable rather than an error.
pub fn compute_snapshot(input: &SnapshotInput) -> EduFinResult<ComputationOutput<MetricSnapshot>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rates = input.cost_model.rates()?;

    let snapshot = if input.total_revenue <= Decimal::ZERO {
        warnings.push(format!(
            "Total revenue is {}; cost and margin metrics are not computable",
            input.total_revenue
        ));
        MetricSnapshot {
            total_revenue: input.total_revenue,
            operational_cost: Decimal::ZERO,
            opex: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            ebitda: Decimal::ZERO,
            ebitda_margin_pct: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            fcf: Decimal::ZERO,
            burn_rate: Decimal::ZERO,
            runway: None,
            computable: false,
        }
    } else {
        let revenue = input.total_revenue;
        let operational_cost = revenue * rates.operational_cost;
        let opex = revenue * rates.opex;
        let gross_profit = revenue - operational_cost;
        let ebitda = revenue - operational_cost - opex;
        let ebitda_margin = ebitda / revenue;
        let net_profit = revenue * ebitda_margin;
        let fcf = net_profit - revenue * rates.reinvestment;

        let burn_rate = if ebitda < Decimal::ZERO {
            -ebitda
        } else {
            Decimal::ZERO
        };

        let runway = input.cash_on_hand.map(|cash| {
            if burn_rate.is_zero() {
                Runway::Unbounded
            } else {
                Runway::Months(cash / burn_rate)
            }
        });

        if ebitda < Decimal::ZERO {
            warnings.push("EBITDA is negative at the configured cost structure".into());
        }

        MetricSnapshot {
            total_revenue: revenue,
            operational_cost,
            opex,
            gross_profit,
            ebitda,
            ebitda_margin_pct: ebitda_margin * dec!(100),
            net_profit,
            fcf,
            burn_rate,
            runway,
            computable: true,
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Percentage-slice cost and margin model",
        input,
        warnings,
        elapsed,
        snapshot,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(input: &SnapshotInput) -> MetricSnapshot {
        compute_snapshot(input).unwrap().result
    }

    #[test]
    fn test_preset_cost_model_slices() {
        let out = snapshot(&SnapshotInput {
            total_revenue: dec!(1000),
            cost_model: CostModel::Preset,
            cash_on_hand: None,
        });
        assert_eq!(out.operational_cost, dec!(220));
        assert_eq!(out.opex, dec!(520));
        assert_eq!(out.gross_profit, dec!(780));
        assert_eq!(out.ebitda, dec!(260));
        assert_eq!(out.ebitda_margin_pct, dec!(26.0));
        // Net profit intentionally mirrors EBITDA via the margin shortcut
        assert_eq!(out.net_profit, dec!(260.0));
        assert_eq!(out.fcf, dec!(180.0));
        assert_eq!(out.burn_rate, Decimal::ZERO);
        assert!(out.computable);
    }

    #[test]
    fn test_non_positive_revenue_flags_not_computable() {
        for revenue in [Decimal::ZERO, dec!(-50)] {
            let out = compute_snapshot(&SnapshotInput {
                total_revenue: revenue,
                cost_model: CostModel::Preset,
                cash_on_hand: Some(dec!(100000)),
            })
            .unwrap();
            assert!(!out.result.computable);
            assert_eq!(out.result.ebitda, Decimal::ZERO);
            assert_eq!(out.result.runway, None);
            assert!(!out.warnings.is_empty());
        }
    }

    #[test]
    fn test_negative_ebitda_burn_and_runway() {
        let out = snapshot(&SnapshotInput {
            total_revenue: dec!(1000),
            cost_model: CostModel::Custom {
                operational_cost_pct: dec!(40),
                opex_pct: dec!(70),
                reinvestment_pct: dec!(0),
            },
            cash_on_hand: Some(dec!(500)),
        });
        assert_eq!(out.ebitda, dec!(-100));
        assert_eq!(out.burn_rate, dec!(100));
        assert_eq!(out.runway, Some(Runway::Months(dec!(5))));
    }

    #[test]
    fn test_zero_burn_means_unbounded_runway() {
        let out = snapshot(&SnapshotInput {
            total_revenue: dec!(1000),
            cost_model: CostModel::Preset,
            cash_on_hand: Some(dec!(500)),
        });
        // Positive EBITDA, so nothing is burning
        assert_eq!(out.runway, Some(Runway::Unbounded));
    }

    #[test]
    fn test_custom_percentages_validated() {
        let result = compute_snapshot(&SnapshotInput {
            total_revenue: dec!(1000),
            cost_model: CostModel::Custom {
                operational_cost_pct: dec!(120),
                opex_pct: dec!(10),
                reinvestment_pct: dec!(5),
            },
            cash_on_hand: None,
        });
        assert!(matches!(
            result,
            Err(EduFinError::InvalidInput { field, .. }) if field == "operational_cost_pct"
        ));
    }
}
