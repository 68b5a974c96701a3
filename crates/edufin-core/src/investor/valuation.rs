use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EduFinError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::EduFinResult;

use super::projection::ProjectionRow;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Investor-side parameters. All rates are fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorInput {
    /// Capital committed at year 0; zero is allowed and makes ROI/IRR
    /// unavailable rather than an error.
    pub investment: Money,
    /// Ownership fraction the investment buys (0.20 = 20%)
    pub equity_fraction: Rate,
    /// Discount rate for the DCF valuation
    pub discount_rate: Rate,
}

/// Exit outcome derived from the final projection row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorOutcome {
    pub terminal_value: Money,
    pub investor_payout: Money,
    /// `None` when investment is zero (undefined, not a crash).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<Rate>,
    /// Solved over `[-investment, 0, ..., 0, payout]`; `None` when the
    /// solver cannot converge or investment is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr: Option<Rate>,
    pub dcf_value: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value the projection schedule from the investor's side: terminal value,
/// equity payout, ROI, IRR, and a DCF over annual FCF plus discounted
/// terminal value. Pure and idempotent over its inputs.
pub fn valuate(
    rows: &[ProjectionRow],
    input: &InvestorInput,
) -> EduFinResult<ComputationOutput<InvestorOutcome>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_investor_input(input)?;

    let last = rows.last().ok_or_else(|| {
        EduFinError::InsufficientData("Valuation requires at least one projection row".into())
    })?;

    let terminal_value = last.valuation;
    let investor_payout = terminal_value * input.equity_fraction;

    let roi = if input.investment > Decimal::ZERO {
        Some((investor_payout - input.investment) / input.investment)
    } else {
        None
    };

    let irr = solve_irr(rows.len(), input.investment, investor_payout);

    // Discount factors accumulate iteratively; `rows` is 1-indexed by year
    // so the running factor after row t is (1+r)^t.
    let one_plus_r = Decimal::ONE + input.discount_rate;
    let mut factor = Decimal::ONE;
    let mut pv_of_fcf = Decimal::ZERO;
    for row in rows {
        factor *= one_plus_r;
        pv_of_fcf += row.fcf / factor;
    }
    let pv_of_terminal = terminal_value / factor;
    let dcf_value = pv_of_fcf + pv_of_terminal;

    if dcf_value > Decimal::ZERO && pv_of_terminal / dcf_value > dec!(0.75) {
        warnings.push(format!(
            "Discounted terminal value is {:.1}% of the DCF valuation; consider extending the projection horizon",
            pv_of_terminal / dcf_value * dec!(100)
        ));
    }

    let outcome = InvestorOutcome {
        terminal_value,
        investor_payout,
        roi,
        irr,
        dcf_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Exit-multiple terminal value with single-payout IRR and FCF DCF",
        input,
        warnings,
        elapsed,
        outcome,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_investor_input(input: &InvestorInput) -> EduFinResult<()> {
    if input.investment < Decimal::ZERO {
        return Err(EduFinError::InvalidInput {
            field: "investment".into(),
            reason: "Investment cannot be negative".into(),
        });
    }
    if input.equity_fraction < Decimal::ZERO || input.equity_fraction > Decimal::ONE {
        return Err(EduFinError::InvalidInput {
            field: "equity_fraction".into(),
            reason: "Equity fraction must be within [0, 1]".into(),
        });
    }
    if input.discount_rate <= dec!(-1) {
        return Err(EduFinError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

/// IRR of the single-payout vector: capital out at year 0, nothing in
/// between, the equity payout at year N.
fn solve_irr(n_years: usize, investment: Money, payout: Money) -> Option<Rate> {
    if investment.is_zero() {
        return None;
    }
    let mut flows = vec![Decimal::ZERO; n_years + 1];
    flows[0] = -investment;
    flows[n_years] = payout;
    time_value::irr(&flows, dec!(0.10)).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investor::projection::{build_projection, ProjectionInput};
    use pretty_assertions::assert_eq;

    fn sample_rows() -> Vec<ProjectionRow> {
        build_projection(&ProjectionInput {
            base_revenue: dec!(600000),
            growth_rate: dec!(0.25),
            ebitda_margin_start: dec!(0.26),
            margin_improvement_rate: dec!(0.04),
            reinvestment_rate: dec!(0.08),
            exit_multiple: dec!(6),
            projection_years: 5,
        })
        .unwrap()
        .result
    }

    fn sample_investor() -> InvestorInput {
        InvestorInput {
            investment: dec!(1000000),
            equity_fraction: dec!(0.20),
            discount_rate: dec!(0.12),
        }
    }

    #[test]
    fn test_terminal_value_and_payout() {
        let rows = sample_rows();
        let out = valuate(&rows, &sample_investor()).unwrap().result;
        assert_eq!(out.terminal_value, rows[4].valuation);
        assert_eq!(out.investor_payout, out.terminal_value * dec!(0.20));
    }

    #[test]
    fn test_roi_matches_payout() {
        let investor = sample_investor();
        let out = valuate(&sample_rows(), &investor).unwrap().result;
        let roi = out.roi.unwrap();
        assert_eq!(
            roi,
            (out.investor_payout - investor.investment) / investor.investment
        );
    }

    #[test]
    fn test_zero_investment_yields_na_roi_and_irr() {
        let investor = InvestorInput {
            investment: Decimal::ZERO,
            ..sample_investor()
        };
        let out = valuate(&sample_rows(), &investor).unwrap().result;
        assert_eq!(out.roi, None);
        assert_eq!(out.irr, None);
        // Payout and DCF are still produced
        assert!(out.investor_payout > Decimal::ZERO);
        assert!(out.dcf_value > Decimal::ZERO);
    }

    #[test]
    fn test_irr_sign_follows_payout() {
        // At a 20% stake the payout trails the invested capital
        let out = valuate(&sample_rows(), &sample_investor()).unwrap().result;
        assert!(out.investor_payout < dec!(1000000));
        assert!(out.irr.unwrap() < Decimal::ZERO);

        // At a 50% stake the payout clears it and IRR turns positive
        let better = InvestorInput {
            equity_fraction: dec!(0.50),
            ..sample_investor()
        };
        let out = valuate(&sample_rows(), &better).unwrap().result;
        assert!(out.investor_payout > dec!(1000000));
        let irr = out.irr.unwrap();
        assert!(irr > Decimal::ZERO && irr < dec!(0.30), "irr {irr}");
    }

    #[test]
    fn test_dcf_sums_discounted_fcf_and_terminal() {
        let rows = sample_rows();
        let investor = sample_investor();
        let out = valuate(&rows, &investor).unwrap().result;

        let r = Decimal::ONE + investor.discount_rate;
        let mut expected = Decimal::ZERO;
        let mut factor = Decimal::ONE;
        for row in &rows {
            factor *= r;
            expected += row.fcf / factor;
        }
        expected += out.terminal_value / factor;
        assert_eq!(out.dcf_value, expected);
    }

    #[test]
    fn test_valuation_is_idempotent() {
        let rows = sample_rows();
        let investor = sample_investor();
        let a = valuate(&rows, &investor).unwrap().result;
        let b = valuate(&rows, &investor).unwrap().result;
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_rows_is_insufficient_data() {
        assert!(matches!(
            valuate(&[], &sample_investor()),
            Err(EduFinError::InsufficientData(_))
        ));
    }
}
