use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EduFinError;
use crate::types::{with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::EduFinResult;

/// Upper bound on the forward horizon.
pub const MAX_PROJECTION_YEARS: u32 = 20;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Assumptions for the N-year forward schedule. All rates are fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Year-1 revenue; must be positive.
    pub base_revenue: Money,
    /// YoY revenue growth (0.25 = 25%)
    pub growth_rate: Rate,
    /// EBITDA margin in year 1 (0.26 = 26%)
    pub ebitda_margin_start: Rate,
    /// Yearly relative improvement of the margin; compounds, it is not
    /// added (0.04 grows a 26% margin to 27.04% in year 2).
    pub margin_improvement_rate: Rate,
    /// Fraction of revenue reinvested each year
    pub reinvestment_rate: Rate,
    /// Exit EBITDA multiple applied to every year's valuation column
    pub exit_multiple: Multiple,
    pub projection_years: u32,
}

/// One forward year of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub year: u32,
    pub revenue: Money,
    pub ebitda: Money,
    pub ebitda_margin_pct: Decimal,
    pub fcf: Money,
    pub valuation: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the deterministic N-year schedule of revenue, EBITDA, FCF and
/// exit-multiple valuation.
pub fn build_projection(
    input: &ProjectionInput,
) -> EduFinResult<ComputationOutput<Vec<ProjectionRow>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_projection_input(input)?;

    let mut rows = Vec::with_capacity(input.projection_years as usize);
    let mut revenue = input.base_revenue;
    let mut margin = input.ebitda_margin_start;
    let mut margin_overflowed = false;

    for year in 1..=input.projection_years {
        if margin >= Decimal::ONE && !margin_overflowed {
            margin_overflowed = true;
            warnings.push(format!(
                "Compounded EBITDA margin reaches {:.1}% in year {year}; review the improvement rate",
                margin * dec!(100)
            ));
        }

        let ebitda = revenue * margin;
        let fcf = ebitda - revenue * input.reinvestment_rate;
        rows.push(ProjectionRow {
            year,
            revenue,
            ebitda,
            ebitda_margin_pct: margin * dec!(100),
            fcf,
            valuation: ebitda * input.exit_multiple,
        });

        revenue *= Decimal::ONE + input.growth_rate;
        margin *= Decimal::ONE + input.margin_improvement_rate;
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Compounding revenue/EBITDA-margin forward schedule",
        input,
        warnings,
        elapsed,
        rows,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_projection_input(input: &ProjectionInput) -> EduFinResult<()> {
    if input.base_revenue <= Decimal::ZERO {
        return Err(EduFinError::InvalidInput {
            field: "base_revenue".into(),
            reason: "Base revenue must be positive".into(),
        });
    }
    if input.projection_years == 0 || input.projection_years > MAX_PROJECTION_YEARS {
        return Err(EduFinError::InvalidInput {
            field: "projection_years".into(),
            reason: format!("Projection years must be within 1..={MAX_PROJECTION_YEARS}"),
        });
    }
    if input.growth_rate <= dec!(-1) {
        return Err(EduFinError::InvalidInput {
            field: "growth_rate".into(),
            reason: "Growth rate must be greater than -100%".into(),
        });
    }
    if input.ebitda_margin_start <= Decimal::ZERO || input.ebitda_margin_start >= Decimal::ONE {
        return Err(EduFinError::InvalidInput {
            field: "ebitda_margin_start".into(),
            reason: "Starting EBITDA margin must be between 0 and 1 (exclusive)".into(),
        });
    }
    if input.reinvestment_rate < Decimal::ZERO || input.reinvestment_rate >= Decimal::ONE {
        return Err(EduFinError::InvalidInput {
            field: "reinvestment_rate".into(),
            reason: "Reinvestment rate must be within [0, 1)".into(),
        });
    }
    if input.exit_multiple <= Decimal::ZERO {
        return Err(EduFinError::InvalidInput {
            field: "exit_multiple".into(),
            reason: "Exit multiple must be positive".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
