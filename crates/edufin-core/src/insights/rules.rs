use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Thresholds behind the automated observations. Defaults reflect
/// early-stage EdTech benchmarks; the UI may substitute live peer data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Average MoM growth (%) above which short-term momentum is called out
    pub strong_mom_pct: Decimal,
    /// Average YoY growth (%) above which growth beats sector benchmarks
    pub strong_yoy_pct: Decimal,
    /// EBITDA margin (%) at or above which unit economics are called healthy
    pub healthy_margin_pct: Decimal,
    /// Median peer YoY growth rate (fraction) the forward assumption is
    /// compared against
    pub peer_growth_median: Rate,
    /// Terminal value below this multiple of base revenue is flagged as
    /// conservative
    pub conservative_terminal_multiple: Decimal,
    /// ROI at or above which the capital has a realistic chance of doubling
    pub doubling_roi: Rate,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        InsightThresholds {
            strong_mom_pct: dec!(5),
            strong_yoy_pct: dec!(20),
            healthy_margin_pct: dec!(25),
            peer_growth_median: dec!(0.22),
            conservative_terminal_multiple: dec!(2),
            doubling_roi: Decimal::ONE,
        }
    }
}

/// Signals feeding the rules. Every field is optional; a missing signal
/// suppresses the rules that read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightInput {
    pub avg_mom_growth_pct: Option<Decimal>,
    pub avg_yoy_growth_pct: Option<Decimal>,
    pub ebitda_margin_pct: Option<Decimal>,
    pub forward_growth_rate: Option<Rate>,
    pub base_revenue: Option<Money>,
    pub terminal_value: Option<Money>,
    pub investment: Option<Money>,
    pub investor_payout: Option<Money>,
    pub roi: Option<Rate>,
}

/// Run the fixed, ordered rule list and collect the messages of every rule
/// that fires. Total: never panics, and a run where nothing fires yields a
/// single fallback message.
pub fn evaluate(input: &InsightInput, thresholds: &InsightThresholds) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(mom) = input.avg_mom_growth_pct {
        if mom > thresholds.strong_mom_pct {
            insights.push(
                "Average MoM growth is strong, indicating healthy short-term momentum in revenue."
                    .to_string(),
            );
        }
    }

    if let Some(yoy) = input.avg_yoy_growth_pct {
        if yoy > thresholds.strong_yoy_pct {
            insights.push(
                "YoY growth is above typical EdTech benchmarks, which is attractive for investors."
                    .to_string(),
            );
        }
    }

    if let Some(margin) = input.ebitda_margin_pct {
        if margin >= thresholds.healthy_margin_pct {
            insights.push(format!(
                "EBITDA margins at or above {}% signal a lean cost structure and strong unit economics.",
                thresholds.healthy_margin_pct
            ));
        }
    }

    if let Some(growth) = input.forward_growth_rate {
        if growth > thresholds.peer_growth_median {
            insights.push(
                "The assumed forward growth rate is higher than most key market players, positioning the business as a high-growth asset."
                    .to_string(),
            );
        }
    }

    if let (Some(tv), Some(base)) = (input.terminal_value, input.base_revenue) {
        if tv < base * thresholds.conservative_terminal_multiple {
            insights.push(
                "Terminal value is not very aggressive relative to base revenue; consider validating the exit multiple or growth assumptions."
                    .to_string(),
            );
        }
    }

    if let Some(roi) = input.roi {
        if roi >= thresholds.doubling_roi {
            insights.push(
                "The investment has a realistic chance of doubling the committed capital."
                    .to_string(),
            );
        }
    }

    if let (Some(payout), Some(investment)) = (input.investor_payout, input.investment) {
        if payout < investment {
            insights.push(
                "Projected payout is below the invested capital at the assumed stake and exit multiple."
                    .to_string(),
            );
        }
    }

    if insights.is_empty() {
        insights.push(
            "No major red flags or standout strengths detected. The assumptions look moderate and stable."
                .to_string(),
        );
    }

    insights
}
