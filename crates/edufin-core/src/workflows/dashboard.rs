use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::aggregation::{
    aggregate, average_growth_pct, cagr, growth, latest_bucket, total_revenue, GrowthPoint,
};
use crate::error::EduFinError;
use crate::insights::{evaluate, InsightInput, InsightThresholds};
use crate::investor::{
    build_projection, valuate, InvestorInput, InvestorOutcome, ProjectionInput, ProjectionRow,
};
use crate::metrics::{compute_snapshot, CostModel, MetricSnapshot, SnapshotInput};
use crate::types::{
    with_metadata, ComputationOutput, Granularity, Money, Multiple, PaymentRecord, PeriodBucket,
    Rate,
};
use crate::EduFinResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything one dashboard run needs beyond the dataset itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub cost_model: CostModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_on_hand: Option<Money>,
    /// Year-1 revenue for the projection; defaults to the latest full
    /// calendar year of the dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_revenue: Option<Money>,
    pub growth_rate: Rate,
    pub ebitda_margin_start: Rate,
    pub margin_improvement_rate: Rate,
    pub reinvestment_rate: Rate,
    pub exit_multiple: Multiple,
    pub projection_years: u32,
    pub investment: Money,
    pub equity_fraction: Rate,
    pub discount_rate: Rate,
    pub thresholds: InsightThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            cost_model: CostModel::Preset,
            cash_on_hand: None,
            base_revenue: None,
            growth_rate: dec!(0.25),
            ebitda_margin_start: dec!(0.26),
            margin_improvement_rate: dec!(0.04),
            reinvestment_rate: dec!(0.08),
            exit_multiple: dec!(6),
            projection_years: 5,
            investment: dec!(1000000),
            equity_fraction: dec!(0.20),
            discount_rate: dec!(0.12),
            thresholds: InsightThresholds::default(),
        }
    }
}

/// Period-aggregate and growth tables at every granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueTables {
    pub monthly: Vec<PeriodBucket>,
    pub quarterly: Vec<PeriodBucket>,
    pub yearly: Vec<PeriodBucket>,
    pub mom: Vec<GrowthPoint>,
    pub qoq: Vec<GrowthPoint>,
    pub yoy: Vec<GrowthPoint>,
    pub yearly_cagr: Rate,
}

/// Output of one full dashboard pass, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub revenue: RevenueTables,
    pub snapshot: MetricSnapshot,
    pub projection: Vec<ProjectionRow>,
    pub outcome: InvestorOutcome,
    pub insights: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the whole pipeline once: aggregation, growth, cost/margin snapshot,
/// projection, valuation, insights. Stateless; every interaction triggers
/// a fresh pass over immutable inputs.
pub fn run_dashboard(
    records: &[PaymentRecord],
    config: &DashboardConfig,
) -> EduFinResult<ComputationOutput<AnalysisReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let monthly = aggregate(records, Granularity::Month);
    let quarterly = aggregate(records, Granularity::Quarter);
    let yearly = aggregate(records, Granularity::Year);

    let mom = growth(&monthly);
    let qoq = growth(&quarterly);
    let yoy = growth(&yearly);
    let yearly_cagr = cagr(&yearly);

    let snapshot_out = compute_snapshot(&SnapshotInput {
        total_revenue: total_revenue(records),
        cost_model: config.cost_model.clone(),
        cash_on_hand: config.cash_on_hand,
    })?;
    for w in &snapshot_out.warnings {
        warnings.push(format!("[snapshot] {w}"));
    }
    let snapshot = snapshot_out.result;

    let base_revenue = resolve_base_revenue(config, &yearly, &snapshot)?;

    let projection_out = build_projection(&ProjectionInput {
        base_revenue,
        growth_rate: config.growth_rate,
        ebitda_margin_start: config.ebitda_margin_start,
        margin_improvement_rate: config.margin_improvement_rate,
        reinvestment_rate: config.reinvestment_rate,
        exit_multiple: config.exit_multiple,
        projection_years: config.projection_years,
    })?;
    for w in &projection_out.warnings {
        warnings.push(format!("[projection] {w}"));
    }
    let projection = projection_out.result;

    let valuation_out = valuate(
        &projection,
        &InvestorInput {
            investment: config.investment,
            equity_fraction: config.equity_fraction,
            discount_rate: config.discount_rate,
        },
    )?;
    for w in &valuation_out.warnings {
        warnings.push(format!("[valuation] {w}"));
    }
    let outcome = valuation_out.result;

    let margin_pct = if snapshot.computable {
        Some(snapshot.ebitda_margin_pct)
    } else {
        Some(config.ebitda_margin_start * dec!(100))
    };
    let insights = evaluate(
        &InsightInput {
            avg_mom_growth_pct: average_growth_pct(&mom),
            avg_yoy_growth_pct: average_growth_pct(&yoy),
            ebitda_margin_pct: margin_pct,
            forward_growth_rate: Some(config.growth_rate),
            base_revenue: Some(base_revenue),
            terminal_value: Some(outcome.terminal_value),
            investment: Some(config.investment),
            investor_payout: Some(outcome.investor_payout),
            roi: outcome.roi,
        },
        &config.thresholds,
    );

    let report = AnalysisReport {
        revenue: RevenueTables {
            monthly,
            quarterly,
            yearly,
            mom,
            qoq,
            yoy,
            yearly_cagr,
        },
        snapshot,
        projection,
        outcome,
        insights,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Single-pass revenue analytics and investor valuation",
        config,
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Explicit override first, then the latest calendar-year revenue, then
/// total dataset revenue. No usable base is a fatal input condition.
fn resolve_base_revenue(
    config: &DashboardConfig,
    yearly: &[PeriodBucket],
    snapshot: &MetricSnapshot,
) -> EduFinResult<Money> {
    if let Some(base) = config.base_revenue {
        return Ok(base);
    }
    if let Some(latest) = latest_bucket(yearly) {
        if latest.revenue > Decimal::ZERO {
            return Ok(latest.revenue);
        }
    }
    if snapshot.total_revenue > Decimal::ZERO {
        return Ok(snapshot.total_revenue);
    }
    Err(EduFinError::InsufficientData(
        "No revenue data to derive a projection base from; supply base_revenue explicitly".into(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
