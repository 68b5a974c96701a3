#![cfg(all(feature = "dataset", feature = "workflows"))]

use edufin_core::dataset::{load_records, ColumnMap};
use edufin_core::workflows::{run_dashboard, DashboardConfig};
use edufin_core::EduFinError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// CSV export the way the sheet collaborator hands it over: human headers,
/// one dirty date, one non-numeric amount.
fn sample_csv() -> String {
    let mut csv = String::from("First Payment Date,Collected Amount,Total Fee,Batch\n");
    let mut amount = 40000;
    for year in [2023, 2024] {
        for month in 1..=12 {
            csv.push_str(&format!("{year}-{month:02}-10,{amount},90000,B{month}\n"));
            amount += 2500;
        }
    }
    csv.push_str("not-a-date,5000,90000,B1\n");
    csv.push_str("2024-12-20,n/a,90000,B12\n");
    csv
}

#[test]
fn test_csv_to_report_end_to_end() {
    let load = load_records(sample_csv().as_bytes(), &ColumnMap::default()).unwrap();
    assert_eq!(load.total_rows, 26);
    assert_eq!(load.dropped_rows, 1);
    assert_eq!(load.records.len(), 25);

    let out = run_dashboard(&load.records, &DashboardConfig::default()).unwrap();
    let report = out.result;

    assert_eq!(report.revenue.monthly.len(), 24);
    assert_eq!(report.revenue.yearly.len(), 2);
    assert_eq!(report.revenue.mom.len(), 24);
    assert_eq!(report.revenue.mom[0].growth_pct, None);

    // Every defined MoM rate is positive on a rising series; the coerced
    // zero-amount row lands in December 2024, which already has revenue
    for point in report.revenue.mom.iter().skip(1) {
        assert!(point.growth_pct.unwrap() > Decimal::ZERO);
    }

    let yoy = report.revenue.yoy[1].growth_pct.unwrap();
    assert!(yoy > Decimal::ZERO);
    assert!(report.revenue.yearly_cagr > Decimal::ZERO);

    assert_eq!(report.projection.len(), 5);
    assert!(report.outcome.terminal_value > Decimal::ZERO);
    assert!(report.outcome.irr.is_some());
    assert!(!report.insights.is_empty());
}

#[test]
fn test_fetch_failure_shape_no_partial_dataset() {
    // A malformed file (ragged row) aborts the load entirely
    let bad = "first_payment_date,collected_amount\n2024-01-10,100,extra\n";
    let err = load_records(bad.as_bytes(), &ColumnMap::default()).unwrap_err();
    assert!(matches!(err, EduFinError::Dataset(_)));
}

#[test]
fn test_report_serializes_for_the_ui() {
    let load = load_records(sample_csv().as_bytes(), &ColumnMap::default()).unwrap();
    let out = run_dashboard(&load.records, &DashboardConfig::default()).unwrap();
    let json = serde_json::to_string(&out).unwrap();
    assert!(json.contains("terminal_value"));
    assert!(json.contains("insights"));
}

#[test]
fn test_config_overrides_flow_through() {
    let load = load_records(sample_csv().as_bytes(), &ColumnMap::default()).unwrap();
    let config = DashboardConfig {
        base_revenue: Some(dec!(1200000)),
        projection_years: 7,
        ..DashboardConfig::default()
    };
    let out = run_dashboard(&load.records, &config).unwrap();
    assert_eq!(out.result.projection.len(), 7);
    assert_eq!(out.result.projection[0].revenue, dec!(1200000));
}
