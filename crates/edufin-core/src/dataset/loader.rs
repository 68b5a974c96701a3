use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, PaymentRecord};
use crate::EduFinResult;

use super::mapping::ColumnMap;
use super::normalize_header;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Result of one dataset load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetLoad {
    pub records: Vec<PaymentRecord>,
    /// Data rows seen in the file, including dropped ones
    pub total_rows: usize,
    /// Rows dropped because their payment date would not parse
    pub dropped_rows: usize,
}

/// Read a mapped CSV into typed payment records.
///
/// Rows whose payment date cannot be parsed are dropped and counted;
/// non-numeric collected amounts coerce to zero. A missing required column
/// or a CSV-level read error aborts the whole load.
pub fn load_records<R: Read>(reader: R, map: &ColumnMap) -> EduFinResult<DatasetLoad> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    let columns = map.resolve(&headers)?;

    let mut records = Vec::new();
    let mut total_rows = 0usize;
    let mut dropped_rows = 0usize;

    for row in csv_reader.records() {
        let row = row?;
        total_rows += 1;

        let date = match row.get(columns.date).and_then(parse_date) {
            Some(d) => d,
            None => {
                dropped_rows += 1;
                continue;
            }
        };

        let collected_amount = row
            .get(columns.amount)
            .and_then(parse_amount)
            .unwrap_or(Decimal::ZERO);

        let total_fee = columns
            .total_fee
            .and_then(|i| row.get(i))
            .and_then(parse_amount);

        let batch = columns
            .batch
            .and_then(|i| row.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        records.push(PaymentRecord {
            payment_date: date,
            collected_amount,
            total_fee,
            batch,
        });
    }

    Ok(DatasetLoad {
        records,
        total_rows,
        dropped_rows,
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_amount(raw: &str) -> Option<Money> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_clean_csv() {
        let csv_text = "\
First Payment Date,Collected Amount,Total Fee,Batch
2024-01-15,45000,90000,B1
2024-02-10,30000,90000,B2
";
        let load = load_records(csv_text.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(load.total_rows, 2);
        assert_eq!(load.dropped_rows, 0);
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.records[0].collected_amount, dec!(45000));
        assert_eq!(load.records[0].total_fee, Some(dec!(90000)));
        assert_eq!(load.records[1].batch.as_deref(), Some("B2"));
    }

    #[test]
    fn test_unparseable_dates_are_dropped_and_counted() {
        let csv_text = "\
first_payment_date,collected_amount
2024-01-15,100
not-a-date,200
,300
15/02/2024,400
";
        let load = load_records(csv_text.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(load.total_rows, 4);
        assert_eq!(load.dropped_rows, 2);
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.records[1].collected_amount, dec!(400));
    }

    #[test]
    fn test_bad_amounts_coerce_to_zero() {
        let csv_text = "\
first_payment_date,collected_amount
2024-01-15,n/a
2024-02-15,\"1,250.50\"
";
        let load = load_records(csv_text.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(load.records[0].collected_amount, Decimal::ZERO);
        assert_eq!(load.records[1].collected_amount, dec!(1250.50));
    }

    #[test]
    fn test_missing_required_column_aborts() {
        let csv_text = "first_payment_date,something_else\n2024-01-15,1\n";
        let err = load_records(csv_text.as_bytes(), &ColumnMap::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::EduFinError::MissingColumn { column } if column == "collected_amount"
        ));
    }

    #[test]
    fn test_mapped_source_columns() {
        let csv_text = "\
Payment Dt,Amount Received
2024-03-01,500
";
        let map = ColumnMap {
            first_payment_date: "payment_dt".into(),
            collected_amount: "amount_received".into(),
            total_fee: None,
            batch: None,
        };
        let load = load_records(csv_text.as_bytes(), &map).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.records[0].collected_amount, dec!(500));
    }

    #[test]
    fn test_empty_file_yields_empty_dataset() {
        let csv_text = "first_payment_date,collected_amount\n";
        let load = load_records(csv_text.as_bytes(), &ColumnMap::default()).unwrap();
        assert!(load.records.is_empty());
        assert_eq!(load.total_rows, 0);
    }
}
