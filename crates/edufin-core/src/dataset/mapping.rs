use serde::{Deserialize, Serialize};

use crate::error::EduFinError;
use crate::EduFinResult;

/// Canonicalize a source column header: trim, lowercase, spaces to
/// underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Source column names (post-normalization) backing each logical field.
/// The default maps the logical names onto themselves. Optional fields are
/// best-effort: they are captured when the named column exists and skipped
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMap {
    pub first_payment_date: String,
    pub collected_amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            first_payment_date: "first_payment_date".into(),
            collected_amount: "collected_amount".into(),
            total_fee: Some("total_fee".into()),
            batch: Some("batch".into()),
        }
    }
}

/// Resolved positions of the mapped columns within one CSV header row.
#[derive(Debug)]
pub(crate) struct ColumnIndexes {
    pub date: usize,
    pub amount: usize,
    pub total_fee: Option<usize>,
    pub batch: Option<usize>,
}

impl ColumnMap {
    pub(crate) fn resolve(&self, headers: &[String]) -> EduFinResult<ColumnIndexes> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let date = find(&self.first_payment_date).ok_or_else(|| EduFinError::MissingColumn {
            column: self.first_payment_date.clone(),
        })?;
        let amount = find(&self.collected_amount).ok_or_else(|| EduFinError::MissingColumn {
            column: self.collected_amount.clone(),
        })?;

        Ok(ColumnIndexes {
            date,
            amount,
            total_fee: self.total_fee.as_deref().and_then(find),
            batch: self.batch.as_deref().and_then(find),
        })
    }
}
