//! Incentive report computation.
//!
//! An employee achieves their hurdle when their sales for the period reach
//! the target set for their position. The incentive is the period's sales
//! times the hurdle rate in basis points, rounded down to the cent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub period: String,
    pub region_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncentiveRow {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub total_sales_cents: i64,
    pub target_cents: i64,
    pub achieved: bool,
    pub incentive_cents: i64,
}

/// Rows for every employee matching `params`, ordered by name.
///
/// A transaction belongs to the period when its `occurred_on` date starts
/// with the period string, so `2026-09` covers every day of September.
pub fn incentive_rows(store: &Store, params: &ReportParams) -> Vec<IncentiveRow> {
    let records = |name: &str| store.collection(name).into_iter().flat_map(|c| c.records());

    let mut rows: Vec<IncentiveRow> = records("employees")
        .filter(|e| params.region_id.is_none() || uuid_field(e, "region_id") == params.region_id)
        .filter_map(|employee| {
            let employee_id = uuid_field(employee, "id")?;
            let position_id = uuid_field(employee, "position_id");

            let total_sales_cents = records("transactions")
                .filter(|t| uuid_field(t, "employee_id") == Some(employee_id))
                .filter(|t| str_field(t, "occurred_on").is_some_and(|d| d.starts_with(&params.period)))
                .filter_map(|t| t["amount_cents"].as_i64())
                .fold(0i64, i64::saturating_add);

            let hurdle = records("hurdles").find(|h| {
                position_id.is_some()
                    && uuid_field(h, "position_id") == position_id
                    && str_field(h, "period") == Some(params.period.as_str())
            });
            let target_cents = hurdle.and_then(|h| h["target_cents"].as_i64()).unwrap_or(0);
            let rate_bps = hurdle.and_then(|h| h["rate_bps"].as_i64()).unwrap_or(0);
            let achieved = hurdle.is_some() && total_sales_cents >= target_cents;

            Some(IncentiveRow {
                employee_id,
                employee_name: str_field(employee, "name").unwrap_or_default().to_string(),
                total_sales_cents,
                target_cents,
                achieved,
                incentive_cents: if achieved { total_sales_cents.saturating_mul(rate_bps) / 10_000 } else { 0 },
            })
        })
        .collect();

    rows.sort_by(|a, b| a.employee_name.cmp(&b.employee_name).then(a.employee_id.cmp(&b.employee_id)));
    rows
}

/// Render rows as CSV with a header line.
pub fn to_csv(rows: &[IncentiveRow]) -> String {
    let mut out = String::from("employee_id,employee_name,total_sales_cents,target_cents,achieved,incentive_cents\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.employee_id,
            csv_escape(&row.employee_name),
            row.total_sales_cents,
            row.target_cents,
            row.achieved,
            row.incentive_cents
        ));
    }
    out
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn uuid_field(record: &Value, key: &str) -> Option<Uuid> {
    str_field(record, key).and_then(|s| s.parse().ok())
}
