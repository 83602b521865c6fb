use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInputs {
    pub monthly_amount: f64,
    pub years: u32,
    pub annual_return_percent: f64,
}

/// Cumulative totals at the end of one year of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u32,
    pub invested: f64,
    pub value: f64,
    pub gains: f64,
}

/// Terminal figures, rounded to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub total_invested: i64,
    pub future_value: i64,
    pub total_gains: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub result: ProjectionResult,
    pub series: Vec<YearlyRecord>,
}

impl Projection {
    pub fn last_year(&self) -> Option<&YearlyRecord> {
        self.series.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
}
