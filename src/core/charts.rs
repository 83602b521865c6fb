use serde::Serialize;

use super::types::{ProjectionResult, YearlyRecord};

pub const INVESTED_LABEL: &str = "Total Investment";
pub const VALUE_LABEL: &str = "Future Value";
pub const BREAKDOWN_LABELS: [&str; 2] = ["Total Invested", "Gains"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
}

/// Line/area chart of cumulative invested vs. value, one point per year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthChart {
    pub labels: Vec<String>,
    pub datasets: [Dataset; 2],
}

/// Donut chart of invested vs. gains with each slice's share in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownChart {
    pub labels: [&'static str; 2],
    pub data: [i64; 2],
    pub percentages: [f64; 2],
}

pub fn growth_chart(series: &[YearlyRecord]) -> GrowthChart {
    GrowthChart {
        labels: series.iter().map(|r| format!("Year {}", r.year)).collect(),
        datasets: [
            Dataset {
                label: INVESTED_LABEL,
                data: series.iter().map(|r| r.invested).collect(),
            },
            Dataset {
                label: VALUE_LABEL,
                data: series.iter().map(|r| r.value).collect(),
            },
        ],
    }
}

pub fn breakdown_chart(result: &ProjectionResult) -> BreakdownChart {
    // A slice can't be negative; losses show as an empty gains slice.
    let invested = result.total_invested.max(0);
    let gains = result.total_gains.max(0);
    let total = invested as f64 + gains as f64;
    BreakdownChart {
        labels: BREAKDOWN_LABELS,
        data: [invested, gains],
        percentages: [share_percent(invested, total), share_percent(gains, total)],
    }
}

fn share_percent(part: i64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (part as f64 / total * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SipInputs, project};

    fn sample_projection() -> crate::core::Projection {
        project(&SipInputs {
            monthly_amount: 5_000.0,
            years: 10,
            annual_return_percent: 12.0,
        })
        .expect("valid inputs")
    }

    #[test]
    fn growth_chart_has_one_point_per_year_in_each_dataset() {
        let projection = sample_projection();
        let chart = growth_chart(&projection.series);

        assert_eq!(chart.labels.len(), 10);
        assert_eq!(chart.labels[0], "Year 1");
        assert_eq!(chart.labels[9], "Year 10");
        assert_eq!(chart.datasets[0].label, INVESTED_LABEL);
        assert_eq!(chart.datasets[1].label, VALUE_LABEL);
        assert_eq!(chart.datasets[0].data[9], 600_000.0);
        let values: Vec<f64> = projection.series.iter().map(|r| r.value).collect();
        assert_eq!(chart.datasets[1].data, values);
    }

    #[test]
    fn breakdown_shares_sum_to_hundred() {
        let chart = breakdown_chart(&sample_projection().result);

        assert_eq!(chart.labels, BREAKDOWN_LABELS);
        assert_eq!(chart.data, [600_000, 561_695]);
        assert_eq!(chart.percentages, [51.6, 48.4]);
    }

    #[test]
    fn empty_plan_has_zero_shares() {
        let chart = breakdown_chart(&ProjectionResult {
            total_invested: 0,
            future_value: 0,
            total_gains: 0,
        });
        assert_eq!(chart.percentages, [0.0, 0.0]);
    }

    #[test]
    fn slices_near_i64_max_do_not_overflow_the_total() {
        let chart = breakdown_chart(&ProjectionResult {
            total_invested: i64::MAX,
            future_value: i64::MAX,
            total_gains: i64::MAX,
        });
        assert_eq!(chart.data, [i64::MAX, i64::MAX]);
        assert_eq!(chart.percentages, [50.0, 50.0]);
    }

    #[test]
    fn losses_render_as_empty_gains_slice() {
        let chart = breakdown_chart(&ProjectionResult {
            total_invested: 36_000,
            future_value: 33_000,
            total_gains: -3_000,
        });
        assert_eq!(chart.data, [36_000, 0]);
        assert_eq!(chart.percentages, [100.0, 0.0]);
    }
}
