use super::types::{Projection, ProjectionError, ProjectionResult, SipInputs, YearlyRecord};

const MONTHS_PER_YEAR: u64 = 12;

// 2^63; every finite f64 strictly below it rounds into i64.
const MAX_CURRENCY: f64 = i64::MAX as f64;

pub fn project(inputs: &SipInputs) -> Result<Projection, ProjectionError> {
    validate(inputs)?;

    let rate = monthly_rate(inputs.annual_return_percent);
    let mut series = Vec::with_capacity(inputs.years as usize);
    for year in 1..=inputs.years {
        let months = u64::from(year) * MONTHS_PER_YEAR;
        let invested = invested_at(inputs.monthly_amount, months);
        let value = future_value_at(inputs.monthly_amount, rate, months);
        series.push(YearlyRecord {
            year,
            invested,
            value,
            gains: value - invested,
        });
    }

    let total_months = u64::from(inputs.years) * MONTHS_PER_YEAR;
    let total_invested = invested_at(inputs.monthly_amount, total_months);
    let future_value = future_value_at(inputs.monthly_amount, rate, total_months);
    let total_gains = future_value - total_invested;

    if !in_currency_range(total_invested) {
        return Err(ProjectionError::InvalidInput {
            field: "monthlyAmount",
            reason: "total invested is out of range for this horizon",
        });
    }
    if !in_currency_range(future_value) || !in_currency_range(total_gains) {
        // Blame the rate only when growth alone leaves the range.
        let field = if in_currency_range(future_value_at(1.0, rate, total_months)) {
            "monthlyAmount"
        } else {
            "annualReturnPercent"
        };
        return Err(ProjectionError::InvalidInput {
            field,
            reason: "future value is out of range for this horizon",
        });
    }

    // Gains come from the unrounded pair, so they may differ by one unit from
    // round(future_value) - round(total_invested).
    let result = ProjectionResult {
        total_invested: round_currency(total_invested),
        future_value: round_currency(future_value),
        total_gains: round_currency(total_gains),
    };

    Ok(Projection { result, series })
}

pub fn monthly_rate(annual_return_percent: f64) -> f64 {
    annual_return_percent / 100.0 / 12.0
}

pub fn invested_at(monthly_amount: f64, months: u64) -> f64 {
    monthly_amount * months as f64
}

/// Annuity-due future value: each contribution compounds from the start of its month.
pub fn future_value_at(monthly_amount: f64, monthly_rate: f64, months: u64) -> f64 {
    if monthly_rate == 0.0 {
        return invested_at(monthly_amount, months);
    }
    let growth = (1.0 + monthly_rate).powf(months as f64);
    monthly_amount * ((growth - 1.0) / monthly_rate) * (1.0 + monthly_rate)
}

/// Half away from zero. Saturates outside the `i64` range; `project` never
/// hands it a total that far out.
pub fn round_currency(amount: f64) -> i64 {
    amount.round() as i64
}

fn in_currency_range(amount: f64) -> bool {
    amount.is_finite() && amount.abs() < MAX_CURRENCY
}

fn validate(inputs: &SipInputs) -> Result<(), ProjectionError> {
    if inputs.years == 0 {
        return Err(ProjectionError::InvalidInput {
            field: "years",
            reason: "must be at least 1",
        });
    }
    if !inputs.monthly_amount.is_finite() {
        return Err(ProjectionError::InvalidInput {
            field: "monthlyAmount",
            reason: "must be a finite number",
        });
    }
    if inputs.monthly_amount < 0.0 {
        return Err(ProjectionError::InvalidInput {
            field: "monthlyAmount",
            reason: "must not be negative",
        });
    }
    if !inputs.annual_return_percent.is_finite() {
        return Err(ProjectionError::InvalidInput {
            field: "annualReturnPercent",
            reason: "must be a finite number",
        });
    }
    Ok(())
}
