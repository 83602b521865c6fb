mod charts;
mod engine;
mod format;
mod session;
mod types;

pub use charts::{BreakdownChart, Dataset, GrowthChart, breakdown_chart, growth_chart};
pub use engine::{future_value_at, invested_at, monthly_rate, project, round_currency};
pub use format::{format_inr, format_lakhs};
pub use session::{CalculatorSession, InputFields};
pub use types::{Projection, ProjectionError, ProjectionResult, SipInputs, YearlyRecord};
