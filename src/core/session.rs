use super::engine::project;
use super::types::{Projection, ProjectionError, SipInputs};

/// Input fields as the user edits them. `None` means the field is blank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputFields {
    pub monthly_amount: Option<f64>,
    pub years: Option<u32>,
    pub annual_return_percent: Option<f64>,
}

impl InputFields {
    pub fn complete(&self) -> Option<SipInputs> {
        Some(SipInputs {
            monthly_amount: self.monthly_amount?,
            years: self.years?,
            annual_return_percent: self.annual_return_percent?,
        })
    }
}

impl From<SipInputs> for InputFields {
    fn from(inputs: SipInputs) -> Self {
        Self {
            monthly_amount: Some(inputs.monthly_amount),
            years: Some(inputs.years),
            annual_return_percent: Some(inputs.annual_return_percent),
        }
    }
}

/// Holds the live inputs and the latest projection snapshot.
///
/// Every edit that leaves all three fields filled recomputes synchronously
/// and replaces the snapshot wholesale. While a field is blank the previous
/// snapshot stays on screen.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    fields: InputFields,
    snapshot: Option<Projection>,
    last_error: Option<ProjectionError>,
    generation: u64,
}

impl CalculatorSession {
    pub fn new(inputs: SipInputs) -> Self {
        let mut session = Self {
            fields: inputs.into(),
            snapshot: None,
            last_error: None,
            generation: 0,
        };
        session.recompute();
        session
    }

    pub fn fields(&self) -> InputFields {
        self.fields
    }

    pub fn snapshot(&self) -> Option<&Projection> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&ProjectionError> {
        self.last_error.as_ref()
    }

    /// Bumped whenever the snapshot is replaced. The interactive report
    /// redraws only when it moves.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_monthly_amount(&mut self, value: Option<f64>) -> bool {
        self.fields.monthly_amount = value;
        self.recompute()
    }

    pub fn set_years(&mut self, value: Option<u32>) -> bool {
        self.fields.years = value;
        self.recompute()
    }

    pub fn set_annual_return_percent(&mut self, value: Option<f64>) -> bool {
        self.fields.annual_return_percent = value;
        self.recompute()
    }

    /// Returns true when a new snapshot replaced the old one.
    fn recompute(&mut self) -> bool {
        let Some(inputs) = self.fields.complete() else {
            return false;
        };
        match project(&inputs) {
            Ok(projection) => {
                self.snapshot = Some(projection);
                self.last_error = None;
                self.generation += 1;
                true
            }
            Err(err) => {
                tracing::debug!(%err, "projection rejected");
                self.snapshot = None;
                self.last_error = Some(err);
                false
            }
        }
    }
}
