use serde::{Deserialize, Serialize};

/// Amounts derived from one valid set of inputs.
///
/// Always recomputed from the fields; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentEstimate {
    pub down_payment: f64,
    pub monthly_payment: f64,
}

/// Effective state of the whole form after an update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FormStatus {
    /// At least one field is invalid; results are zeroed and hidden.
    ResultsHidden,
    /// All three fields are valid and the results are on display.
    ResultsShown(PaymentEstimate),
}

impl FormStatus {
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::ResultsShown(_))
    }

    pub fn estimate(&self) -> Option<PaymentEstimate> {
        match self {
            Self::ResultsShown(estimate) => Some(*estimate),
            Self::ResultsHidden => None,
        }
    }
}
