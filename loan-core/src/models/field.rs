use serde::{Deserialize, Serialize};

/// The three user-editable inputs of the estimator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    SalesPrice,
    Apr,
    NumPayments,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 3] = [Field::SalesPrice, Field::Apr, Field::NumPayments];

    /// Key under which the raw field value is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::SalesPrice => "salesPrice",
            Self::Apr => "apr",
            Self::NumPayments => "numPayments",
        }
    }

    /// Human-readable name used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SalesPrice => "sales price",
            Self::Apr => "APR",
            Self::NumPayments => "number of payments",
        }
    }

    /// Looks a field up by its storage key.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "salesPrice" => Some(Self::SalesPrice),
            "apr" => Some(Self::Apr),
            "numPayments" => Some(Self::NumPayments),
            _ => None,
        }
    }
}
