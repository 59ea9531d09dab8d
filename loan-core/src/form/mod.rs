//! Form handling: field parsing, validation, the view abstraction and the
//! controller that ties them to the calculator and the preference store.

pub mod amount;
pub mod controller;
pub mod validation;
pub mod view;

pub use amount::{format_amount, parse_amount, parse_count, parse_rate};
pub use controller::{FormController, FormEvent};
pub use validation::{ValidationError, validate_field};
pub use view::{
    DEFAULT_APR_OPTIONS, DEFAULT_NUM_PAYMENTS_OPTIONS, FormDefaults, FormState, FormView, Selector,
};
