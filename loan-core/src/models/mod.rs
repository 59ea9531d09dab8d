mod estimate;
mod field;

pub use estimate::{FormStatus, PaymentEstimate};
pub use field::Field;
