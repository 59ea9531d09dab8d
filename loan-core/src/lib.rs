pub mod calculations;
pub mod form;
pub mod models;
pub mod store;

pub use form::{FormController, FormEvent, FormState, FormView};
pub use models::*;
pub use store::{PreferenceStore, StoreError};
