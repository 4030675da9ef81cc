//! Data binding: values, the model interface, filters, and compiled expressions.

pub mod address;
pub mod expression;
pub mod filters;
pub mod model;
pub mod text;
pub mod variant;

pub use address::{AddressEntry, DataAddress};
pub use expression::{DataExpression, ParseMode};
pub use filters::{FilterId, FilterRegistry};
pub use model::{DataModel, DataStore, Variables};
pub use text::TextBinding;
pub use variant::Variant;
