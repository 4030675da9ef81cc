//! Event type registry.

pub mod specification;

pub use specification::{DefaultActionPhase, EventSpecification, EventSpecificationTable};
