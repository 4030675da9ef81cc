//! Style property registry, shorthand expansion, and per-element cascade state.

pub mod color;
pub mod definition;
pub mod dirty;
pub mod element_style;
pub mod iterator;
pub mod parsers;
pub mod property;
pub mod sheet_spec;
pub mod specification;
