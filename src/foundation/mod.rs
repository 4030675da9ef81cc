pub mod core;
pub mod error;
pub mod id_name_map;
pub mod ids;
