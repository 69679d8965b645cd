pub mod json_import;
pub mod model;

pub use json_import::*;
pub use model::*;
