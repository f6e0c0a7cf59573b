pub mod args;
pub mod error;
pub mod inference;
pub mod model;
pub mod utils;
