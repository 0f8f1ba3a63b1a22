// Floor-plan Export - Core Library

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
