//! Access-control service layer.

pub mod validation;

pub use validation::PathValidator;
