pub mod aggregate;
pub mod inputs;
pub mod monthly;
pub mod summary;
