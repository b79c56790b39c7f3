pub mod diagrams;
pub mod error;
