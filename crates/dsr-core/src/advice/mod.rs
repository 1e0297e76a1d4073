pub mod generator;
pub mod prompt;
