pub mod amortization;
pub mod engine;
pub mod params;
pub mod ratio;
pub mod schedule;
pub mod summary;
