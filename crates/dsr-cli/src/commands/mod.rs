pub mod advice;
pub mod dsr;
