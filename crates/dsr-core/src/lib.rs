pub mod error;
pub mod types;

#[cfg(feature = "dsr")]
pub mod dsr;

#[cfg(feature = "advice")]
pub mod advice;

pub use error::DsrError;
pub use types::*;

/// Standard result type for all DSR operations
pub type DsrResult<T> = Result<T, DsrError>;
