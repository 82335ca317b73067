pub mod error;
pub mod params;
pub mod payment;
pub mod table;
pub mod types;

pub use error::NoteError;
pub use params::NoteParameters;
pub use types::*;

/// Standard result type for all note computations
pub type NoteResult<T> = Result<T, NoteError>;
