//! The bands resource: validation and business logic over a `BandStore`.

pub mod service;
pub mod validate;

pub use service::{BandService, CreateBandError};
pub use validate::{FieldError, ValidationError};
