//! # Diner Core
//!
//! The domain layer of the Digital Diner backend.
//! Menu and order entities, the input validators that guard them, and the
//! ports the infrastructure crate implements. No I/O happens here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::RepoError;
pub use validation::FieldError;
