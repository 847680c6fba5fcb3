//! intake-domain
//!
//! Pure domain models for member case intake (categories, form record, case payloads).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod case;
pub mod category;
pub mod error;
pub mod form;

pub use case::*;
pub use category::*;
pub use error::ParseValueError;
pub use form::*;
