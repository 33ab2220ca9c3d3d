//! Kitstore domain rules.
//!
//! Holds everything the API server needs that does not touch HTTP or the
//! database: the shared error type, kit form field parsing and validation,
//! and the local image store that receives uploads.

pub mod error;
pub mod kit;
pub mod types;
pub mod upload;
