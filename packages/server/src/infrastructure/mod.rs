//! Infrastructure layer
//!
//! DTOs for the wire formats and the transport implementation used by the
//! use case layer.

pub mod dto;
pub mod transport;

pub use transport::{ConnectionHub, Transport};
