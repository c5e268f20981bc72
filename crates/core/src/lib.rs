//! `timeportal-core`: shared foundation for the access engine.
//!
//! This crate carries no IO: only the error model and the clock seam.

pub mod clock;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, DomainResult};
