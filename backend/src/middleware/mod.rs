//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route. Bearer
//! authentication lives with the HTTP adapter because it depends on the
//! identity port.

pub mod trace;

pub use trace::Trace;
