//! Salted, reversible encoding of numeric identifiers into opaque strings.
//!
//! Record identifiers are never exposed in their numeric form. The
//! [`OpaqueIdCodec`] turns them into short, non-sequential strings using the
//! hashids scheme as implemented by [`harsh`]: a salt drives a deterministic
//! shuffle of a fixed alphabet, and a minimum length pads short outputs with
//! alphabet characters.
//!
//! The salt and minimum length must be identical for every process sharing a
//! database. Changing the salt invalidates every previously issued identifier.
//!
//! Identifiers are restricted to `1..=`[`MAX_ID`], the positive range of a
//! signed 64-bit column.
//!
//! ```
//! use opaque_id::OpaqueIdCodec;
//!
//! let codec = OpaqueIdCodec::new("pepper", 10)?;
//! let opaque = codec.encode(42)?;
//! assert!(opaque.len() >= 10);
//! assert_eq!(codec.decode(&opaque)?, 42);
//! # Ok::<(), opaque_id::OpaqueIdError>(())
//! ```

mod codec;
mod error;

pub use codec::{MAX_ID, OpaqueIdCodec};
pub use error::OpaqueIdError;
