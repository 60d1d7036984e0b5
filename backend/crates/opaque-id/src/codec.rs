//! Encoding and decoding of single identifiers.

use std::fmt;
use std::sync::Arc;

use harsh::Harsh;

use crate::error::OpaqueIdError;

/// Largest identifier the codec accepts: the signed 64-bit maximum.
///
/// The backing store keeps identifiers in a signed column, so the unsigned
/// high bit is never a valid identifier.
pub const MAX_ID: u64 = i64::MAX.unsigned_abs();

/// Salted codec translating numeric identifiers to opaque strings and back.
///
/// Construct one per process from configuration and share it by reference.
/// Clones share the underlying tables.
#[derive(Clone)]
pub struct OpaqueIdCodec {
    harsh: Arc<Harsh>,
    min_length: usize,
}

impl fmt::Debug for OpaqueIdCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The salt is a secret; keep it out of logs.
        f.debug_struct("OpaqueIdCodec")
            .field("min_length", &self.min_length)
            .finish_non_exhaustive()
    }
}

impl OpaqueIdCodec {
    /// Build a codec for `salt`, padding every output to at least
    /// `min_length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueIdError::EmptySalt`] when `salt` is blank and
    /// [`OpaqueIdError::Build`] when the hashids tables cannot be derived.
    pub fn new(salt: &str, min_length: usize) -> Result<Self, OpaqueIdError> {
        if salt.trim().is_empty() {
            return Err(OpaqueIdError::EmptySalt);
        }
        let harsh = Harsh::builder()
            .salt(salt)
            .length(min_length)
            .build()
            .map_err(|err| OpaqueIdError::Build(err.to_string()))?;
        Ok(Self {
            harsh: Arc::new(harsh),
            min_length,
        })
    }

    /// Minimum length of every encoded identifier.
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Encode `id` into its opaque form.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueIdError::OutOfRange`] when `id` exceeds [`MAX_ID`].
    pub fn encode(&self, id: u64) -> Result<String, OpaqueIdError> {
        if id > MAX_ID {
            return Err(OpaqueIdError::OutOfRange { id });
        }
        Ok(self.harsh.encode(&[id]))
    }

    /// Decode an opaque string produced by [`OpaqueIdCodec::encode`].
    ///
    /// The decoded value is re-encoded and compared with the input, so
    /// strings produced under another salt or minimum length are rejected
    /// instead of yielding a different identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueIdError::Invalid`] for any string this codec did not
    /// produce.
    pub fn decode(&self, opaque: &str) -> Result<u64, OpaqueIdError> {
        let values = self
            .harsh
            .decode(opaque)
            .map_err(|_| OpaqueIdError::Invalid)?;
        let id = match values.as_slice() {
            [id] if *id <= MAX_ID => *id,
            _ => return Err(OpaqueIdError::Invalid),
        };
        if self.harsh.encode(&[id]) != opaque {
            return Err(OpaqueIdError::Invalid);
        }
        Ok(id)
    }
}
