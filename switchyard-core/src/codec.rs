//! Payload codec.
//!
//! Arguments and return values of the standard operations are encoded with
//! `postcard`. Custom modules are free to use any encoding for their own
//! operations; only the four-byte selector prefix is fixed.

use crate::error::ProxyError;
use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

/// Encode a value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, ProxyError> {
    Ok(Bytes::from(postcard::to_stdvec(value)?))
}

/// Decode a value, rejecting trailing bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProxyError> {
    let (value, rest) = postcard::take_from_bytes(bytes)?;
    if !rest.is_empty() {
        return Err(ProxyError::Decode(format!(
            "{} trailing bytes after payload",
            rest.len()
        )));
    }
    Ok(value)
}
