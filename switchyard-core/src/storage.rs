//! Keyed persistent storage owned by the proxy.
//!
//! Modules keep their business state here instead of in themselves, so the
//! state survives module replacement. Keys are namespaced byte strings.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

use crate::{codec, error::ProxyError};

/// Namespaced key-value storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage {
    slots: BTreeMap<(String, Bytes), Bytes>,
}

impl Storage {
    /// Read a raw value.
    pub fn get(&self, namespace: &str, key: &[u8]) -> Option<&Bytes> {
        self.slots
            .get(&(namespace.to_owned(), Bytes::copy_from_slice(key)))
    }

    /// Write a raw value, returning the previous one.
    pub fn insert(
        &mut self,
        namespace: &str,
        key: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Option<Bytes> {
        self.slots
            .insert((namespace.to_owned(), key.into()), value.into())
    }

    /// Delete a value.
    pub fn remove(&mut self, namespace: &str, key: &[u8]) -> Option<Bytes> {
        self.slots
            .remove(&(namespace.to_owned(), Bytes::copy_from_slice(key)))
    }

    /// Read and decode a typed value.
    pub fn load<T: DeserializeOwned>(
        &self,
        namespace: &str,
        key: &[u8],
    ) -> Result<Option<T>, ProxyError> {
        self.get(namespace, key)
            .map(|raw| codec::decode(raw))
            .transpose()
    }

    /// Encode and write a typed value.
    pub fn store<T: Serialize>(
        &mut self,
        namespace: &str,
        key: impl Into<Bytes>,
        value: &T,
    ) -> Result<(), ProxyError> {
        let raw = codec::encode(value)?;
        self.insert(namespace, key, raw);
        Ok(())
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
