//! Request and response shapes.

use crate::{codec, error::ProxyError, event::ProxyEvent, id::OperationCode};
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

/// An encoded request: a four-byte operation code followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calldata {
    selector: OperationCode,
    args: Bytes,
}

impl Calldata {
    /// Build from a selector and already-encoded arguments.
    pub fn new(selector: OperationCode, args: impl Into<Bytes>) -> Self {
        Self {
            selector,
            args: args.into(),
        }
    }

    /// Build with no arguments.
    pub fn bare(selector: OperationCode) -> Self {
        Self::new(selector, Bytes::new())
    }

    /// Build from a selector and arguments encoded with the payload codec.
    pub fn encode<T: Serialize + ?Sized>(
        selector: OperationCode,
        args: &T,
    ) -> Result<Self, ProxyError> {
        Ok(Self::new(selector, codec::encode(args)?))
    }

    /// Split a wire payload. Payloads shorter than four bytes are zero-padded
    /// into the selector.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut selector = [0u8; 4];
        let n = raw.len().min(4);
        selector[..n].copy_from_slice(&raw[..n]);
        Self {
            selector: OperationCode::from_bytes(selector),
            args: Bytes::copy_from_slice(&raw[n..]),
        }
    }

    /// The wire form: `selector ‖ args`.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(4 + self.args.len());
        buf.put_slice(&self.selector.to_bytes());
        buf.put_slice(&self.args);
        buf.freeze()
    }

    /// The operation code.
    pub fn selector(&self) -> OperationCode {
        self.selector
    }

    /// The encoded arguments.
    pub fn args(&self) -> &Bytes {
        &self.args
    }

    /// Decode the arguments with the payload codec.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProxyError> {
        codec::decode(&self.args)
    }
}

impl From<&[u8]> for Calldata {
    fn from(raw: &[u8]) -> Self {
        Self::from_bytes(raw)
    }
}

/// The outcome of a committed top-level call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// What the dispatched operation returned.
    pub output: Bytes,
    /// Events emitted during the call, in order.
    pub events: Vec<ProxyEvent>,
}

impl Receipt {
    /// Decode the output with the payload codec.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProxyError> {
        codec::decode(&self.output)
    }
}
