//! Identifiers: operation codes, capability ids and addresses.
//!
//! Operation codes are the registry's primary key. They are derived from the
//! canonical signature of an operation (`name(type,type)`) by hashing it with
//! SHA-256 and keeping the first four bytes. The `selector!` macro in
//! `switchyard-macros` performs the same derivation at compile time.

use crate::error::ProxyError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

/// A four-byte operation identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct OperationCode([u8; 4]);

impl OperationCode {
    /// Wraps raw bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Derives the code of a canonical signature such as `transferPrincipal(address)`.
    ///
    /// Fails with [`ProxyError::Decode`] when the text is not a well-formed
    /// signature.
    pub fn of(signature: &str) -> Result<Self, ProxyError> {
        validate_signature(signature)?;
        Ok(Self::hash(signature))
    }

    pub(crate) fn hash(signature: &str) -> Self {
        let digest = Sha256::digest(signature.as_bytes());
        Self([digest[0], digest[1], digest[2], digest[3]])
    }

    /// The raw bytes.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Debug for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationCode({self})")
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for OperationCode {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<4>(s).map(Self)
    }
}

/// A four-byte capability identifier advertised through the capability flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CapabilityId([u8; 4]);

impl CapabilityId {
    /// The reserved invalid id. Never reported as supported.
    pub const INVALID: Self = Self([0xff; 4]);

    /// Wraps raw bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The id of a capability made of the given operations: the XOR of all
    /// their codes.
    pub fn of_operations<I>(operations: I) -> Self
    where
        I: IntoIterator<Item = OperationCode>,
    {
        let mut acc = [0u8; 4];
        for op in operations {
            for (a, b) in acc.iter_mut().zip(op.to_bytes()) {
                *a ^= b;
            }
        }
        Self(acc)
    }

    /// The raw bytes.
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl From<OperationCode> for CapabilityId {
    fn from(op: OperationCode) -> Self {
        Self(op.to_bytes())
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityId({self})")
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for CapabilityId {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<4>(s).map(Self)
    }
}

/// Opaque identity of a deployed module, an external principal, or the proxy
/// itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The "absent" sentinel.
    pub const ZERO: Self = Self([0; 20]);

    /// The conventional burn address `0x000000000000000000000000000000000000dead`.
    pub const DEAD: Self = {
        let mut bytes = [0u8; 20];
        bytes[18] = 0xde;
        bytes[19] = 0xad;
        Self(bytes)
    };

    /// Wraps raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// A deterministic address for a named external principal.
    pub fn derive(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Address whose low eight bytes hold `index`. Used by the host to hand
    /// out deployment addresses.
    pub const fn from_index(index: u64) -> Self {
        let mut bytes = [0u8; 20];
        let be = index.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        // Keep generated addresses clear of the burn address and zero.
        bytes[0] = 0x5f;
        Self(bytes)
    }

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The raw bytes.
    pub const fn to_bytes(self) -> [u8; 20] {
        self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<20>(s).map(Self)
    }
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], ProxyError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|e| ProxyError::Decode(format!("`{s}`: {e}")))?;
    Ok(out)
}

/// Checks that `signature` looks like `name(type,type,...)`.
pub(crate) fn validate_signature(signature: &str) -> Result<(), ProxyError> {
    let invalid = |why: &str| ProxyError::Decode(format!("invalid signature `{signature}`: {why}"));

    let Some(open) = signature.find('(') else {
        return Err(invalid("missing `(`"));
    };
    if !signature.ends_with(')') {
        return Err(invalid("must end with `)`"));
    }
    let name = &signature[..open];
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return Err(invalid("name must start with a letter or `_`")),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("name must be alphanumeric"));
    }
    if signature.chars().any(char::is_whitespace) {
        return Err(invalid("whitespace is not canonical"));
    }
    Ok(())
}
