// Copyright (C) 2015-2025 The Neo Project.
//
// uint256.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of UInt256, a 256-bit unsigned integer.

use super::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The length of UInt256 values in bytes.
pub const UINT256_SIZE: usize = 32;

/// Represents a 256-bit unsigned integer, stored in little-endian order.
///
/// Used for transaction and block hashes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UInt256([u8; UINT256_SIZE]);

impl UInt256 {
    /// Returns a zero UInt256.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates a UInt256 from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TypeError> {
        if data.len() != UINT256_SIZE {
            return Err(TypeError::InvalidLength {
                expected: UINT256_SIZE,
                actual: data.len(),
            });
        }
        let mut bytes = [0u8; UINT256_SIZE];
        bytes.copy_from_slice(data);
        Ok(Self(bytes))
    }

    /// Returns the bytes representation of this UInt256.
    pub fn as_bytes(&self) -> &[u8; UINT256_SIZE] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub fn to_array(&self) -> [u8; UINT256_SIZE] {
        self.0
    }
}

impl From<[u8; UINT256_SIZE]> for UInt256 {
    fn from(bytes: [u8; UINT256_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "0x{}", hex::encode(reversed))
    }
}

impl fmt::Debug for UInt256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt256({self})")
    }
}

impl FromStr for UInt256 {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(trimmed).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }
}
