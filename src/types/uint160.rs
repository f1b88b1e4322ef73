// Copyright (C) 2015-2025 The Neo Project.
//
// uint160.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of UInt160, a 160-bit unsigned integer.

use super::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The length of UInt160 values in bytes.
pub const UINT160_SIZE: usize = 20;

/// Represents a 160-bit unsigned integer, stored in little-endian order.
///
/// Used for account and contract script hashes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UInt160([u8; UINT160_SIZE]);

impl UInt160 {
    /// Returns a zero UInt160.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Checks if this UInt160 is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Creates a UInt160 from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TypeError> {
        if data.len() != UINT160_SIZE {
            return Err(TypeError::InvalidLength {
                expected: UINT160_SIZE,
                actual: data.len(),
            });
        }
        let mut bytes = [0u8; UINT160_SIZE];
        bytes.copy_from_slice(data);
        Ok(Self(bytes))
    }

    /// Returns the bytes representation of this UInt160.
    pub fn as_bytes(&self) -> &[u8; UINT160_SIZE] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub fn to_array(&self) -> [u8; UINT160_SIZE] {
        self.0
    }
}

impl From<[u8; UINT160_SIZE]> for UInt160 {
    fn from(bytes: [u8; UINT160_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for UInt160 {
    /// Big-endian hex with `0x` prefix, matching the C# string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "0x{}", hex::encode(reversed))
    }
}

impl fmt::Debug for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt160({self})")
    }
}

impl FromStr for UInt160 {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(trimmed).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }
}
