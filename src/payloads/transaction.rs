// Copyright (C) 2015-2025 The Neo Project.
//
// transaction.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::{OracleResponse, Signer, Witness};
use crate::cryptography::sha256;
use crate::io::{get_var_size, var_bytes_size, BinaryWriter, IoResult, Serializable};
use crate::types::{UInt160, UInt256};

/// Fixed header size: version, nonce, system fee, network fee,
/// valid-until-block.
pub const HEADER_SIZE: usize = 1 + 4 + 8 + 8 + 4;

/// Transaction attributes carried by oracle response transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAttribute {
    OracleResponse(OracleResponse),
}

impl TransactionAttribute {
    /// The wire type byte of this attribute.
    pub fn attribute_type(&self) -> u8 {
        match self {
            TransactionAttribute::OracleResponse(_) => 0x11,
        }
    }

    /// The oracle response payload, if this is a response attribute.
    pub fn as_oracle_response(&self) -> Option<&OracleResponse> {
        match self {
            TransactionAttribute::OracleResponse(response) => Some(response),
        }
    }
}

impl Serializable for TransactionAttribute {
    fn size(&self) -> usize {
        match self {
            TransactionAttribute::OracleResponse(response) => 1 + response.size(),
        }
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.attribute_type());
        match self {
            TransactionAttribute::OracleResponse(response) => {
                response.serialize_without_type(writer)
            }
        }
    }
}

/// A Neo N3 transaction.
///
/// Response transactions are constructed field-by-field by the oracle
/// service; the hash is recomputed from the unsigned serialization on
/// demand, so identical inputs always produce identical hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    pub system_fee: i64,
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub signers: Vec<Signer>,
    pub attributes: Vec<TransactionAttribute>,
    pub script: Vec<u8>,
    pub witnesses: Vec<Witness>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    /// Creates an empty version-0 transaction.
    pub fn new() -> Self {
        Self {
            version: 0,
            nonce: 0,
            system_fee: 0,
            network_fee: 0,
            valid_until_block: 0,
            signers: Vec::new(),
            attributes: Vec::new(),
            script: Vec::new(),
            witnesses: Vec::new(),
        }
    }

    pub fn valid_until_block(&self) -> u32 {
        self.valid_until_block
    }

    pub fn network_fee(&self) -> i64 {
        self.network_fee
    }

    pub fn system_fee(&self) -> i64 {
        self.system_fee
    }

    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    pub fn attributes(&self) -> &[TransactionAttribute] {
        &self.attributes
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn witnesses(&self) -> &[Witness] {
        &self.witnesses
    }

    pub fn set_witnesses(&mut self, witnesses: Vec<Witness>) {
        self.witnesses = witnesses;
    }

    /// The oracle response attribute, if present.
    pub fn oracle_response(&self) -> Option<&OracleResponse> {
        self.attributes
            .iter()
            .find_map(TransactionAttribute::as_oracle_response)
    }

    /// Serializes the unsigned portion (everything except witnesses).
    pub fn serialize_unsigned(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u8(self.version);
        writer.write_u32(self.nonce);
        writer.write_i64(self.system_fee);
        writer.write_i64(self.network_fee);
        writer.write_u32(self.valid_until_block);
        writer.write_var_int(self.signers.len() as u64);
        for signer in &self.signers {
            signer.serialize(writer)?;
        }
        writer.write_var_int(self.attributes.len() as u64);
        for attribute in &self.attributes {
            attribute.serialize(writer)?;
        }
        writer.write_var_bytes(&self.script);
        Ok(())
    }

    /// The transaction hash: SHA-256 over the unsigned serialization.
    pub fn hash(&self) -> UInt256 {
        let mut writer = BinaryWriter::new();
        // Unsigned serialization of a well-formed response tx cannot fail;
        // oversized results are rejected by the builder before this point.
        if self.serialize_unsigned(&mut writer).is_err() {
            return UInt256::zero();
        }
        UInt256::from(sha256(&writer.into_inner()))
    }

    /// Script hashes that must be witnessed, in signer order. Witness slots
    /// are positional against this list.
    pub fn script_hashes_for_verifying(&self) -> Vec<UInt160> {
        self.signers.iter().map(|signer| signer.account).collect()
    }
}

impl Serializable for Transaction {
    fn size(&self) -> usize {
        HEADER_SIZE
            + get_var_size(self.signers.len() as u64)
            + self.signers.iter().map(Serializable::size).sum::<usize>()
            + get_var_size(self.attributes.len() as u64)
            + self.attributes.iter().map(Serializable::size).sum::<usize>()
            + var_bytes_size(self.script.len())
            + get_var_size(self.witnesses.len() as u64)
            + self.witnesses.iter().map(Serializable::size).sum::<usize>()
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        self.serialize_unsigned(writer)?;
        writer.write_var_int(self.witnesses.len() as u64);
        for witness in &self.witnesses {
            witness.serialize(writer)?;
        }
        Ok(())
    }
}
