//! Oracle node service for the Neo N3 blockchain.
//!
//! This crate implements the oracle request pipeline run by every designated
//! oracle node: discovery of pending requests, outbound URL fetching,
//! result filtering, deterministic response transaction construction, and
//! multi-party signature aggregation with peer gossip. The blockchain itself
//! (ledger state, mempool) is reached through the [`ledger::Blockchain`]
//! collaborator trait wired up by the embedding node.

pub mod cryptography;
pub mod io;
pub mod ledger;
pub mod payloads;
pub mod protocols;
pub mod rpc;
pub mod service;
pub mod settings;
pub mod smart_contract;
pub mod types;
pub mod vm;
pub mod wallets;

pub use ledger::{Blockchain, LedgerSnapshot, OracleRequest};
pub use payloads::{OracleResponse, OracleResponseCode, Transaction};
pub use service::{OracleService, OracleServiceError, OracleStatus};
pub use settings::{OracleSettings, UnhandledExceptionPolicy};
