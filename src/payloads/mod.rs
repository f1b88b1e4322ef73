//! Network payload types for oracle response transactions.

mod helper;
mod oracle_response;
mod oracle_response_code;
mod signer;
mod transaction;
mod witness;
mod witness_scope;

pub use helper::get_sign_data;
pub use oracle_response::{OracleResponse, MAX_RESULT_SIZE};
pub use oracle_response_code::OracleResponseCode;
pub use signer::Signer;
pub use transaction::{Transaction, TransactionAttribute, HEADER_SIZE};
pub use witness::Witness;
pub use witness_scope::WitnessScope;
