//! Contract account construction and verification cost helpers.

mod call_flags;
mod contract;
mod helper;

pub use call_flags::CallFlags;
pub use contract::{Contract, ContractParameterType};
pub use helper::{multi_signature_contract_cost, signature_contract_cost};
