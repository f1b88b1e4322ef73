//! Minimal NeoVM script construction support.
//!
//! The service only ever emits scripts (redeem scripts and the fixed oracle
//! response script); execution happens on the blockchain side.

mod op_code;
mod script_builder;

pub use op_code::OpCode;
pub use script_builder::ScriptBuilder;
