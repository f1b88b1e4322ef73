//! Verification execution costs for contract accounts.
//!
//! Prices mirror the C# `ApplicationEngine` opcode price table for the
//! opcodes appearing in signature redeem scripts, in datoshi.

const OPCODE_PRICE_PUSHDATA1: i64 = 1 << 3;
const OPCODE_PRICE_PUSHINT8: i64 = 1 << 0;
const OPCODE_PRICE_SYSCALL: i64 = 0;

/// Execution price of the `CheckSig` interop, per key checked.
pub const CHECK_SIG_PRICE: i64 = 1 << 15;

/// Cost of executing a single-signature verification script.
pub fn signature_contract_cost() -> i64 {
    OPCODE_PRICE_PUSHDATA1 * 2 + OPCODE_PRICE_SYSCALL + CHECK_SIG_PRICE
}

/// Cost of executing an M-of-N multi-signature verification script.
pub fn multi_signature_contract_cost(m: usize, n: usize) -> i64 {
    OPCODE_PRICE_PUSHDATA1 * (m + n) as i64
        + OPCODE_PRICE_PUSHINT8 * 2
        + OPCODE_PRICE_SYSCALL
        + CHECK_SIG_PRICE * n as i64
}
