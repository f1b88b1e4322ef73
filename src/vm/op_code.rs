//! The NeoVM opcodes emitted by script construction, matching the C# Neo
//! implementation values exactly.

/// The subset of NeoVM opcodes this crate emits.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Push a signed 8-bit integer onto the stack.
    PUSHINT8 = 0x00,
    /// Push data with 1-byte length prefix onto the stack.
    PUSHDATA1 = 0x0C,
    /// Push data with 2-byte length prefix onto the stack.
    PUSHDATA2 = 0x0D,
    /// Push data with 4-byte length prefix onto the stack.
    PUSHDATA4 = 0x0E,
    /// Push the integer -1 onto the stack.
    PUSHM1 = 0x0F,
    /// Push the integer 0 onto the stack.
    PUSH0 = 0x10,
    /// Push the integer 15 onto the stack.
    PUSH15 = 0x1F,
    /// Push the integer 16 onto the stack.
    PUSH16 = 0x20,
    /// Call an interop service.
    SYSCALL = 0x41,
    /// Push an empty array onto the stack.
    NEWARRAY0 = 0xC2,
}
