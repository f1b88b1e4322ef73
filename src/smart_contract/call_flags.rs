//! Contract call permission flags.

use bitflags::bitflags;

bitflags! {
    /// Execution permissions carried by a contract call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CallFlags: u8 {
        const READ_STATES = 0b0000_0001;
        const WRITE_STATES = 0b0000_0010;
        const ALLOW_CALL = 0b0000_0100;
        const ALLOW_NOTIFY = 0b0000_1000;
        const STATES = Self::READ_STATES.bits() | Self::WRITE_STATES.bits();
        const READ_ONLY = Self::READ_STATES.bits() | Self::ALLOW_CALL.bits();
        const ALL = Self::STATES.bits() | Self::ALLOW_CALL.bits() | Self::ALLOW_NOTIFY.bits();
    }
}
