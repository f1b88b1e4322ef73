// Copyright (C) 2015-2025 The Neo Project.
//
// witness_scope.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use bitflags::bitflags;

bitflags! {
    /// Restricts where a signer's witness is valid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WitnessScope: u8 {
        /// Only the transaction itself is witnessed; used for the native
        /// Oracle contract signer on response transactions.
        const NONE = 0x00;
        const CALLED_BY_ENTRY = 0x01;
        const CUSTOM_CONTRACTS = 0x10;
        const CUSTOM_GROUPS = 0x20;
        const WITNESS_RULES = 0x40;
        const GLOBAL = 0x80;
    }
}
