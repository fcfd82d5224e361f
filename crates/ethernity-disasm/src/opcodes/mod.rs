//! Static EVM opcode table.
//!
//! Every byte value maps to an [`OpcodeEntry`]. Bytes with no assigned
//! instruction resolve to [`UNKNOWN`], so lookup is total and never fails.

/// First opcode of the `PUSHn` family carrying an immediate (`PUSH1`).
pub const PUSH1: u8 = 0x60;
/// Last opcode of the `PUSHn` family (`PUSH32`).
pub const PUSH32: u8 = 0x7f;

/// Mnemonic and immediate operand size of a single opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub operand_len: u8,
    /// `false` only for the [`UNKNOWN`] sentinel.
    pub defined: bool,
}

/// Sentinel entry for bytes the instruction set leaves unassigned.
pub const UNKNOWN: OpcodeEntry = OpcodeEntry { mnemonic: "UNKNOWN", operand_len: 0, defined: false };

const fn op(mnemonic: &'static str) -> OpcodeEntry {
    OpcodeEntry { mnemonic, operand_len: 0, defined: true }
}

const PUSH_NAMES: [&str; 32] = [
    "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8",
    "PUSH9", "PUSH10", "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16",
    "PUSH17", "PUSH18", "PUSH19", "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24",
    "PUSH25", "PUSH26", "PUSH27", "PUSH28", "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_NAMES: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8",
    "DUP9", "DUP10", "DUP11", "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_NAMES: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8",
    "SWAP9", "SWAP10", "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG_NAMES: [&str; 5] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

const fn build_table() -> [OpcodeEntry; 256] {
    let mut t = [UNKNOWN; 256];

    // 0x00: stop and arithmetic
    t[0x00] = op("STOP");
    t[0x01] = op("ADD");
    t[0x02] = op("MUL");
    t[0x03] = op("SUB");
    t[0x04] = op("DIV");
    t[0x05] = op("SDIV");
    t[0x06] = op("MOD");
    t[0x07] = op("SMOD");
    t[0x08] = op("ADDMOD");
    t[0x09] = op("MULMOD");
    t[0x0a] = op("EXP");
    t[0x0b] = op("SIGNEXTEND");

    // 0x10: comparison and bitwise
    t[0x10] = op("LT");
    t[0x11] = op("GT");
    t[0x12] = op("SLT");
    t[0x13] = op("SGT");
    t[0x14] = op("EQ");
    t[0x15] = op("ISZERO");
    t[0x16] = op("AND");
    t[0x17] = op("OR");
    t[0x18] = op("XOR");
    t[0x19] = op("NOT");
    t[0x1a] = op("BYTE");
    t[0x1b] = op("SHL");
    t[0x1c] = op("SHR");
    t[0x1d] = op("SAR");

    t[0x20] = op("SHA3");

    // 0x30: environment
    t[0x30] = op("ADDRESS");
    t[0x31] = op("BALANCE");
    t[0x32] = op("ORIGIN");
    t[0x33] = op("CALLER");
    t[0x34] = op("CALLVALUE");
    t[0x35] = op("CALLDATALOAD");
    t[0x36] = op("CALLDATASIZE");
    t[0x37] = op("CALLDATACOPY");
    t[0x38] = op("CODESIZE");
    t[0x39] = op("CODECOPY");
    t[0x3a] = op("GASPRICE");
    t[0x3b] = op("EXTCODESIZE");
    t[0x3c] = op("EXTCODECOPY");
    t[0x3d] = op("RETURNDATASIZE");
    t[0x3e] = op("RETURNDATACOPY");
    t[0x3f] = op("EXTCODEHASH");

    // 0x40: block context
    t[0x40] = op("BLOCKHASH");
    t[0x41] = op("COINBASE");
    t[0x42] = op("TIMESTAMP");
    t[0x43] = op("NUMBER");
    t[0x44] = op("DIFFICULTY");
    t[0x45] = op("GASLIMIT");
    t[0x46] = op("CHAINID");
    t[0x47] = op("SELFBALANCE");
    t[0x48] = op("BASEFEE");
    t[0x49] = op("BLOBHASH");
    t[0x4a] = op("BLOBBASEFEE");

    // 0x50: stack, memory, storage and flow
    t[0x50] = op("POP");
    t[0x51] = op("MLOAD");
    t[0x52] = op("MSTORE");
    t[0x53] = op("MSTORE8");
    t[0x54] = op("SLOAD");
    t[0x55] = op("SSTORE");
    t[0x56] = op("JUMP");
    t[0x57] = op("JUMPI");
    t[0x58] = op("PC");
    t[0x59] = op("MSIZE");
    t[0x5a] = op("GAS");
    t[0x5b] = op("JUMPDEST");
    t[0x5c] = op("TLOAD");
    t[0x5d] = op("TSTORE");
    t[0x5e] = op("MCOPY");
    t[0x5f] = op("PUSH0");

    let mut i = 0;
    while i < 32 {
        t[PUSH1 as usize + i] = OpcodeEntry {
            mnemonic: PUSH_NAMES[i],
            operand_len: (i + 1) as u8,
            defined: true,
        };
        i += 1;
    }

    let mut i = 0;
    while i < 16 {
        t[0x80 + i] = op(DUP_NAMES[i]);
        t[0x90 + i] = op(SWAP_NAMES[i]);
        i += 1;
    }

    let mut i = 0;
    while i < 5 {
        t[0xa0 + i] = op(LOG_NAMES[i]);
        i += 1;
    }

    // 0xf0: calls, creation and termination
    t[0xf0] = op("CREATE");
    t[0xf1] = op("CALL");
    t[0xf2] = op("CALLCODE");
    t[0xf3] = op("RETURN");
    t[0xf4] = op("DELEGATECALL");
    t[0xf5] = op("CREATE2");
    t[0xfa] = op("STATICCALL");
    t[0xfd] = op("REVERT");
    t[0xfe] = op("INVALID");
    t[0xff] = op("SELFDESTRUCT");

    t
}

/// The opcode table, indexed by opcode byte.
pub static OPCODE_TABLE: [OpcodeEntry; 256] = build_table();

/// Returns the table entry for `opcode`.
#[inline]
pub fn lookup(opcode: u8) -> &'static OpcodeEntry {
    &OPCODE_TABLE[opcode as usize]
}

/// Whether `opcode` is one of `PUSH1..=PUSH32`.
#[inline]
pub fn is_push(opcode: u8) -> bool {
    (PUSH1..=PUSH32).contains(&opcode)
}

/// Immediate size of a push opcode, `0` for anything else.
pub fn push_len(opcode: u8) -> usize {
    if is_push(opcode) {
        (opcode - PUSH1 + 1) as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_push_family_carries_operands() {
        for byte in 0..=255u8 {
            let entry = lookup(byte);
            assert_eq!(entry.operand_len as usize, push_len(byte), "opcode 0x{:02x}", byte);
        }
        assert_eq!(lookup(0x5f).operand_len, 0);
        assert_eq!(lookup(PUSH32).operand_len, 32);
    }

    #[test]
    fn unassigned_bytes_resolve_to_sentinel() {
        for byte in [0x0c, 0x1e, 0x21, 0x4b, 0xa5, 0xef, 0xf6, 0xfb] {
            assert_eq!(*lookup(byte), UNKNOWN);
        }
    }

    #[test]
    fn family_names_line_up_with_opcodes() {
        assert_eq!(lookup(0x80).mnemonic, "DUP1");
        assert_eq!(lookup(0x8f).mnemonic, "DUP16");
        assert_eq!(lookup(0x90).mnemonic, "SWAP1");
        assert_eq!(lookup(0x9f).mnemonic, "SWAP16");
        assert_eq!(lookup(0xa4).mnemonic, "LOG4");
        assert_eq!(lookup(0x73).mnemonic, "PUSH20");
        assert_eq!(lookup(0x73).operand_len, 20);
    }

    #[test]
    fn mnemonics_are_unique() {
        let mut names: Vec<&str> = OPCODE_TABLE
            .iter()
            .filter(|e| e.defined)
            .map(|e| e.mnemonic)
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
