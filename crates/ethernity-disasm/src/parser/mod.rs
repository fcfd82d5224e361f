use std::fmt;
use std::iter::FusedIterator;

use ethereum_types::U256;
use ethernity_core::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{config::UnknownOpcodePolicy, opcodes};

/// Decoded instruction from bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    /// Program counter after the instruction, immediate bytes included.
    pub address: usize,
    pub opcode: u8,
    pub mnemonic: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand: Option<U256>,
}

impl Instruction {
    /// Number of immediate bytes following the opcode.
    pub fn operand_len(&self) -> usize {
        opcodes::lookup(self.opcode).operand_len as usize
    }

    /// Position of the opcode byte itself.
    ///
    /// Saturates at `0` for hand-built instructions whose address is smaller
    /// than their encoded size.
    pub fn offset(&self) -> usize {
        self.address.saturating_sub(1 + self.operand_len())
    }

    /// Immediate re-encoded big-endian with the width of its opcode.
    pub fn operand_bytes(&self) -> Option<Vec<u8>> {
        let value = self.operand?;
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        Some(word[32 - self.operand_len()..].to_vec())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Some(value) => write!(f, "{} {} {:#x}", self.address, self.mnemonic, value),
            None => write!(f, "{} {}", self.address, self.mnemonic),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingOpcode,
    Truncated,
    Rejected,
}

/// Forward-only cursor over a bytecode buffer.
///
/// Yields one instruction per opcode. A truncated immediate or, under
/// [`UnknownOpcodePolicy::Reject`], an unassigned byte is yielded as an error
/// and ends the pass.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    code: &'a [u8],
    pc: usize,
    policy: UnknownOpcodePolicy,
    state: State,
}

impl<'a> Decoder<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self::with_policy(code, UnknownOpcodePolicy::default())
    }

    pub fn with_policy(code: &'a [u8], policy: UnknownOpcodePolicy) -> Self {
        Self { code, pc: 0, policy, state: State::ReadingOpcode }
    }

    /// Address of the next byte to consume.
    pub fn pc(&self) -> usize {
        self.pc
    }

    fn read_operand(&mut self, opcode: u8, offset: usize) -> Result<U256> {
        let entry = opcodes::lookup(opcode);
        let len = entry.operand_len as usize;
        let end = self.pc + len;
        if end > self.code.len() {
            let available = self.code[self.pc..].to_vec();
            self.pc = self.code.len();
            self.state = State::Truncated;
            warn!(offset, opcode, expected = len, available = available.len(), "truncated push operand");
            return Err(Error::TruncatedOperand {
                opcode,
                mnemonic: entry.mnemonic,
                offset,
                expected: len,
                available,
            });
        }
        let mut operand = U256::zero();
        for &b in &self.code[self.pc..end] {
            operand = (operand << 8) | U256::from(b);
        }
        self.pc = end;
        Ok(operand)
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<Instruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::ReadingOpcode || self.pc >= self.code.len() {
            return None;
        }
        let offset = self.pc;
        let opcode = self.code[offset];
        self.pc += 1;
        let entry = opcodes::lookup(opcode);
        if !entry.defined {
            match self.policy {
                UnknownOpcodePolicy::Reject => {
                    self.state = State::Rejected;
                    return Some(Err(Error::UnknownOpcode { opcode, offset }));
                }
                UnknownOpcodePolicy::Sentinel => {
                    warn!(offset, opcode, "unassigned opcode, emitting sentinel");
                }
            }
        }
        let operand = if entry.operand_len > 0 {
            match self.read_operand(opcode, offset) {
                Ok(v) => Some(v),
                Err(e) => return Some(Err(e)),
            }
        } else {
            None
        };
        Some(Ok(Instruction { address: self.pc, opcode, mnemonic: entry.mnemonic, operand }))
    }
}

impl FusedIterator for Decoder<'_> {}

/// Decodes raw bytecode into a list of instructions, failing on the first error.
pub fn disassemble(code: &[u8]) -> Result<Vec<Instruction>> {
    Decoder::new(code).collect()
}

/// Decodes as far as possible, returning the instructions read before any error.
pub fn disassemble_partial(code: &[u8], policy: UnknownOpcodePolicy) -> (Vec<Instruction>, Option<Error>) {
    let mut instructions = Vec::new();
    for item in Decoder::with_policy(code, policy) {
        match item {
            Ok(ins) => instructions.push(ins),
            Err(e) => return (instructions, Some(e)),
        }
    }
    debug!(bytes = code.len(), instructions = instructions.len(), "disassembly finished");
    (instructions, None)
}
