//! Ethernity Disasm
//!
//! Linear disassembler for EVM bytecode. Strips the solc metadata blob and
//! decodes the remaining code into instructions annotated with program counters.

pub mod opcodes;
pub mod metadata;
pub mod parser;
pub mod config;
pub mod input;
pub mod disassembly;

pub use config::{DisasmConfig, MetadataScan, UnknownOpcodePolicy};
pub use disassembly::{Disassembler, Disassembly};
pub use metadata::{split_metadata, strip_metadata, ContractMetadata};
pub use parser::{disassemble, disassemble_partial, Decoder, Instruction};
