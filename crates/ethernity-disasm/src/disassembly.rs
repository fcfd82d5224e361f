use std::fmt;

use ethernity_core::{
    utils::{encode_hex, keccak256},
    Error, Result,
};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::{
    config::DisasmConfig,
    metadata::{split_metadata, ContractMetadata},
    parser::{disassemble_partial, Instruction},
};

/// Result of one disassembly pass over a bytecode input.
#[derive(Debug, Clone, Serialize)]
pub struct Disassembly {
    /// Keccak-256 of the code that was decoded (metadata excluded).
    #[serde(serialize_with = "hash_as_hex")]
    pub code_hash: [u8; 32],
    pub code_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContractMetadata>,
    pub instructions: Vec<Instruction>,
    /// Decode error that ended the pass early, if any.
    #[serde(serialize_with = "error_as_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
}

impl Disassembly {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into the decoded instructions, or the error that ended the pass.
    pub fn into_result(self) -> Result<Vec<Instruction>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.instructions),
        }
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ins in &self.instructions {
            writeln!(f, "{}", ins)?;
        }
        Ok(())
    }
}

fn hash_as_hex<S: Serializer>(hash: &[u8; 32], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&encode_hex(hash))
}

fn error_as_text<S: Serializer>(err: &Option<Error>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match err {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

/// Metadata stripping followed by decoding, driven by a [`DisasmConfig`].
#[derive(Debug, Clone, Default)]
pub struct Disassembler {
    config: DisasmConfig,
}

impl Disassembler {
    pub fn new(config: DisasmConfig) -> Self {
        Self { config }
    }

    /// Runs the full pipeline over `code`.
    ///
    /// Malformed metadata fails the call; decode errors are recorded in the
    /// returned [`Disassembly`] next to the instructions read before them.
    pub fn disassemble(&self, code: &[u8]) -> Result<Disassembly> {
        let (runtime, metadata) = if self.config.strip_metadata {
            split_metadata(code, self.config.metadata_scan)?
        } else {
            (code, None)
        };
        debug!(input = code.len(), runtime = runtime.len(), "decoding bytecode");

        let (instructions, error) = disassemble_partial(runtime, self.config.unknown_opcodes);
        if let Some(e) = &error {
            info!(decoded = instructions.len(), error = %e, "disassembly stopped early");
        }
        Ok(Disassembly {
            code_hash: keccak256(runtime),
            code_len: runtime.len(),
            metadata,
            instructions,
            error,
        })
    }
}
