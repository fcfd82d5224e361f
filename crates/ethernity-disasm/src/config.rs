use ethernity_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Região do bytecode onde o marcador de metadados é procurado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataScan {
    /// Marcador pode aparecer em qualquer posição do fluxo
    Anywhere,
    /// Marcador precisa estar entre os últimos `n` bytes
    Trailing(usize),
}

impl Default for MetadataScan {
    fn default() -> Self {
        MetadataScan::Anywhere
    }
}

/// Tratamento de bytes sem entrada na tabela de opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOpcodePolicy {
    /// Emite uma instrução `UNKNOWN` sem operando e continua
    Sentinel,
    /// Interrompe a passada com `Error::UnknownOpcode`
    Reject,
}

impl Default for UnknownOpcodePolicy {
    fn default() -> Self {
        UnknownOpcodePolicy::Sentinel
    }
}

/// Configuração de uma passada de desmontagem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasmConfig {
    /// Remove o bloco de metadados CBOR antes de decodificar
    pub strip_metadata: bool,
    /// Região onde o marcador de metadados é procurado
    pub metadata_scan: MetadataScan,
    /// Política para bytes sem opcode definido
    pub unknown_opcodes: UnknownOpcodePolicy,
}

impl Default for DisasmConfig {
    fn default() -> Self {
        Self {
            strip_metadata: true,
            metadata_scan: MetadataScan::default(),
            unknown_opcodes: UnknownOpcodePolicy::default(),
        }
    }
}

impl DisasmConfig {
    /// Carrega a configuração a partir de JSON; campos ausentes usam o padrão
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DisasmConfig::from_json(r#"{"metadata_scan":{"trailing":64}}"#).unwrap();
        assert!(cfg.strip_metadata);
        assert_eq!(cfg.metadata_scan, MetadataScan::Trailing(64));
        assert_eq!(cfg.unknown_opcodes, UnknownOpcodePolicy::Sentinel);
    }

    #[test]
    fn policy_parses_from_snake_case() {
        let cfg = DisasmConfig::from_json(r#"{"unknown_opcodes":"reject","strip_metadata":false}"#).unwrap();
        assert_eq!(cfg.unknown_opcodes, UnknownOpcodePolicy::Reject);
        assert!(!cfg.strip_metadata);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(DisasmConfig::from_json("{"), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            DisasmConfig::from_json(r#"{"unknown_opcodes":"skip"}"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
