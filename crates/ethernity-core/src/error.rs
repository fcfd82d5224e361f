use thiserror::Error;

/// Erros comuns da biblioteca Ethernity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Texto de entrada não é hexadecimal válido (tamanho ímpar ou caractere inválido)
    #[error("Entrada hexadecimal inválida: {0}")]
    InvalidHexInput(String),

    /// Bloco de metadados no final do bytecode não pôde ser decodificado
    #[error("Metadados malformados: {0}")]
    MalformedMetadata(String),

    /// Byte sem entrada na tabela de opcodes (apenas com a política `Reject`)
    #[error("Opcode desconhecido 0x{opcode:02x} no offset {offset}")]
    UnknownOpcode {
        opcode: u8,
        offset: usize,
    },

    /// O bytecode terminou antes de o operando imediato ser lido por completo
    #[error(
        "Operando truncado: {mnemonic} (0x{opcode:02x}) no offset {offset} espera {expected} bytes, disponíveis {available:02x?}"
    )]
    TruncatedOperand {
        opcode: u8,
        mnemonic: &'static str,
        offset: usize,
        expected: usize,
        available: Vec<u8>,
    },

    /// Falha de leitura da entrada
    #[error("Erro de E/S: {0}")]
    Io(String),

    /// Configuração não pôde ser interpretada
    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Indica se o erro ocorreu durante a decodificação do fluxo de opcodes
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::UnknownOpcode { .. } | Error::TruncatedOperand { .. })
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidHexInput(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_operand_message_lists_available_bytes() {
        let err = Error::TruncatedOperand {
            opcode: 0x61,
            mnemonic: "PUSH2",
            offset: 0,
            expected: 2,
            available: vec![0x00],
        };
        let msg = err.to_string();
        assert!(msg.contains("PUSH2"));
        assert!(msg.contains("[00]"));
        assert!(err.is_decode_error());
    }

    #[test]
    fn hex_errors_map_to_invalid_hex_input() {
        let err: Error = hex::decode("abc").unwrap_err().into();
        assert!(matches!(err, Error::InvalidHexInput(_)));
        assert!(!err.is_decode_error());
    }
}
