/*!
 * Ethernity Utils
 *
 * Utilitários comuns usados em toda a workspace Ethernity
 */

use crate::error::{Error, Result};
use tiny_keccak::{Hasher, Keccak};

/// Remove o prefixo `0x` (ou `0X`) de uma string hexadecimal
pub fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Converte uma string hexadecimal (com ou sem `0x`) para bytes
pub fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    let hex_str = strip_hex_prefix(hex.trim());
    if hex_str.len() % 2 != 0 {
        return Err(Error::InvalidHexInput(format!(
            "tamanho ímpar ({} dígitos)",
            hex_str.len()
        )));
    }
    Ok(hex::decode(hex_str)?)
}

/// Formata bytes como string hexadecimal com prefixo `0x`
pub fn encode_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Calcula o hash Keccak-256 de dados
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut result = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut result);
    result
}
