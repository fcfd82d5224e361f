use std::fs;
use std::path::Path;

use ethernity_core::{utils::decode_hex, Result};
use tracing::debug;

/// Resolves a command-line argument into bytecode.
///
/// An argument naming an existing file is read from disk; anything else is
/// taken as a literal hex string. Either way the text may carry a `0x` prefix
/// and surrounding whitespace.
pub fn load_bytecode(arg: &str) -> Result<Vec<u8>> {
    let path = Path::new(arg);
    if !path.is_file() {
        return decode_hex(arg);
    }
    debug!(path = arg, "reading bytecode from file");
    let contents = fs::read_to_string(path)?;
    decode_hex(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethernity_core::Error;

    #[test]
    fn literal_hex_with_prefix() {
        assert_eq!(load_bytecode("0x600160020100").unwrap(), vec![0x60, 0x01, 0x60, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn reads_hex_from_file() {
        let path = std::env::temp_dir().join(format!("ethernity-disasm-{}.hex", std::process::id()));
        fs::write(&path, "0x6001\n").unwrap();
        let code = load_bytecode(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(code, vec![0x60, 0x01]);
    }

    #[test]
    fn long_literal_is_not_mistaken_for_a_path() {
        let hex = "5b".repeat(400);
        assert_eq!(load_bytecode(&hex).unwrap().len(), 400);
    }

    #[test]
    fn odd_length_literal_is_invalid() {
        assert!(matches!(load_bytecode("0x601"), Err(Error::InvalidHexInput(_))));
    }
}
