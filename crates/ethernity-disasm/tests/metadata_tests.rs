use ethernity_core::{utils::decode_hex, Error};
use ethernity_disasm::{
    disassemble, split_metadata, strip_metadata, DisasmConfig, Disassembler, MetadataScan,
};

const RUNTIME: &str = "6080604052348015600e575f80fd5b5060043610601f575f3560e01c80632e64cec11460235b5f80fd5b5f5460405190815260200160405180910390f3fe";
const METADATA: &str = "a26469706673582212200b30557a9fc4e90e33587da2c7ec11365b80a5caef14395e83a8cdf2173c618664736f6c63430008180033";

fn deployed_code() -> Vec<u8> {
    decode_hex(&format!("0x{}{}", RUNTIME, METADATA)).unwrap()
}

#[test]
fn test_strip_removes_declared_length_plus_two() {
    let code = deployed_code();
    let runtime = strip_metadata(&code).unwrap();
    assert_eq!(code.len() - runtime.len(), 0x33 + 2);
    assert_eq!(runtime, decode_hex(RUNTIME).unwrap().as_slice());
}

#[test]
fn test_stripped_code_decodes_like_clean_code() {
    let code = deployed_code();
    let stripped = disassemble(strip_metadata(&code).unwrap()).unwrap();
    let clean = disassemble(&decode_hex(RUNTIME).unwrap()).unwrap();
    assert_eq!(stripped, clean);
}

#[test]
fn test_strip_is_idempotent() {
    let code = deployed_code();
    let once = strip_metadata(&code).unwrap();
    let twice = strip_metadata(once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_metadata_fields_decoded() {
    let code = deployed_code();
    let (_, meta) = split_metadata(&code, MetadataScan::Trailing(64)).unwrap();
    let meta = meta.unwrap();
    assert_eq!(meta.solc.as_deref(), Some("0.8.24"));
    assert_eq!(
        meta.ipfs.as_deref(),
        Some("0x12200b30557a9fc4e90e33587da2c7ec11365b80a5caef14395e83a8cdf2173c6186")
    );
    assert!(meta.bzzr0.is_none() && meta.bzzr1.is_none());
    assert!(meta.extra.is_empty());
}

#[test]
fn test_declared_length_beyond_stream_fails() {
    let mut code = deployed_code();
    let len = code.len();
    code[len - 2] = 0x01;
    code[len - 1] = 0x00;
    let err = strip_metadata(&code).unwrap_err();
    assert!(matches!(err, Error::MalformedMetadata(_)));
    assert!(!err.is_decode_error());
}

#[test]
fn test_pipeline_reports_metadata_and_hash() {
    let report = Disassembler::new(DisasmConfig::default())
        .disassemble(&deployed_code())
        .unwrap();
    assert!(report.is_complete());
    assert_eq!(report.code_len, RUNTIME.len() / 2);
    assert_eq!(report.metadata.as_ref().unwrap().length, 0x35);
    assert_eq!(
        report.code_hash,
        ethernity_core::utils::keccak256(&decode_hex(RUNTIME).unwrap())
    );
    assert_eq!(report.instructions.len(), 48);
}
