use std::env;

use ethernity_disasm::{split_metadata, Decoder, MetadataScan};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <BYTECODE_HEX>", args[0]);
        std::process::exit(1);
    }
    let code = ethernity_core::utils::decode_hex(&args[1])?;

    let (runtime, metadata) = split_metadata(&code, MetadataScan::Trailing(128))?;
    if let Some(meta) = metadata {
        println!("Metadata: {} bytes, solc {:?}", meta.length, meta.solc);
    }

    // Walk lazily and stop at the first terminating instruction.
    for ins in Decoder::new(runtime) {
        let ins = ins?;
        println!("{}", ins);
        if matches!(ins.mnemonic, "STOP" | "RETURN" | "REVERT" | "INVALID") {
            break;
        }
    }
    Ok(())
}
