//! EVM bytecode disassembler CLI.
//!
//! Reads bytecode from a file or a literal hex string, strips the compiler
//! metadata and prints one instruction per line.
//!
//! # Usage
//! ```text
//! ethernity-disasm [OPTIONS] <BYTECODE_OR_FILE>
//! ```
//!
//! # Options
//! - `--json`: Print the disassembly as JSON
//! - `--keep-metadata`: Decode the metadata blob as code instead of stripping it
//! - `--metadata-window <n>`: Only look for the metadata marker in the last `n` bytes
//! - `--strict`: Fail on bytes with no assigned opcode
//! - `--config <file>`: Load settings from a JSON file (flags override it)
//!
//! # Examples
//! ```text
//! ethernity-disasm 0x6001600201
//! ethernity-disasm --json contract.hex
//! ```

use std::env;
use std::fs;
use std::process;

use anyhow::{bail, Context, Result};
use ethernity_core::utils::encode_hex;
use ethernity_disasm::{
    input::load_bytecode, DisasmConfig, Disassembler, Disassembly, MetadataScan, UnknownOpcodePolicy,
};
use tracing_subscriber::EnvFilter;

struct Options {
    input: String,
    json: bool,
    config: DisasmConfig,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <BYTECODE_OR_FILE>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json                     Print the disassembly as JSON");
    eprintln!("  --keep-metadata            Do not strip the trailing metadata blob");
    eprintln!("  --metadata-window <n>      Search the metadata marker in the last n bytes only");
    eprintln!("  --strict                   Fail on unassigned opcodes");
    eprintln!("  --config <file>            Load settings from a JSON file");
    eprintln!("  -h, --help                 Show this message");
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut input = None;
    let mut json = false;
    let mut keep_metadata = false;
    let mut window = None;
    let mut strict = false;
    let mut config_path = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--json" => json = true,
            "--keep-metadata" => keep_metadata = true,
            "--strict" => strict = true,
            k @ ("--metadata-window" | "--config") => {
                i += 1;
                let value = match args.get(i) {
                    Some(v) => v,
                    None => bail!("{} requires a value", k),
                };
                if k == "--config" {
                    config_path = Some(value.clone());
                } else {
                    let n: usize = value
                        .parse()
                        .with_context(|| format!("invalid metadata window '{}'", value))?;
                    window = Some(n);
                }
            }
            other if other.starts_with("--") => bail!("unknown option {}", other),
            other => {
                if input.replace(other.to_string()).is_some() {
                    bail!("expected a single bytecode argument");
                }
            }
        }
        i += 1;
    }

    let input = match input {
        Some(v) => v,
        None => bail!("missing bytecode argument"),
    };

    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
            DisasmConfig::from_json(&text)?
        }
        None => DisasmConfig::default(),
    };
    if keep_metadata {
        config.strip_metadata = false;
    }
    if let Some(n) = window {
        config.metadata_scan = MetadataScan::Trailing(n);
    }
    if strict {
        config.unknown_opcodes = UnknownOpcodePolicy::Reject;
    }

    Ok(Some(Options { input, json, config }))
}

fn print_text(report: &Disassembly) {
    println!("; code hash {}", encode_hex(&report.code_hash));
    println!("; code size {} bytes", report.code_len);
    if let Some(meta) = &report.metadata {
        let mut line = format!("; metadata {} bytes", meta.length);
        if let Some(solc) = &meta.solc {
            line.push_str(&format!(", solc {}", solc));
        }
        if let Some(ipfs) = &meta.ipfs {
            line.push_str(&format!(", ipfs {}", ipfs));
        }
        if let Some(bzzr) = meta.bzzr1.as_ref().or(meta.bzzr0.as_ref()) {
            line.push_str(&format!(", bzzr {}", bzzr));
        }
        println!("{}", line);
    }
    print!("{}", report);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("ethernity-disasm");

    let options = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage(program);
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            print_usage(program);
            process::exit(2);
        }
    };

    let code = load_bytecode(&options.input).context("failed to load bytecode")?;
    let report = Disassembler::new(options.config).disassemble(&code)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }

    if let Some(e) = &report.error {
        eprintln!("error: {}", e);
        process::exit(1);
    }
    Ok(())
}
