//! # Opcode trie code generator
//!
//! Reads a CSV table describing every opcode of the 6502 and writes one
//! `insert` statement per opcode, ready to be pasted into the code that
//! builds the emulator's execution trie or the disassembler's trie.
//!
//! ## Getting Started
//! ```
//! cargo run -- 6502ops.csv -o output.txt --variant a
//! ```
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod config;
mod emit;
mod error;
mod table;
use std::path::Path;
use std::result::Result;
use std::{fmt, io};
use table::{DuplicatePolicy, OpcodeTable};
pub(crate) use crate::error::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init();
    if let Err(e) = process_file(config::ARGS.table.as_str()) {
        println!("{}", e);
        return Err(Box::new(e));
    }
    Ok(())
}

/// Load the table named on the command line and do whatever the options ask for.
fn process_file(filename: &str) -> Result<(), Error> {
    let table = load(Path::new(filename), config::ARGS.on_duplicate)?;
    if config::ARGS.list {
        table.write_listing(&mut io::stdout())?;
    }
    if let Some(op) = config::ARGS.lookup {
        match table.get(op) {
            Some(entry) => println!("{}", entry),
            None => warn!("opcode 0x{:02X} is not in {}", op, filename),
        }
    }
    if config::emit() {
        let mut cfg = config::ARGS.variant.config();
        if let Some(target) = config::ARGS.target.as_ref() {
            cfg = cfg.with_target(target);
        }
        let n = emit::emit_to(&table, &cfg, config::ARGS.output.as_str())?;
        if config::ARGS.output != "-" {
            info!("Wrote {} insert statements for {} to {}", n, cfg.target_name, config::ARGS.output);
        }
    }
    Ok(())
}

fn load(path: &Path, policy: DuplicatePolicy) -> Result<OpcodeTable, Error> {
    let table = OpcodeTable::read_from_file(path, policy)?;
    if config::verbose() {
        info!("Loaded {} opcodes from {}", table.len(), path.display());
        verbose_println!("{} of 256 opcode values are unassigned", table.unassigned());
    }
    Ok(table)
}
