//! Generation of trie insertion statements from a loaded [OpcodeTable].
//!
//! Every entry produces exactly one line, in table row order:
//! ```text
//! trie.insert(&0xA9_u8, "LDA,immediate,2,2,NZ".to_string(), Some(lda));
//! dis_trie.insert(&0xA9_u8, "LDA,immediate,2,2,NZ".to_string());
//! dis_trie.insert(&0xA9_u8, "LDA,immediate,2,2,NZ".to_string(), Some(lda("immediate")));
//! ```
//! Handler names are not checked here; a missing handler is a build error in the consumer.
use super::table::{OpcodeEntry, OpcodeTable};
use super::*;

use clap::ValueEnum;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// The supported output shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// execution trie, generic handler named after the mnemonic
    A,
    /// disassembly trie, no handler
    B,
    /// disassembly trie, handler called with the addressing mode
    C,
    /// same output as A
    D,
}
impl Variant {
    pub fn config(self) -> EmitConfig {
        match self {
            Variant::A | Variant::D => EmitConfig::new("trie", true, false),
            Variant::B => EmitConfig::new("dis_trie", false, false),
            Variant::C => EmitConfig::new("dis_trie", false, true),
        }
    }
}

/// Controls the shape of every generated line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitConfig {
    /// name of the structure being inserted into
    pub target_name: String,
    /// attach `Some(<mnemonic>)`
    pub generic_handler: bool,
    /// attach `Some(<mnemonic>("<mode>"))`; takes precedence over generic_handler
    pub mode_aware_handler: bool,
}
impl EmitConfig {
    pub fn new(target_name: &str, generic_handler: bool, mode_aware_handler: bool) -> Self {
        EmitConfig {
            target_name: target_name.to_string(),
            generic_handler,
            mode_aware_handler,
        }
    }
    pub fn with_target(mut self, target_name: &str) -> Self {
        self.target_name = target_name.to_string();
        self
    }
    fn handler(&self, entry: &OpcodeEntry) -> Option<String> {
        let name = entry.mnemonic.to_lowercase();
        if self.mode_aware_handler {
            Some(format!("{}({:?})", name, entry.addressing_mode.to_lowercase()))
        } else if self.generic_handler {
            Some(name)
        } else {
            None
        }
    }
}

/// Build the insertion statement for a single entry (no line terminator).
pub fn render(entry: &OpcodeEntry, cfg: &EmitConfig) -> String {
    let mut line = format!(
        "{}.insert(&{}_u8, {:?}.to_string()",
        cfg.target_name,
        entry.token,
        entry.descriptor()
    );
    if let Some(handler) = cfg.handler(entry) {
        _ = write!(line, ", Some({})", handler);
    }
    line.push_str(");");
    line
}

/// Write one statement per entry to `out`, returning the number of lines written.
pub fn emit(table: &OpcodeTable, cfg: &EmitConfig, out: &mut dyn Write) -> Result<usize, Error> {
    for entry in table.iter() {
        writeln!(out, "{}", render(entry, cfg)).map_err(|e| output_err!(e))?;
    }
    out.flush().map_err(|e| output_err!(e))?;
    Ok(table.len())
}

/// Emit to a file, or to stdout when `dest` is "-".
pub fn emit_to(table: &OpcodeTable, cfg: &EmitConfig, dest: &str) -> Result<usize, Error> {
    if dest == "-" {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        return emit(table, cfg, &mut out);
    }
    let file = File::create(dest).map_err(|e| output_err!(format!("{}: {}", dest, e)))?;
    let mut out = BufWriter::new(file);
    emit(table, cfg, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DuplicatePolicy;
    use regex::Regex;

    fn table(rows: &[&str]) -> OpcodeTable {
        let header = "opcode,mnemonic,addressing mode,bytes,cycles,flags";
        OpcodeTable::from_str_iter(std::iter::once(header).chain(rows.iter().copied()), DuplicatePolicy::Reject)
            .unwrap()
    }
    fn generate(t: &OpcodeTable, cfg: &EmitConfig) -> Result<Vec<String>, Error> {
        let mut out = Vec::new();
        let n = emit(t, cfg, &mut out)?;
        let lines: Vec<String> = String::from_utf8(out).unwrap().lines().map(String::from).collect();
        assert_eq!(n, lines.len());
        Ok(lines)
    }
    /// target, key, descriptor, handler
    fn parse(line: &str) -> (String, String, String, Option<String>) {
        let re = Regex::new(r#"^(\w+)\.insert\(&(0[xX][0-9a-fA-F]+)_u8, "([^"]*)"\.to_string\(\)(?:, Some\((.+)\))?\);$"#)
            .unwrap();
        let c = re.captures(line).unwrap_or_else(|| panic!("unparseable line: {}", line));
        (
            c[1].to_string(),
            c[2].to_string(),
            c[3].to_string(),
            c.get(4).map(|m| m.as_str().to_string()),
        )
    }

    #[test]
    fn disassembly_without_handlers() -> Result<(), Error> {
        let t = table(&["0x00,BRK,implied,1,7,NZC", "0xEA,NOP,implied,1,2,none"]);
        let lines = generate(&t, &Variant::B.config())?;
        assert_eq!(
            lines,
            vec![
                r#"dis_trie.insert(&0x00_u8, "BRK,implied,1,7,NZC".to_string());"#,
                r#"dis_trie.insert(&0xEA_u8, "NOP,implied,1,2,none".to_string());"#,
            ]
        );
        Ok(())
    }

    #[test]
    fn execution_with_generic_handlers() -> Result<(), Error> {
        let t = table(&["0xA9,LDA,immediate,2,2,NZ"]);
        let lines = generate(&t, &Variant::A.config())?;
        assert_eq!(
            lines,
            vec![r#"trie.insert(&0xA9_u8, "LDA,immediate,2,2,NZ".to_string(), Some(lda));"#]
        );
        Ok(())
    }

    #[test]
    fn mode_aware_handlers() -> Result<(), Error> {
        let t = table(&["0xBD,LDA,Absolute_X,3,4/5,NZ", "0x0A,ASL,accumulator,1,2,NZC"]);
        let lines = generate(&t, &Variant::C.config())?;
        assert_eq!(
            lines[0],
            r#"dis_trie.insert(&0xBD_u8, "LDA,Absolute_X,3,4/5,NZ".to_string(), Some(lda("absolute_x")));"#
        );
        let re = Regex::new(r#"^(\w+)\("(\w+)"\)$"#).unwrap();
        for (line, entry) in lines.iter().zip(t.iter()) {
            let handler = parse(line).3.unwrap();
            let c = re.captures(&handler).unwrap();
            assert_eq!(&c[1], entry.mnemonic.to_lowercase());
            assert_eq!(&c[2], entry.addressing_mode.to_lowercase());
        }
        Ok(())
    }

    #[test]
    fn variants_a_and_d_match() -> Result<(), Error> {
        let t = table(&["0x69,ADC,immediate,2,2,NVZC", "0x6D,ADC,absolute,3,4,NVZC", "0x90,BCC,relative,2,2/3,none"]);
        assert_eq!(Variant::A.config(), Variant::D.config());
        assert_eq!(generate(&t, &Variant::A.config())?, generate(&t, &Variant::D.config())?);
        Ok(())
    }

    #[test]
    fn row_order_and_round_trip() -> Result<(), Error> {
        let rows = ["0xA9,LDA,immediate,2,2,NZ", "0x01,ORA,indirect_x,2,6,NZ", "0x10,BPL,relative,2,2/3,none"];
        let t = table(&rows);
        for v in [Variant::A, Variant::B, Variant::C, Variant::D] {
            let lines = generate(&t, &v.config())?;
            assert_eq!(lines.len(), rows.len());
            for (line, row) in lines.iter().zip(rows) {
                let (target, key, desc, handler) = parse(line);
                let fields: Vec<&str> = row.split(',').collect();
                assert_eq!(target, v.config().target_name);
                assert_eq!(key, fields[0]);
                assert_eq!(desc.split(',').collect::<Vec<_>>(), fields[1..].to_vec());
                assert_eq!(handler.is_some(), v != Variant::B);
            }
        }
        Ok(())
    }

    #[test]
    fn target_override() {
        let t = table(&["0xEA,NOP,implied,1,2,none"]);
        let cfg = Variant::A.config().with_target("exec_trie");
        assert_eq!(render(&t[0], &cfg), r#"exec_trie.insert(&0xEA_u8, "NOP,implied,1,2,none".to_string(), Some(nop));"#);
    }

    #[test]
    fn descriptor_is_escaped() {
        let t = table(&[r#"0xEA,NOP,implied,1,2,"say ""none""""#]);
        assert_eq!(render(&t[0], &Variant::B.config()), r#"dis_trie.insert(&0xEA_u8, "NOP,implied,1,2,say \"none\"".to_string());"#);
    }

    struct BrokenPipe;
    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> { Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")) }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn write_failure_is_reported() {
        let t = table(&["0xEA,NOP,implied,1,2,none"]);
        let e = emit(&t, &Variant::A.config(), &mut BrokenPipe).unwrap_err();
        assert_eq!(e.kind, ErrorKind::OutputWrite);
    }
}
