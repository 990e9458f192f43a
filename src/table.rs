//! Loading of the CSV opcode table.
//!
//! The table has a header row naming (at least) the columns `opcode`, `mnemonic`,
//! `addressing mode`, `bytes`, `cycles` and `flags`, followed by one row per opcode:
//! ```text
//! opcode,mnemonic,addressing mode,bytes,cycles,flags
//! 0xA9,LDA,immediate,2,2,NZ
//! 0xBD,LDA,absolute_x,3,4/5,NZ
//! ```
//! Rows are kept in the order they appear in the file. The opcode token is kept
//! exactly as written since it is pasted into the generated code as a byte literal.
use super::*;

use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Deref;
use std::path::Path;
use std::{iter::Peekable, str::Chars};

lazy_static! {
    static ref RE_OPCODE: Regex = Regex::new(r"^0[xX]([0-9a-fA-F]{1,2})$").unwrap();
    static ref RE_IDENT: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
    static ref RE_POSITIVE: Regex = Regex::new(r"^0*[1-9][0-9]*$").unwrap();
}

/// Column names in the order their values appear in a descriptor (opcode excluded).
pub const COLUMNS: [&str; 6] = ["opcode", "mnemonic", "addressing mode", "bytes", "cycles", "flags"];

/// How the loader treats a row whose opcode was already defined by an earlier row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// fail the run with ErrorKind::DuplicateKey
    Reject,
    /// the later row replaces the earlier one (keeping the earlier row's position) and a warning is printed
    LastWins,
}

/// One row of the opcode table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeEntry {
    /// numeric value of the opcode, used as the uniqueness key
    pub opcode: u8,
    /// the opcode exactly as written in the table, e.g. "0xA9"
    pub token: String,
    pub mnemonic: String,
    pub addressing_mode: String,
    pub byte_length: String,
    /// opaque, may be compound (e.g. "2/3")
    pub cycle_count: String,
    pub flags_affected: String,
    /// line in the source table this entry came from
    pub line: usize,
}
impl OpcodeEntry {
    /// The five metadata fields in descriptor order.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.mnemonic,
            &self.addressing_mode,
            &self.byte_length,
            &self.cycle_count,
            &self.flags_affected,
        ]
    }
    /// Comma-joined metadata; consumers split this positionally so the order is fixed.
    pub fn descriptor(&self) -> String { self.fields().join(",") }
}
impl fmt::Display for OpcodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{} {}", self.token, self.descriptor()) }
}

/// Positions of the required columns within a row.
struct Columns {
    index: [usize; 6],
}
impl Columns {
    fn from_header(line: usize, header: &str) -> Result<Self, Error> {
        let names: Vec<String> = split_fields(line, header)?
            .iter()
            .map(|n| n.trim().trim_start_matches('\u{feff}').to_ascii_lowercase().replace('_', " "))
            .collect();
        let mut index = [0usize; 6];
        for (i, col) in COLUMNS.iter().enumerate() {
            index[i] = names
                .iter()
                .position(|n| n == col)
                .ok_or_else(|| row_err!(line, "header has no '{}' column", col))?;
        }
        Ok(Columns { index })
    }
    fn field<'a>(&self, line: usize, fields: &'a [String], col: usize) -> Result<&'a str, Error> {
        let name = COLUMNS[col];
        let value = fields
            .get(self.index[col])
            .ok_or_else(|| row_err!(line, "missing field '{}'", name))?
            .trim();
        if value.is_empty() {
            return Err(row_err!(line, "empty field '{}'", name));
        }
        if value.contains(',') {
            return Err(row_err!(line, "field '{}' contains a comma: \"{}\"", name, value));
        }
        Ok(value)
    }
    fn entry(&self, line: usize, fields: &[String]) -> Result<OpcodeEntry, Error> {
        let token = self.field(line, fields, 0)?;
        let opcode = RE_OPCODE
            .captures(token)
            .and_then(|c| u8::from_str_radix(c.get(1)?.as_str(), 16).ok())
            .ok_or_else(|| row_err!(line, "opcode '{}' is not a byte literal like 0xA9", token))?;
        let mnemonic = self.field(line, fields, 1)?;
        if !RE_IDENT.is_match(mnemonic) {
            return Err(row_err!(line, "mnemonic '{}' is not an identifier", mnemonic));
        }
        let byte_length = self.field(line, fields, 3)?;
        if !RE_POSITIVE.is_match(byte_length) {
            return Err(row_err!(line, "bytes '{}' is not a positive integer", byte_length));
        }
        Ok(OpcodeEntry {
            opcode,
            token: token.to_string(),
            mnemonic: mnemonic.to_string(),
            addressing_mode: self.field(line, fields, 2)?.to_string(),
            byte_length: byte_length.to_string(),
            cycle_count: self.field(line, fields, 4)?.to_string(),
            flags_affected: self.field(line, fields, 5)?.to_string(),
            line,
        })
    }
}

/// Split one CSV line into fields. Fields may be wrapped in double quotes,
/// in which case commas are literal and `""` is an escaped quote.
fn split_fields(line: usize, s: &str) -> Result<Vec<String>, Error> {
    let mut fields = Vec::new();
    let mut chars: Peekable<Chars> = s.trim_end_matches(['\r', '\n']).chars().peekable();
    loop {
        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err(row_err!(line, "unterminated quoted field")),
                }
            }
            // anything between the closing quote and the next comma is kept as-is
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                field.push(c);
                chars.next();
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }
        fields.push(field);
        if chars.next().is_none() {
            break;
        }
    }
    Ok(fields)
}

/// The loaded opcode table. Entries are immutable once loaded and iterate in source row order.
#[derive(Debug, Default)]
pub struct OpcodeTable {
    entries: Vec<OpcodeEntry>,
    by_opcode: HashMap<u8, usize>,
}

impl OpcodeTable {
    pub fn from_str_iter<I, T>(iter: I, policy: DuplicatePolicy) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut lines = iter
            .into_iter()
            .map(|s| -> String { s.into() })
            .enumerate()
            .map(|(i, s)| (i + 1, s))
            .filter(|(_, s)| !s.trim().is_empty());
        let (header_line, header) = lines.next().ok_or_else(|| row_err!(1, "opcode table has no header row"))?;
        let columns = Columns::from_header(header_line, &header)?;
        let mut table = OpcodeTable::default();
        for (line, s) in lines {
            let fields = split_fields(line, &s)?;
            table.add_entry(columns.entry(line, &fields)?, policy)?;
        }
        Ok(table)
    }
    pub fn read_from_file(path: &Path, policy: DuplicatePolicy) -> Result<Self, Error> {
        let lines = BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<String>, io::Error>>()?;
        OpcodeTable::from_str_iter(lines, policy)
    }
    fn add_entry(&mut self, entry: OpcodeEntry, policy: DuplicatePolicy) -> Result<(), Error> {
        match self.by_opcode.get(&entry.opcode) {
            None => {
                self.by_opcode.insert(entry.opcode, self.entries.len());
                self.entries.push(entry);
            }
            Some(&i) => {
                let prev = &self.entries[i];
                if policy == DuplicatePolicy::Reject {
                    return Err(dup_err!(
                        entry.line,
                        "{} ({}) was already defined on line {} ({})",
                        entry.token,
                        entry.mnemonic,
                        prev.line,
                        prev.mnemonic
                    ));
                }
                warn!(
                    "line {}: {} ({}) replaces the definition from line {} ({})",
                    entry.line,
                    entry.token,
                    entry.mnemonic,
                    prev.line,
                    prev.mnemonic
                );
                self.entries[i] = entry;
            }
        }
        Ok(())
    }
    pub fn get(&self, opcode: u8) -> Option<&OpcodeEntry> { self.by_opcode.get(&opcode).map(|&i| &self.entries[i]) }
    /// Entries ordered by numeric opcode rather than row order.
    pub fn sorted(&self) -> Vec<&OpcodeEntry> {
        let mut v: Vec<&OpcodeEntry> = self.entries.iter().collect();
        v.sort_by_key(|e| e.opcode);
        v
    }
    /// Number of byte values with no entry in the table.
    pub fn unassigned(&self) -> usize { 256 - self.entries.len() }
    pub fn write_listing(&self, f: &mut dyn io::Write) -> Result<(), Error> {
        for e in self.sorted() {
            writeln!(f, "0x{:02X}: [{}]", e.opcode, e.fields().join(", "))?;
        }
        Ok(())
    }
}

impl Deref for OpcodeTable {
    type Target = [OpcodeEntry];
    fn deref(&self) -> &Self::Target { &self.entries }
}
