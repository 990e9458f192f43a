use crate::emit::Variant;
use crate::table::DuplicatePolicy;
use clap::Parser;
use clap_num::maybe_hex;
use lazy_static::lazy_static;

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
pub struct Args {
    /// CSV opcode table (columns: opcode, mnemonic, addressing mode, bytes, cycles, flags)
    #[arg(default_value = "6502ops.csv")]
    pub table: String,

    /// File to write the generated statements to ('-' for stdout)
    #[arg(short, long, default_value = "output.txt")]
    pub output: String,

    /// Which insertion statements to generate
    #[arg(long, value_enum, default_value_t = Variant::A)]
    pub variant: Variant,

    /// Override the name of the structure the statements insert into
    #[arg(long)]
    pub target: Option<String>,

    /// What to do when two rows define the same opcode
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Reject)]
    pub on_duplicate: DuplicatePolicy,

    /// Dump the loaded table to stdout, sorted by opcode
    #[arg(short, long)]
    pub list: bool,

    /// Print the descriptor for a single opcode instead of generating (hex ok with '0x')
    #[arg(long,value_parser=maybe_hex::<u8>)]
    pub lookup: Option<u8>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

lazy_static! {
    pub static ref ARGS: Args = if cfg!(test) {
        // manually set parameters for running tests
        Args::parse_from(["test", "test/6502ops.csv"])
    } else {
        Args::parse()
    };
}

pub fn init() { lazy_static::initialize(&ARGS); }
pub fn emit() -> bool { ARGS.lookup.is_none() }
pub fn verbose() -> bool { ARGS.verbose }
