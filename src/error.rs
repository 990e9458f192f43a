use std::{convert::From, fmt};

/// Error type for the generator. Every error ends the run.
pub struct Error {
    pub kind: ErrorKind,
    /// 1-based line in the opcode table, when the error belongs to one
    pub line: Option<usize>,
    pub msg: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// a row is missing a field or a field can't be used
    MalformedRow,
    /// two rows define the same opcode
    DuplicateKey,
    /// writing the generated statements failed
    OutputWrite,
    /// reading the opcode table failed
    IO,
}

impl Error {
    pub fn new(kind: ErrorKind, line: Option<usize>, message: &str) -> Error {
        Error {
            kind,
            line,
            msg: String::from(message),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::new(ErrorKind::IO, None, e.to_string().as_str()) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:?}: {}", red!("optrie::Error"), self.kind, self)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.msg),
            None => write!(f, "{}", self.msg),
        }
    }
}
impl std::error::Error for Error {}
