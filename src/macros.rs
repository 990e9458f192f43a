#![allow(unused_macros, dead_code)]
macro_rules! verbose_println {
    ($($p:expr),+) => {
        if (config::ARGS.verbose) {
            println!($($p),+);
        }
    }
}
macro_rules! info {
    ($($p:expr),+) => {
        println!(concat!(blue!("INFO"),": {}"),format_args!($($p),+))
    }
}

macro_rules! warn {
    ($($p:expr),+) => {
        eprintln!(concat!(red!("WARNING"),": {}"),format_args!($($p),+))
    }
}
macro_rules! row_err {
    ($line:expr, $($msg:expr),+) => {
        Error::new(
            crate::ErrorKind::MalformedRow,
            Some($line),
            format!("{} {}", red!("Malformed Row"), format!($($msg),+)).as_str(),
        )
    };
}
macro_rules! dup_err {
    ($line:expr, $($msg:expr),+) => {
        Error::new(
            crate::ErrorKind::DuplicateKey,
            Some($line),
            format!("{} {}", red!("Duplicate Opcode"), format!($($msg),+)).as_str(),
        )
    };
}
macro_rules! output_err {
    ($e:expr) => {
        Error::new(
            crate::ErrorKind::OutputWrite,
            None,
            format!("{} {}", red!("Output Error"), $e).as_str(),
        )
    };
}
macro_rules! color {
    ($color: literal, $msg: expr) => {
        concat!("\x1b[", $color, "m", $msg, "\x1b[0m")
    };
}
macro_rules! red {
    ($msg:expr) => {
        color!(91, $msg)
    };
}
macro_rules! blue {
    ($msg:expr) => {
        color!(94, $msg)
    };
}
