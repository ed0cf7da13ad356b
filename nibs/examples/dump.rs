//! This example prints the contents of a file as nibbles of a fixed width.
//!
//! Usage: `cargo run --example dump -- <path> [width]`

use nibs::{NibbleError, Nibs};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "logging")]
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(log::LevelFilter::Trace);
    }

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("missing input path")?;
    let width = match args.next() {
        Some(width) => width.parse()?,
        None => 4,
    };

    let mut reader = Nibs::new(BufReader::new(File::open(path)?));
    let digits = width as usize;

    for (i, nibble) in reader.nibbles(width).enumerate() {
        match nibble {
            Ok(value) => {
                print!("{value:0digits$b}");
                print!("{}", if (i + 1) % 8 == 0 { '\n' } else { ' ' });
            }
            Err(NibbleError::Exhausted | NibbleError::UnexpectedEof { .. }) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!();

    let remaining = reader.bits_remaining()?;

    if remaining > 0 {
        let tail = reader.nibble(remaining as u32)?;
        println!("{remaining} trailing bits: {tail:0width$b}", width = remaining as usize);
    }

    Ok(())
}

#[cfg(feature = "logging")]
static LOGGER: SimpleLogger = SimpleLogger;

#[cfg(feature = "logging")]
struct SimpleLogger;

#[cfg(feature = "logging")]
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::LevelFilter::Trace
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}
