//! The fixed-size lookahead buffer that sits between a byte source and the
//! bit-level API.

use crate::error::{NibbleError, Result};
use crate::log::{ldebug, ltrace};
use std::io::{self, Read};
use std::sync::Arc;

/// The capacity of the lookahead buffer, in bytes.
pub const BUFFER_SIZE: usize = 64;

/// How the byte source ended.
#[derive(Debug, Clone)]
pub(crate) enum Terminal {
    End,
    Failed(Arc<io::Error>),
}

impl Terminal {
    pub(crate) fn to_error(&self) -> NibbleError {
        match self {
            Self::End => NibbleError::Exhausted,
            Self::Failed(e) => NibbleError::Io(e.clone()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Buffer {
    data: [u8; BUFFER_SIZE],
    /// Number of valid bytes in `data`.
    used: usize,
    /// Position of the next bit, counted from the start of `data`.
    cursor: usize,
    /// Number of bytes dropped from the front by compaction.
    discarded: u64,
    terminal: Option<Terminal>,
}

impl Buffer {
    pub(crate) fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            used: 0,
            cursor: 0,
            discarded: 0,
            terminal: None,
        }
    }

    #[inline]
    pub(crate) fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    /// The number of bits that can be read without touching the source.
    #[inline]
    pub(crate) fn available(&self) -> usize {
        self.used * 8 - self.cursor
    }

    #[inline]
    pub(crate) fn position(&self) -> u64 {
        self.discarded * 8 + self.cursor as u64
    }

    #[inline]
    fn byte_pos(&self) -> usize {
        self.cursor / 8
    }

    #[inline]
    fn bit_pos(&self) -> usize {
        self.cursor % 8
    }

    /// Whether the buffer should be refilled before `bits` more bits are read.
    #[inline]
    pub(crate) fn needs_refill(&self, bits: usize, low_water_mark: usize) -> bool {
        self.terminal.is_none() && (self.byte_pos() >= low_water_mark || self.available() < bits)
    }

    /// Drop the fully consumed bytes and pull new ones from `source` into the
    /// freed space.
    ///
    /// A short read is followed by exactly one more read, so that the end of
    /// the source is discovered as early as possible. Once the source has
    /// ended or failed, the buffer is never refilled again.
    pub(crate) fn refill(&mut self, source: &mut impl Read) {
        if self.terminal.is_some() {
            return;
        }

        let compacted = self.compact();
        let requested = BUFFER_SIZE - self.used;

        let first = self.fill(source);

        if first.is_some() && self.used < BUFFER_SIZE {
            // A short read doesn't tell us whether the source is exhausted.
            self.fill(source);
        }

        ltrace!(
            "refilled buffer: compacted {} bytes, requested {}, now holding {}",
            compacted,
            requested,
            self.used
        );
    }

    /// Shift the unconsumed bytes to the front of the buffer.
    fn compact(&mut self) -> usize {
        let byte_pos = self.byte_pos();

        if byte_pos > 0 {
            self.data.copy_within(byte_pos..self.used, 0);
            self.used -= byte_pos;
            self.cursor -= byte_pos * 8;
            self.discarded += byte_pos as u64;
        }

        byte_pos
    }

    /// Read once into the unfilled tail. Returns the number of bytes
    /// produced, or `None` if the source ended or failed.
    fn fill(&mut self, source: &mut impl Read) -> Option<usize> {
        let tail = &mut self.data[self.used..];
        let requested = tail.len();

        let result = loop {
            match source.read(tail) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => break result,
            }
        };

        match result {
            Ok(0) => {
                ldebug!("reached end of source after {} bytes", self.discarded + self.used as u64);
                self.terminal = Some(Terminal::End);

                None
            }
            Ok(n) => {
                assert!(
                    n <= requested,
                    "byte source reported {n} bytes read into a buffer of {requested} bytes"
                );
                self.used += n;

                Some(n)
            }
            Err(e) => {
                ldebug!("byte source failed: {}", e);
                self.terminal = Some(Terminal::Failed(Arc::new(e)));

                None
            }
        }
    }

    /// Read the next bit, most significant bit of each byte first.
    #[inline]
    pub(crate) fn read_bit(&mut self) -> Result<u64> {
        let byte_pos = self.byte_pos();

        if byte_pos >= self.used {
            return match &self.terminal {
                Some(terminal) => Err(terminal.to_error()),
                None => panic!("ran out of buffered bits without reaching the end of the source"),
            };
        }

        let shift = 7 - self.bit_pos();
        self.cursor += 1;

        Ok(u64::from(self.data[byte_pos] >> shift) & 1)
    }
}
