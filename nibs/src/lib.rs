/*!
A sequential reader for nibbles of 1 to 64 bits.

`nibs` wraps any [`std::io::Read`] byte source and hands out consecutive runs
of bits ("nibbles", not limited to 4 bits) across byte boundaries. Bits are
read most significant bit first, and the first bit of a nibble ends up as the
most significant bit of the returned value.

The reader knows exactly how many bits are left once it has discovered the
end of the source, and it tells apart a stream that is exhausted from one
whose end simply hasn't been seen yet.

# Example
```rust
use nibs::{NibbleError, Nibs};

let data = [0b1010_0001_u8, 0xFF];
let mut reader = Nibs::new(&data[..]);

assert_eq!(reader.nibble(4)?, 0b1010);
assert_eq!(reader.nibble8(4)?, 0b0001);
assert_eq!(reader.bits_remaining()?, 8);
assert_eq!(reader.nibble(8)?, 0xFF);
assert!(matches!(reader.nibble(1), Err(NibbleError::Exhausted)));
# Ok::<(), NibbleError>(())
```

# Logging
With the `logging` feature enabled, refills and the discovery of the end of
the source are reported through the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod log;
mod settings;

use crate::buffer::Buffer;
use crate::error::bail;
use std::io::Read;

pub use crate::buffer::BUFFER_SIZE;
pub use crate::error::{NibbleError, Result};
pub use crate::settings::NibsSettings;

/// Reads a stream of bytes in nibbles of 1 to 64 bits.
#[derive(Debug)]
pub struct Nibs<R> {
    source: R,
    buffer: Buffer,
    settings: NibsSettings,
}

impl<R: Read> Nibs<R> {
    /// Create a new reader on top of `source`.
    ///
    /// No data is read until the first nibble is requested.
    pub fn new(source: R) -> Self {
        Self::with_settings(source, NibsSettings::default())
    }

    /// Create a new reader on top of `source`, using the given settings.
    pub fn with_settings(source: R, settings: NibsSettings) -> Self {
        Self {
            source,
            buffer: Buffer::new(),
            settings: settings.clamped(),
        }
    }

    /// Read `width` bits and return them as the low bits of a `u64`.
    ///
    /// `width` must be in the range 1 to 64 inclusive, otherwise
    /// [`NibbleError::InvalidWidth`] is returned. A nibble is either read in
    /// full or not at all: on error, no bits are consumed.
    ///
    /// Once all bits have been consumed, the error that ended the stream is
    /// returned, which is [`NibbleError::Exhausted`] unless the source failed.
    /// Asking for more bits than are left returns
    /// [`NibbleError::UnexpectedEof`], even if the stream was ended by a
    /// failing source.
    pub fn nibble(&mut self, width: u32) -> Result<u64> {
        self.read_bits(width, 64)
    }

    /// Like [`Nibs::nibble`], but `width` must be in the range 1 to 8.
    pub fn nibble8(&mut self, width: u32) -> Result<u8> {
        Ok(self.read_bits(width, 8)? as u8)
    }

    /// Like [`Nibs::nibble`], but `width` must be in the range 1 to 16.
    pub fn nibble16(&mut self, width: u32) -> Result<u16> {
        Ok(self.read_bits(width, 16)? as u16)
    }

    /// Like [`Nibs::nibble`], but `width` must be in the range 1 to 32.
    pub fn nibble32(&mut self, width: u32) -> Result<u32> {
        Ok(self.read_bits(width, 32)? as u32)
    }

    /// Return the number of bits left in the stream.
    ///
    /// The number is only known after the end of the source has been
    /// discovered, which happens while reading. Before that,
    /// [`NibbleError::StreamUnknown`] is returned.
    pub fn bits_remaining(&self) -> Result<u64> {
        match self.buffer.terminal() {
            Some(_) => Ok(self.buffer.available() as u64),
            None => Err(NibbleError::StreamUnknown),
        }
    }

    /// Whether the end of the source has been discovered.
    pub fn is_terminal(&self) -> bool {
        self.buffer.terminal().is_some()
    }

    /// Return the number of bits consumed so far.
    pub fn position(&self) -> u64 {
        self.buffer.position()
    }

    /// Return an iterator over nibbles of `width` bits.
    ///
    /// The iterator stops after yielding the first error.
    pub fn nibbles(&mut self, width: u32) -> Nibbles<'_, R> {
        Nibbles {
            reader: self,
            width,
            done: false,
        }
    }

    fn read_bits(&mut self, width: u32, max: u32) -> Result<u64> {
        if !(1..=max).contains(&width) {
            bail!(NibbleError::InvalidWidth { width, max });
        }

        let bits = width as usize;

        while self
            .buffer
            .needs_refill(bits, self.settings.low_water_mark)
        {
            self.buffer.refill(&mut self.source);
        }

        if let Some(terminal) = self.buffer.terminal() {
            let remaining = self.buffer.available();

            if remaining == 0 {
                return Err(terminal.to_error());
            }

            if bits > remaining {
                bail!(NibbleError::UnexpectedEof {
                    requested: width,
                    remaining: remaining as u64,
                });
            }
        }

        let mut value = 0;

        for _ in 0..width {
            value = (value << 1) | self.buffer.read_bit()?;
        }

        Ok(value)
    }
}

/// An iterator over nibbles of a fixed width.
///
/// Created by [`Nibs::nibbles`].
#[derive(Debug)]
pub struct Nibbles<'a, R> {
    reader: &'a mut Nibs<R>,
    width: u32,
    done: bool,
}

impl<R: Read> Iterator for Nibbles<'_, R> {
    type Item = Result<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.reader.nibble(self.width);
        self.done = item.is_err();

        Some(item)
    }
}
