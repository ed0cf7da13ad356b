#![no_main]

use libfuzzer_sys::fuzz_target;
use nibs::{NibbleError, Nibs};
use std::io::{self, Read};

/// Hands out the input in reads of varying length and can fail after a given
/// number of bytes.
struct Source<'a> {
    data: &'a [u8],
    chunks: &'a [u8],
    fail_after: Option<usize>,
    produced: usize,
}

impl Read for Source<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_after.is_some_and(|n| self.produced >= n) {
            return Err(io::Error::other("fuzz"));
        }

        let chunk = match self.chunks.split_first() {
            Some((first, rest)) => {
                self.chunks = rest;
                usize::from(*first).max(1)
            }
            None => buf.len(),
        };

        let mut len = buf.len().min(chunk).min(self.data.len());

        if let Some(n) = self.fail_after {
            len = len.min(n - self.produced);
        }

        buf[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        self.produced += len;

        Ok(len)
    }
}

// Header layout (2 bytes):
// [0]     number of bytes in the chunk table that follows the header
// [1]     fail after this many bytes (0 = never fail)
// [2..]   chunk table (read lengths, also used as nibble widths mod 66),
//         followed by the stream itself

const HEADER_SIZE: usize = 2;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let num_chunks = usize::from(data[0]).min(data.len() - HEADER_SIZE);
    let fail_after = (data[1] != 0).then_some(usize::from(data[1]));
    let chunks = &data[HEADER_SIZE..HEADER_SIZE + num_chunks];
    let stream = &data[HEADER_SIZE + num_chunks..];

    let source = Source {
        data: stream,
        chunks,
        fail_after,
        produced: 0,
    };

    let mut reader = Nibs::new(source);
    let mut consumed = 0_u64;
    let available = stream.len().min(fail_after.unwrap_or(usize::MAX)) as u64 * 8;

    for width in chunks.iter().cycle().map(|w| u32::from(*w % 66)).take(4096) {
        match reader.nibble(width) {
            Ok(value) => {
                assert!(width == 64 || value >> width == 0);
                consumed += u64::from(width);
            }
            Err(NibbleError::InvalidWidth { .. }) => assert!(width == 0 || width > 64),
            Err(NibbleError::UnexpectedEof { remaining, .. }) => {
                assert_eq!(remaining, available - consumed);
            }
            Err(_) => {
                assert_eq!(consumed, available);
                assert_eq!(reader.bits_remaining().ok(), Some(0));
            }
        }

        assert_eq!(reader.position(), consumed);
    }
});
