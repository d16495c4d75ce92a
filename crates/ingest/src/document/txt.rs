use std::io::{BufReader, Read};

use super::{ExtractionError, TextUnit};

const MAX_CARRY_BLOCKS: usize = 16;

/// Streams a plain-text source as blocks of roughly `block_bytes` bytes.
///
/// A block never ends inside a UTF-8 sequence or inside a word: the
/// incomplete tail is carried into the next block. A word longer than the
/// block keeps growing the block until whitespace shows up, up to
/// `MAX_CARRY_BLOCKS` blocks.
pub struct BlockReader<R> {
    reader: BufReader<R>,
    block_bytes: usize,
    carry: Vec<u8>,
    ordinal: usize,
    done: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(reader: R, block_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            block_bytes: block_bytes.max(1),
            carry: Vec::new(),
            ordinal: 0,
            done: false,
        }
    }

    fn read_block(&mut self) -> Result<Option<String>, ExtractionError> {
        let mut buf = std::mem::take(&mut self.carry);
        let read = (&mut self.reader)
            .take(self.block_bytes as u64)
            .read_to_end(&mut buf)?;
        let eof = read < self.block_bytes;
        if buf.is_empty() {
            return Ok(None);
        }

        if !eof {
            let keep = split_point(&buf, self.block_bytes * MAX_CARRY_BLOCKS);
            self.carry = buf.split_off(keep);
        }
        if eof {
            self.done = true;
        }

        Ok(Some(String::from_utf8(buf)?))
    }
}

/// Index at which `buf` should be cut so the head ends on a complete
/// UTF-8 sequence and a word boundary. Returns 0 (carry everything) while a
/// single word is still shorter than `max_len`.
fn split_point(buf: &[u8], max_len: usize) -> usize {
    let valid = match std::str::from_utf8(buf) {
        Ok(_) => buf.len(),
        // error_len() == None means the buffer ends mid-sequence.
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(_) => buf.len(),
    };
    let head = &buf[..valid];
    if head.last().is_some_and(|b| b.is_ascii_whitespace()) {
        return valid;
    }
    match head.iter().rposition(|b| b.is_ascii_whitespace()) {
        Some(pos) => pos + 1,
        None if buf.len() < max_len => 0,
        None => valid,
    }
}

impl<R: Read> Iterator for BlockReader<R> {
    type Item = Result<TextUnit, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.read_block() {
                Ok(Some(text)) => {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    self.ordinal += 1;
                    return Some(Ok(TextUnit {
                        ordinal: self.ordinal,
                        text: text.to_string(),
                    }));
                }
                Ok(None) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
