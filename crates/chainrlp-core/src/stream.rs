//! Input cursor over RLP-encoded bytes.

use crate::error::CodecError;

/// Wire category of the next item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Single byte below 0x80, encoded as itself
    Byte,
    String,
    List,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    kind: ItemKind,
    /// Offset of the first content byte
    start: usize,
    /// Content size in bytes
    size: usize,
}

/// Decoding cursor. Strategies pull items from it one at a time, entering
/// and leaving lists explicitly.
#[derive(Debug)]
pub struct Stream<'a> {
    input: &'a [u8],
    pos: usize,
    /// End offsets of the lists currently entered
    stack: Vec<usize>,
}

impl<'a> Stream<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn limit(&self) -> usize {
        self.stack.last().copied().unwrap_or(self.input.len())
    }

    fn read_byte(&self, at: usize) -> Result<u8, CodecError> {
        if at >= self.limit() {
            return Err(CodecError::UnexpectedEnd);
        }
        Ok(self.input[at])
    }

    fn read_size(&self, at: usize, len: usize) -> Result<usize, CodecError> {
        if at + len > self.limit() {
            return Err(CodecError::UnexpectedEnd);
        }
        let raw = &self.input[at..at + len];
        if raw[0] == 0 {
            return Err(CodecError::NonCanonicalSize);
        }
        if len > std::mem::size_of::<usize>() {
            return Err(CodecError::ValueTooLarge);
        }
        let size = raw.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
        if size < 56 {
            return Err(CodecError::NonCanonicalSize);
        }
        Ok(size)
    }

    fn header(&self) -> Result<Header, CodecError> {
        let b = self.read_byte(self.pos)?;
        let header = match b {
            0x00..=0x7f => Header {
                kind: ItemKind::Byte,
                start: self.pos,
                size: 1,
            },
            0x80..=0xb7 => {
                let size = (b - 0x80) as usize;
                if size == 1 && self.read_byte(self.pos + 1)? < 0x80 {
                    return Err(CodecError::NonCanonicalSize);
                }
                Header {
                    kind: ItemKind::String,
                    start: self.pos + 1,
                    size,
                }
            }
            0xb8..=0xbf => {
                let len = (b - 0xb7) as usize;
                Header {
                    kind: ItemKind::String,
                    start: self.pos + 1 + len,
                    size: self.read_size(self.pos + 1, len)?,
                }
            }
            0xc0..=0xf7 => Header {
                kind: ItemKind::List,
                start: self.pos + 1,
                size: (b - 0xc0) as usize,
            },
            0xf8..=0xff => {
                let len = (b - 0xf7) as usize;
                Header {
                    kind: ItemKind::List,
                    start: self.pos + 1 + len,
                    size: self.read_size(self.pos + 1, len)?,
                }
            }
        };
        match header.start.checked_add(header.size) {
            Some(end) if end <= self.limit() => Ok(header),
            _ => Err(CodecError::ValueTooLarge),
        }
    }

    /// Kind and content size of the next item, without consuming it.
    pub fn kind(&self) -> Result<(ItemKind, usize), CodecError> {
        let h = self.header()?;
        Ok((h.kind, h.size))
    }

    /// Consume the next item, which must be a byte or string.
    pub fn bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let h = self.header()?;
        if h.kind == ItemKind::List {
            return Err(CodecError::ExpectedString);
        }
        let content = &self.input[h.start..h.start + h.size];
        self.pos = h.start + h.size;
        Ok(content)
    }

    /// Enter the next item, which must be a list. Returns its content size.
    pub fn list(&mut self) -> Result<usize, CodecError> {
        let h = self.header()?;
        if h.kind != ItemKind::List {
            return Err(CodecError::ExpectedList);
        }
        self.stack.push(h.start + h.size);
        self.pos = h.start;
        Ok(h.size)
    }

    /// Leave the innermost list. All of its content must have been consumed.
    pub fn list_end(&mut self) -> Result<(), CodecError> {
        let end = *self.stack.last().ok_or(CodecError::NotInList)?;
        if self.pos != end {
            return Err(CodecError::NotAtListEnd);
        }
        self.stack.pop();
        Ok(())
    }

    /// True when the innermost list (or the whole input) has no items left.
    pub fn at_list_end(&self) -> bool {
        self.pos >= self.limit()
    }

    /// Check that a top-level decode consumed exactly the whole input.
    pub fn finish(&self) -> Result<(), CodecError> {
        if !self.stack.is_empty() || self.pos != self.input.len() {
            return Err(CodecError::TrailingData);
        }
        Ok(())
    }
}
