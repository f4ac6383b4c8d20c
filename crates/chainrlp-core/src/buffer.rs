//! Output buffer for write strategies.

use bytes::{BufMut, Bytes, BytesMut};

/// Position of an open list, returned by [`EncodeBuffer::list_start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMark(usize);

/// Growable RLP output. List headers are inserted when the list is closed,
/// once the payload size is known.
#[derive(Debug, Default)]
pub struct EncodeBuffer {
    buf: BytesMut,
}

impl EncodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Write `data` as an RLP string.
    pub fn write_bytes(&mut self, data: &[u8]) {
        if data.len() == 1 && data[0] < 0x80 {
            self.buf.put_u8(data[0]);
            return;
        }
        put_header(&mut self.buf, data.len(), 0x80, 0xb7);
        self.buf.put_slice(data);
    }

    /// Write `v` as a minimal big-endian string; zero is the empty string.
    pub fn write_uint(&mut self, v: u128) {
        let raw = v.to_be_bytes();
        let skip = raw.iter().take_while(|b| **b == 0).count();
        self.write_bytes(&raw[skip..]);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_uint(v as u128);
    }

    pub fn write_empty_string(&mut self) {
        self.buf.put_u8(0x80);
    }

    pub fn write_empty_list(&mut self) {
        self.buf.put_u8(0xc0);
    }

    pub fn list_start(&mut self) -> ListMark {
        ListMark(self.buf.len())
    }

    /// Close the list opened at `mark`, prefixing its payload with a header.
    pub fn list_end(&mut self, mark: ListMark) {
        let payload = self.buf.split_off(mark.0);
        put_header(&mut self.buf, payload.len(), 0xc0, 0xf7);
        self.buf.unsplit(payload);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.buf)
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

fn put_header(buf: &mut BytesMut, size: usize, short: u8, long: u8) {
    if size < 56 {
        buf.put_u8(short + size as u8);
        return;
    }
    let raw = (size as u64).to_be_bytes();
    let skip = raw.iter().take_while(|b| **b == 0).count();
    buf.put_u8(long + (raw.len() - skip) as u8);
    buf.put_slice(&raw[skip..]);
}
