//! Append-only typed encoder over a growing byte buffer.

use wirepack_buffers::Writer;

use crate::encode::Encode;

/// Serializes values into a single growing byte buffer.
///
/// Values are streamed directly into the buffer — containers declare their
/// length before their elements and nothing is patched after the fact.
/// Encoding well-typed input cannot fail.
pub struct Encoder {
    pub writer: Writer,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Creates an encoder with a custom buffer allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            writer: Writer::with_alloc_size(alloc_size),
        }
    }

    /// Appends the encoding of `value` and returns the encoder for chaining.
    pub fn push<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(self);
        self
    }

    /// Extracts the encoded bytes, leaving the encoder reusable.
    pub fn finish(&mut self) -> Vec<u8> {
        self.writer.flush()
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(0xc0);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.writer.u8(if value { 0xc3 } else { 0xc2 });
    }

    /// Writes an unsigned integer in its smallest encoding.
    pub fn write_uint(&mut self, value: u64) {
        if value <= 0x7f {
            self.writer.u8(value as u8); // positive fixint
        } else if value <= 0xff {
            self.writer.u16(0xcc00 | value as u16);
        } else if value <= 0xffff {
            self.writer.u8u16(0xcd, value as u16);
        } else if value <= 0xffff_ffff {
            self.writer.u8u32(0xce, value as u32);
        } else {
            self.writer.u8u64(0xcf, value);
        }
    }

    /// Writes a signed integer in its smallest encoding.
    ///
    /// Non-negative values take the unsigned markers, matching what every
    /// conforming encoder emits for them.
    pub fn write_int(&mut self, value: i64) {
        if value >= 0 {
            self.write_uint(value as u64);
        } else if value >= -0x20 {
            self.writer.u8(value as u8); // negative fixint: 0xe0..0xff
        } else if value >= -0x80 {
            self.writer.u16(0xd000 | (value as i8 as u8) as u16);
        } else if value >= -0x8000 {
            self.writer.u8u16(0xd1, value as u16);
        } else if value >= -0x8000_0000 {
            self.writer.u8u32(0xd2, value as u32);
        } else {
            self.writer.u8u64(0xd3, value as u64);
        }
    }

    pub fn write_f32(&mut self, value: f32) {
        self.writer.u8f32(0xca, value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.writer.u8f64(0xcb, value);
    }

    pub fn write_str_hdr(&mut self, length: usize) {
        if length <= 0x1f {
            self.writer.u8(0xa0 | length as u8); // fixstr
        } else if length <= 0xff {
            self.writer.u16(0xd900 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xda, length as u16);
        } else {
            self.writer.u8u32(0xdb, length as u32);
        }
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_str_hdr(value.len());
        self.writer.utf8(value);
    }

    pub fn write_bin_hdr(&mut self, length: usize) {
        if length <= 0xff {
            self.writer.u16(0xc400 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xc5, length as u16);
        } else {
            self.writer.u8u32(0xc6, length as u32);
        }
    }

    pub fn write_bin(&mut self, value: &[u8]) {
        self.write_bin_hdr(value.len());
        self.writer.buf(value);
    }

    pub fn write_array_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(0x90 | length as u8); // fixarray
        } else if length <= 0xffff {
            self.writer.u8u16(0xdc, length as u16);
        } else {
            self.writer.u8u32(0xdd, length as u32);
        }
    }

    pub fn write_map_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(0x80 | length as u8); // fixmap
        } else if length <= 0xffff {
            self.writer.u8u16(0xde, length as u16);
        } else {
            self.writer.u8u32(0xdf, length as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(f: impl FnOnce(&mut Encoder)) -> Vec<u8> {
        let mut enc = Encoder::new();
        f(&mut enc);
        enc.finish()
    }

    #[test]
    fn nil_and_bool_markers() {
        assert_eq!(bytes_of(|e| e.write_nil()), [0xc0]);
        assert_eq!(bytes_of(|e| e.write_bool(false)), [0xc2]);
        assert_eq!(bytes_of(|e| e.write_bool(true)), [0xc3]);
    }

    #[test]
    fn uint_smallest_encoding() {
        assert_eq!(bytes_of(|e| e.write_uint(0)), [0x00]);
        assert_eq!(bytes_of(|e| e.write_uint(0x7f)), [0x7f]);
        assert_eq!(bytes_of(|e| e.write_uint(0x80)), [0xcc, 0x80]);
        assert_eq!(bytes_of(|e| e.write_uint(0x100)), [0xcd, 0x01, 0x00]);
        assert_eq!(
            bytes_of(|e| e.write_uint(0x1_0000)),
            [0xce, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            bytes_of(|e| e.write_uint(u64::MAX)),
            [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn int_smallest_encoding() {
        assert_eq!(bytes_of(|e| e.write_int(-1)), [0xff]);
        assert_eq!(bytes_of(|e| e.write_int(-32)), [0xe0]);
        assert_eq!(bytes_of(|e| e.write_int(-33)), [0xd0, 0xdf]);
        assert_eq!(bytes_of(|e| e.write_int(-129)), [0xd1, 0xff, 0x7f]);
        assert_eq!(
            bytes_of(|e| e.write_int(-0x10000)),
            [0xd2, 0xff, 0xff, 0x00, 0x00]
        );
        assert_eq!(
            bytes_of(|e| e.write_int(i64::MIN)),
            [0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        // Non-negative goes through the uint markers.
        assert_eq!(bytes_of(|e| e.write_int(5)), [0x05]);
    }

    #[test]
    fn str_headers() {
        assert_eq!(bytes_of(|e| e.write_str("")), [0xa0]);
        assert_eq!(bytes_of(|e| e.write_str("foo")), [0xa3, b'f', b'o', b'o']);
        let long = "a".repeat(32);
        let out = bytes_of(|e| e.write_str(&long));
        assert_eq!(&out[..2], &[0xd9, 32]);
        let longer = "a".repeat(256);
        let out = bytes_of(|e| e.write_str(&longer));
        assert_eq!(&out[..3], &[0xda, 0x01, 0x00]);
    }

    #[test]
    fn bin_headers() {
        assert_eq!(bytes_of(|e| e.write_bin(&[1, 2, 3])), [0xc4, 3, 1, 2, 3]);
        let big = vec![0u8; 256];
        let out = bytes_of(|e| e.write_bin(&big));
        assert_eq!(&out[..3], &[0xc5, 0x01, 0x00]);
    }

    #[test]
    fn container_headers() {
        assert_eq!(bytes_of(|e| e.write_array_hdr(0)), [0x90]);
        assert_eq!(bytes_of(|e| e.write_array_hdr(15)), [0x9f]);
        assert_eq!(bytes_of(|e| e.write_array_hdr(16)), [0xdc, 0x00, 0x10]);
        assert_eq!(bytes_of(|e| e.write_map_hdr(0)), [0x80]);
        assert_eq!(bytes_of(|e| e.write_map_hdr(16)), [0xde, 0x00, 0x10]);
    }

    #[test]
    fn push_chains() {
        let mut enc = Encoder::new();
        enc.push(&1u8).push(&true);
        assert_eq!(enc.finish(), [0x01, 0xc3]);
    }
}
