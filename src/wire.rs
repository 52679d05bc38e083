//! Frame codec primitives.
//!
//! Positional read/write of protocol fields within a single contiguous
//! frame buffer, through an internal cursor. All multi-byte integers are
//! Big Endian and unsigned on the wire.
//!
//! Field encodings:
//!
//! ```text
//! u8/u16/u32/u64   fixed width, big-endian
//! block            raw bytes, no length prefix
//! string           u8 length, then that many UTF-8 bytes (max 255)
//! string array     u8 count, then `count` strings, order significant
//! dictionary       u8 count, then `count` "key=value" strings
//! ```
//!
//! # Example
//!
//! ```
//! use zwire::wire::{WireReader, WireWriter};
//!
//! let mut writer = WireWriter::with_capacity(2 + 1 + 5);
//! writer.put_u16(0x1234);
//! writer.put_string("hello").unwrap();
//! let frame = writer.finish();
//!
//! let mut reader = WireReader::new(&frame);
//! assert_eq!(reader.get_u16().unwrap(), 0x1234);
//! assert_eq!(reader.get_string().unwrap(), "hello");
//! ```

use bytes::Bytes;

use crate::error::{Result, ZwireError};
use crate::headers::Headers;

/// Maximum byte length of a length-prefixed string.
pub const MAX_STRING_LEN: usize = 255;

/// Maximum element count of a string array or dictionary.
pub const MAX_LIST_LEN: usize = 255;

/// Encoded width of a short string.
pub fn string_size(value: &str) -> usize {
    1 + value.len()
}

/// Encoded width of a string array.
pub fn string_list_size(values: &[String]) -> usize {
    1 + values.iter().map(|v| 1 + v.len()).sum::<usize>()
}

/// Encoded width of a dictionary.
///
/// Each entry is a short string holding `key=value`.
pub fn dict_size(dict: &Headers) -> usize {
    1 + dict.iter().map(|(k, v)| 1 + k.len() + 1 + v.len()).sum::<usize>()
}

/// Write cursor over an output frame buffer.
///
/// Callers compute the exact encoded size up front and allocate once;
/// `finish` hands back the frame.
#[derive(Debug)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Create a writer with a precomputed capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Put a 1-byte number to the frame.
    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Put a 2-byte number to the frame.
    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Put a 4-byte number to the frame.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Put an 8-byte number to the frame.
    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Put a raw block to the frame, no length prefix.
    pub fn put_block(&mut self, block: &[u8]) {
        self.buf.extend_from_slice(block);
    }

    /// Put a length-prefixed string to the frame.
    ///
    /// Fails with [`ZwireError::FieldTooLong`] when the string is longer
    /// than 255 bytes; the length prefix is a single octet.
    pub fn put_string(&mut self, value: &str) -> Result<()> {
        if value.len() > MAX_STRING_LEN {
            return Err(ZwireError::FieldTooLong(format!(
                "string of {} bytes exceeds the 255-byte limit",
                value.len()
            )));
        }
        self.put_u8(value.len() as u8);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Put a count-prefixed string array to the frame, preserving order.
    pub fn put_string_list(&mut self, values: &[String]) -> Result<()> {
        if values.len() > MAX_LIST_LEN {
            return Err(ZwireError::FieldTooLong(format!(
                "string array of {} elements exceeds the 255-element limit",
                values.len()
            )));
        }
        self.put_u8(values.len() as u8);
        for value in values {
            self.put_string(value)?;
        }
        Ok(())
    }

    /// Put a dictionary to the frame as count-prefixed `key=value` strings.
    pub fn put_dict(&mut self, dict: &Headers) -> Result<()> {
        if dict.len() > MAX_LIST_LEN {
            return Err(ZwireError::FieldTooLong(format!(
                "dictionary of {} entries exceeds the 255-entry limit",
                dict.len()
            )));
        }
        self.put_u8(dict.len() as u8);
        for (key, value) in dict.iter() {
            if 1 + key.len() + 1 + value.len() > 1 + MAX_STRING_LEN {
                return Err(ZwireError::FieldTooLong(format!(
                    "dictionary entry '{}' exceeds the 255-byte limit",
                    key
                )));
            }
            self.put_u8((key.len() + 1 + value.len()) as u8);
            self.buf.extend_from_slice(key.as_bytes());
            self.buf.push(b'=');
            self.buf.extend_from_slice(value.as_bytes());
        }
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the finished frame.
    pub fn finish(self) -> Bytes {
        Bytes::from(self.buf)
    }
}

/// Read cursor (the "needle") over an input frame buffer.
///
/// Every getter checks the remaining length first; a read past the end
/// yields [`ZwireError::Malformed`] and the caller discards the whole
/// in-progress decode. No getter leaves the cursor mid-field on error.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a reader over a frame.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() - self.pos < n {
            return Err(ZwireError::Malformed(format!(
                "short frame: needed {} more bytes, {} left",
                n,
                self.buf.len() - self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Get a 1-byte number from the frame.
    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Get a 2-byte number from the frame.
    pub fn get_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Get a 4-byte number from the frame.
    pub fn get_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Get an 8-byte number from the frame.
    pub fn get_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Get a raw block of `n` bytes from the frame.
    pub fn get_block(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Get a length-prefixed string from the frame.
    pub fn get_string(&mut self) -> Result<String> {
        let len = self.get_u8()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| ZwireError::Malformed("string field is not valid UTF-8".into()))
    }

    /// Get a count-prefixed string array from the frame.
    pub fn get_string_list(&mut self) -> Result<Vec<String>> {
        let count = self.get_u8()? as usize;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.get_string()?);
        }
        Ok(values)
    }

    /// Get a dictionary from the frame.
    ///
    /// Each entry is split on the first `=` only, so values containing
    /// `=` round-trip. An entry with no `=` is a malformed message.
    pub fn get_dict(&mut self) -> Result<Headers> {
        let count = self.get_u8()? as usize;
        let mut dict = Headers::new();
        for _ in 0..count {
            let entry = self.get_string()?;
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                ZwireError::Malformed(format!("dictionary entry '{}' has no '='", entry))
            })?;
            dict.insert(key, value);
        }
        Ok(dict)
    }

    /// Number of unread bytes left in the frame.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_byte_order() {
        let mut writer = WireWriter::with_capacity(2);
        writer.put_u16(0x1234);
        let frame = writer.finish();
        assert_eq!(&frame[..], &[0x12, 0x34]);
    }

    #[test]
    fn test_unsigned_decode_never_negative() {
        // 0xFFFF must decode as 65535, not -1.
        let mut reader = WireReader::new(&[0xFF, 0xFF]);
        assert_eq!(reader.get_u16().unwrap(), 65535);

        let mut reader = WireReader::new(&[0xFF; 8]);
        assert_eq!(reader.get_u64().unwrap(), u64::MAX);
    }

    #[test]
    fn test_all_widths_roundtrip() {
        let mut writer = WireWriter::with_capacity(15);
        writer.put_u8(0xAB);
        writer.put_u16(0xCDEF);
        writer.put_u32(0x01234567);
        writer.put_u64(0x89ABCDEF01234567);
        let frame = writer.finish();
        assert_eq!(frame.len(), 15);

        let mut reader = WireReader::new(&frame);
        assert_eq!(reader.get_u8().unwrap(), 0xAB);
        assert_eq!(reader.get_u16().unwrap(), 0xCDEF);
        assert_eq!(reader.get_u32().unwrap(), 0x01234567);
        assert_eq!(reader.get_u64().unwrap(), 0x89ABCDEF01234567);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_block_roundtrip() {
        let mut writer = WireWriter::with_capacity(4);
        writer.put_block(b"\x00\x01\x02\x03");
        let frame = writer.finish();

        let mut reader = WireReader::new(&frame);
        assert_eq!(reader.get_block(4).unwrap(), b"\x00\x01\x02\x03");
    }

    #[test]
    fn test_string_boundary_255() {
        let max = "x".repeat(255);
        let mut writer = WireWriter::with_capacity(string_size(&max));
        writer.put_string(&max).unwrap();
        let frame = writer.finish();
        assert_eq!(frame.len(), 256);

        let mut reader = WireReader::new(&frame);
        assert_eq!(reader.get_string().unwrap(), max);
    }

    #[test]
    fn test_string_over_255_rejected() {
        let long = "x".repeat(256);
        let mut writer = WireWriter::with_capacity(1);
        let result = writer.put_string(&long);
        assert!(matches!(result, Err(ZwireError::FieldTooLong(_))));
    }

    #[test]
    fn test_string_list_preserves_order() {
        let values = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let mut writer = WireWriter::with_capacity(string_list_size(&values));
        writer.put_string_list(&values).unwrap();

        let frame = writer.finish();
        let mut reader = WireReader::new(&frame);
        assert_eq!(reader.get_string_list().unwrap(), values);
    }

    #[test]
    fn test_empty_string_list() {
        let mut writer = WireWriter::with_capacity(1);
        writer.put_string_list(&[]).unwrap();

        let frame = writer.finish();
        let mut reader = WireReader::new(&frame);
        assert!(reader.get_string_list().unwrap().is_empty());
    }

    #[test]
    fn test_dict_roundtrip() {
        let mut dict = Headers::new();
        dict.insert("Name", "Brutus");
        dict.insert("Age", "43");

        let mut writer = WireWriter::with_capacity(dict_size(&dict));
        writer.put_dict(&dict).unwrap();

        let frame = writer.finish();
        let mut reader = WireReader::new(&frame);
        assert_eq!(reader.get_dict().unwrap(), dict);
    }

    #[test]
    fn test_dict_value_containing_equals() {
        // Split happens on the first '=' only.
        let mut dict = Headers::new();
        dict.insert("key", "a=b");

        let mut writer = WireWriter::with_capacity(dict_size(&dict));
        writer.put_dict(&dict).unwrap();

        let frame = writer.finish();
        let mut reader = WireReader::new(&frame);
        let decoded = reader.get_dict().unwrap();
        assert_eq!(decoded.get("key", ""), "a=b");
    }

    #[test]
    fn test_dict_entry_without_separator_rejected() {
        // Hand-build a dictionary whose single entry lacks '='.
        let mut writer = WireWriter::with_capacity(7);
        writer.put_u8(1);
        writer.put_string("noeq").unwrap();

        let frame = writer.finish();
        let mut reader = WireReader::new(&frame);
        assert!(matches!(
            reader.get_dict(),
            Err(ZwireError::Malformed(_))
        ));
    }

    #[test]
    fn test_underrun_is_malformed() {
        let mut reader = WireReader::new(&[0x01]);
        assert!(matches!(reader.get_u16(), Err(ZwireError::Malformed(_))));

        // A string length prefix promising more bytes than exist.
        let mut reader = WireReader::new(&[0x05, b'a', b'b']);
        assert!(matches!(reader.get_string(), Err(ZwireError::Malformed(_))));
    }

    #[test]
    fn test_sizing_helpers_match_encoding() {
        let values = vec!["one".to_string(), "two".to_string()];
        let mut dict = Headers::new();
        dict.insert("k", "v");

        let expected = string_size("hi") + string_list_size(&values) + dict_size(&dict);
        let mut writer = WireWriter::with_capacity(expected);
        writer.put_string("hi").unwrap();
        writer.put_string_list(&values).unwrap();
        writer.put_dict(&dict).unwrap();
        assert_eq!(writer.len(), expected);
    }
}
