use byteorder::{ByteOrder, LittleEndian};

use super::error::DecodeError;
use super::leb128;

/// Sequential, bounds-checked reader over a borrowed byte buffer.
///
/// The position may be moved past the end of the buffer with
/// [`Reader::skip_to`]; every subsequent read then fails with
/// [`DecodeError::UnexpectedEof`] and [`Reader::at_end`] reports `true`.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Reader<'a> {
        Reader { bytes, pos: 0 }
    }
}

impl<'a> Reader<'a> {
    // Basic operations --------------------------------------------------------
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn has_at_least(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    /// Force the read position, used to resynchronise on section and body
    /// boundaries.
    pub fn skip_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        match self.bytes.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(DecodeError::UnexpectedEof { offset: self.pos }),
        }
    }

    /// Reads exactly `len` bytes. No partial reads: on failure the position is
    /// left untouched.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::UnexpectedEof { offset: self.pos })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    // Read and interpret types ------------------------------------------------

    // le
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_bytes(4).map(LittleEndian::read_u32)
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_bytes(4).map(LittleEndian::read_f32)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.read_bytes(8).map(LittleEndian::read_f64)
    }

    pub fn read_vu32(&mut self) -> Result<u32, DecodeError> {
        leb128::read_vu32(self)
    }

    pub fn read_vs32(&mut self) -> Result<i32, DecodeError> {
        leb128::read_vs32(self)
    }

    pub fn read_vs33(&mut self) -> Result<i64, DecodeError> {
        leb128::read_vs33(self)
    }

    pub fn read_vs64(&mut self) -> Result<i64, DecodeError> {
        leb128::read_vs64(self)
    }

    /// Reads a length-prefixed UTF-8 name.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_vu32()? as usize;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|source| DecodeError::InvalidUtf8 { offset, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_byte_and_eof() {
        let bytes = [0x00, 0x80, 0xff];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.peek(), Some(0x00));
        assert_eq!(reader.read_byte(), Ok(0x00));
        assert_eq!(reader.read_byte(), Ok(0x80));
        assert_eq!(reader.read_byte(), Ok(0xff));
        assert!(reader.at_end());
        assert_eq!(reader.peek(), None);
        assert_eq!(
            reader.read_byte(),
            Err(DecodeError::UnexpectedEof { offset: 3 })
        );
    }

    #[test]
    fn test_read_bytes_no_partial_read() {
        let bytes = [1, 2, 3];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_bytes(2), Ok(&[1u8, 2][..]));
        assert_eq!(
            reader.read_bytes(2),
            Err(DecodeError::UnexpectedEof { offset: 2 })
        );
        assert_eq!(reader.pos(), 2);
        assert!(reader.read_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_read_u32() {
        let read = |v: &[u8]| Reader::new(v).read_u32().expect("Failed to read u32");

        assert_eq!(read(&[0x00, 0x61, 0x73, 0x6d]), 0x6d736100);
        assert_eq!(read(&[0x01, 0x00, 0x00, 0x00]), 1);
        assert_eq!(read(&[0x00, 0x01, 0x00, 0x00]), 256);
        assert_eq!(read(&[0xff, 0xff, 0xff, 0xff]), 4294967295);
        assert!(Reader::new(&[0x00, 0x61, 0x73]).read_u32().is_err());
    }

    #[test]
    fn test_read_f32() {
        let read = |v: &[u8]| Reader::new(v).read_f32().expect("Failed to read f32");

        assert!(read(&[0, 0, 192, 127]).is_nan());
        assert_eq!(read(&[0, 0, 0, 0]), 0.0);
        assert_eq!(read(&[219, 15, 201, 64]), 6.28318548202514648);
        assert_eq!(read(&[255, 255, 127, 127]), 3.4028234e+38);
        assert_eq!(read(&[249, 2, 21, 80]), 1.0e10);
    }

    #[test]
    fn test_read_f64() {
        let read = |v: &[u8]| Reader::new(v).read_f64().expect("Failed to read f64");

        assert!(read(&[0, 0, 0, 0, 0, 0, 248, 127]).is_nan());
        assert_eq!(
            read(&[24, 45, 68, 84, 251, 33, 25, 64]),
            6.28318530717958623
        );
        assert_eq!(
            read(&[255, 255, 255, 255, 255, 255, 239, 127]),
            1.7976931348623157e+308
        );
        assert_eq!(read(&[125, 195, 148, 37, 173, 73, 178, 84]), 1.0e100);
        assert!(Reader::new(&[0; 7]).read_f64().is_err());
    }

    #[test]
    fn test_skip_past_end() {
        let bytes = [1, 2, 3];
        let mut reader = Reader::new(&bytes);
        reader.skip_to(10);
        assert!(reader.at_end());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(
            reader.read_byte(),
            Err(DecodeError::UnexpectedEof { offset: 10 })
        );
    }

    #[test]
    fn test_read_string() {
        let mut reader = Reader::new(b"\x03abcX");
        assert_eq!(reader.read_string(), Ok("abc".to_string()));
        assert_eq!(reader.pos(), 4);

        let mut reader = Reader::new(&[0x02, 0xc3, 0x28]);
        match reader.read_string() {
            Err(DecodeError::InvalidUtf8 { offset, .. }) => assert_eq!(offset, 1),
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }
}
