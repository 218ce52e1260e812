//! Parcel wire format
//!
//! Values are little-endian and every value occupies a multiple of four bytes.
//! Strings are written as UTF-16: an `i32` count of code units (`-1` for a null
//! string), the code units, a zero terminator, then zero padding up to the next
//! four-byte boundary.

use thiserror::Error;

const WORD: usize = 4;
const NULL_STRING_LEN: i32 = -1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParcelError {
    #[error("unexpected end of parcel at offset {offset}: needed {needed} byte(s), {remaining} left")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("negative request count {0}")]
    NegativeCount(i32),

    #[error("invalid string length {length} at offset {offset}")]
    InvalidStringLength { offset: usize, length: i32 },

    #[error("null string at offset {offset} where a package name was expected")]
    NullString { offset: usize },

    #[error("string at offset {offset} is not terminated")]
    MissingTerminator { offset: usize },

    #[error("string at offset {offset} has non-zero padding")]
    NonZeroPadding { offset: usize },

    #[error("string at offset {offset} is not valid UTF-16")]
    InvalidUtf16 { offset: usize },

    #[error("empty package name in request {index}")]
    EmptyPackageName { index: usize },

    #[error("{0} trailing byte(s) after the transaction")]
    TrailingBytes(usize),

    #[error("{what} does not fit in a 32-bit length ({len})")]
    TooLarge { what: &'static str, len: usize },
}

/// Append-only parcel encoder
#[derive(Debug, Default, Clone)]
pub struct ParcelWriter {
    buf: Vec<u8>,
}

impl ParcelWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a little-endian `i32`
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a non-null string
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError::TooLarge`] if the string has more UTF-16 code units than an
    /// `i32` can count.
    pub fn write_string(&mut self, value: &str) -> Result<(), ParcelError> {
        let units: Vec<u16> = value.encode_utf16().collect();
        let len = i32::try_from(units.len()).map_err(|_| ParcelError::TooLarge {
            what: "string",
            len: units.len(),
        })?;

        self.write_i32(len);
        for unit in units.iter().chain(std::iter::once(&0u16)) {
            self.buf.extend_from_slice(&unit.to_le_bytes());
        }
        self.pad();

        Ok(())
    }

    fn pad(&mut self) {
        let padded = self.buf.len().next_multiple_of(WORD);
        self.buf.resize(padded, 0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the encoded bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded parcel
#[derive(Debug, Clone)]
pub struct ParcelReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ParcelReader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], ParcelError> {
        if needed > self.remaining() {
            return Err(ParcelError::UnexpectedEof {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, ParcelError> {
        let bytes = self.take(WORD)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a string that may be null
    pub fn read_nullable_string(&mut self) -> Result<Option<String>, ParcelError> {
        let offset = self.pos;
        let len = self.read_i32()?;
        if len == NULL_STRING_LEN {
            return Ok(None);
        }
        let units = usize::try_from(len)
            .map_err(|_| ParcelError::InvalidStringLength { offset, length: len })?;

        // code units plus the terminator, padded to a word
        let byte_len = (units + 1)
            .checked_mul(2)
            .ok_or(ParcelError::InvalidStringLength { offset, length: len })?;
        let bytes = self.take(byte_len.next_multiple_of(WORD))?;

        let (text, padding) = bytes.split_at(byte_len);
        let mut decoded: Vec<u16> = text
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        if decoded.pop() != Some(0) {
            return Err(ParcelError::MissingTerminator { offset });
        }
        // anything else could not be re-encoded byte for byte
        if padding.iter().any(|&b| b != 0) {
            return Err(ParcelError::NonZeroPadding { offset });
        }

        String::from_utf16(&decoded)
            .map(Some)
            .map_err(|_| ParcelError::InvalidUtf16 { offset })
    }

    /// Read a string that must not be null
    pub fn read_string(&mut self) -> Result<String, ParcelError> {
        let offset = self.pos;
        self.read_nullable_string()?
            .ok_or(ParcelError::NullString { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_is_little_endian() {
        let mut writer = ParcelWriter::new();
        writer.write_i32(0x0102_0304);
        writer.write_i32(-1);

        assert_eq!(
            writer.into_bytes(),
            vec![0x04, 0x03, 0x02, 0x01, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_string_layout_is_padded_with_terminator() {
        let mut writer = ParcelWriter::new();
        writer.write_string("ab").unwrap();

        // length, 'a', 'b', terminator, padding
        assert_eq!(
            writer.into_bytes(),
            vec![2, 0, 0, 0, b'a', 0, b'b', 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_string_with_odd_length_needs_no_padding() {
        let mut writer = ParcelWriter::new();
        writer.write_string("abc").unwrap();

        assert_eq!(writer.len(), 4 + 8);
    }

    #[test]
    fn test_read_back_non_ascii_string() {
        let mut writer = ParcelWriter::new();
        writer.write_string("com.例え.🎨").unwrap();
        let bytes = writer.into_bytes();

        let mut reader = ParcelReader::new(&bytes);
        assert_eq!(reader.read_string().unwrap(), "com.例え.🎨");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_null_string() {
        let bytes = NULL_STRING_LEN.to_le_bytes();

        assert_eq!(ParcelReader::new(&bytes).read_nullable_string(), Ok(None));
        assert_eq!(
            ParcelReader::new(&bytes).read_string(),
            Err(ParcelError::NullString { offset: 0 })
        );
    }

    #[test]
    fn test_truncated_string_is_rejected() {
        let bytes = [5, 0, 0, 0, b'a', 0];
        let result = ParcelReader::new(&bytes).read_string();

        assert!(matches!(result, Err(ParcelError::UnexpectedEof { offset: 4, .. })));
    }

    #[test]
    fn test_missing_terminator_is_rejected() {
        let bytes = [1, 0, 0, 0, b'a', 0, b'b', 0];
        let result = ParcelReader::new(&bytes).read_string();

        assert_eq!(result, Err(ParcelError::MissingTerminator { offset: 0 }));
    }

    #[test]
    fn test_non_zero_padding_is_rejected() {
        let bytes = [2, 0, 0, 0, b'a', 0, b'b', 0, 0, 0, 0xff, 0xff];
        let result = ParcelReader::new(&bytes).read_string();

        assert_eq!(result, Err(ParcelError::NonZeroPadding { offset: 0 }));
    }

    #[test]
    fn test_negative_string_length_is_rejected() {
        let bytes = (-7i32).to_le_bytes();
        let result = ParcelReader::new(&bytes).read_string();

        assert_eq!(
            result,
            Err(ParcelError::InvalidStringLength {
                offset: 0,
                length: -7
            })
        );
    }

    #[test]
    fn test_unpaired_surrogate_is_rejected() {
        let bytes = [1, 0, 0, 0, 0x00, 0xd8, 0, 0];
        let result = ParcelReader::new(&bytes).read_string();

        assert_eq!(result, Err(ParcelError::InvalidUtf16 { offset: 0 }));
    }
}
