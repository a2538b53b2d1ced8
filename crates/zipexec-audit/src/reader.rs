//! Little-endian cursor over a byte slice.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A cursor that reads little-endian values and packed structs from a slice
/// without copying the underlying buffer.
#[derive(Debug, Clone)]
pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count);
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read a packed struct using zerocopy.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read a u32 and fail unless it equals `expected`.
    pub fn expect_signature(&mut self, expected: u32) -> Result<()> {
        let actual = self.read_u32()?;
        if actual != expected {
            return Err(Error::InvalidSignature { expected, actual });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01u8, 0x02, // u16: 0x0201
            0x01, 0x02, 0x03, 0x04, // u32: 0x04030201
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, // u64: 0xFFFFFFFF
        ];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u16().unwrap(), 0x0201);
        assert_eq!(cursor.read_u32().unwrap(), 0x04030201);
        assert_eq!(cursor.read_u64().unwrap(), 0xFFFF_FFFF);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut cursor = ByteCursor::new(&data);

        match cursor.read_u32() {
            Err(Error::UnexpectedEof { needed, available }) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected EOF, got {:?}", other),
        }
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_signature_mismatch() {
        let data = 0x0403_4b50u32.to_le_bytes();
        let mut cursor = ByteCursor::new(&data);

        assert!(matches!(
            cursor.expect_signature(0x0201_4b50),
            Err(Error::InvalidSignature { expected: 0x0201_4b50, actual: 0x0403_4b50 })
        ));
    }
}
