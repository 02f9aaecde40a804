use scroll::Pread;
use scroll::ctx::TryFromCtx;

use super::DecodeStrategy;

/// Trait implemented by records decoded from target memory.
///
/// Implementors only describe their field sequence. The byte order is
/// supplied by the [FieldReader] at decode time.
pub trait Structure: Sized {
    /// Size in bytes of an encoded record.
    const SIZE: usize;

    /// Reads the fields of the record, in declaration order.
    fn read_fields(reader: &mut FieldReader<'_>) -> crate::Result<Self>;
}

/// Cursor reading typed fields with a fixed [DecodeStrategy].
pub struct FieldReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    strategy: DecodeStrategy,
}

impl<'a> FieldReader<'a> {
    /// Creates a new reader over `bytes`, starting at offset 0.
    pub const fn new(bytes: &'a [u8], strategy: DecodeStrategy) -> Self {
        Self {
            bytes,
            offset: 0,
            strategy,
        }
    }

    /// Strategy used by this reader.
    pub const fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }

    /// Current offset of the reader.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Reads the next integer field.
    pub fn read<T>(&mut self) -> crate::Result<T>
    where
        T: TryFromCtx<'a, scroll::Endian, Error = scroll::Error>,
    {
        let endian: scroll::Endian = self.strategy.endianness().into();
        let bytes = self.bytes;

        bytes
            .gread_with::<T>(&mut self.offset, endian)
            .map_err(Into::into)
    }

    /// Reads the next `N` raw bytes, which are not subject to byte order.
    pub fn read_bytes<const N: usize>(&mut self) -> crate::Result<[u8; N]> {
        let remaining = self.bytes.len().saturating_sub(self.offset);

        let buf = self
            .bytes
            .get(self.offset..)
            .and_then(|rest| rest.get(..N))
            .and_then(|raw| <[u8; N]>::try_from(raw).ok())
            .ok_or(scroll::Error::TooBig {
                size: N,
                len: remaining,
            })?;

        self.offset += N;

        Ok(buf)
    }

    /// Reads a target word, whose size depends on the target's class.
    pub fn read_word(&mut self, is_64bit: bool) -> crate::Result<u64> {
        if is_64bit {
            self.read::<u64>()
        } else {
            self.read::<u32>().map(u64::from)
        }
    }
}
