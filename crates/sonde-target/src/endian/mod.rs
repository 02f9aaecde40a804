mod layouts;
mod structure;

use std::sync::atomic::{AtomicU8, Ordering};

pub use self::layouts::{Elf32Auxv, Elf32ProgramHeader, Elf64Auxv, Elf64ProgramHeader, ElfIdent};
pub use self::structure::{FieldReader, Structure};

/// Byte order of the debugged target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    Little,

    /// Most significant byte first.
    Big,
}

impl Endianness {
    /// Reads the byte order from the identification header of an ELF image.
    pub fn from_elf(bytes: &[u8]) -> crate::Result<Self> {
        let header = goblin::elf::Elf::parse_header(bytes)?;

        Ok(match header.endianness()? {
            scroll::Endian::Little => Self::Little,
            scroll::Endian::Big => Self::Big,
        })
    }
}

impl From<Endianness> for scroll::Endian {
    fn from(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => scroll::Endian::Little,
            Endianness::Big => scroll::Endian::Big,
        }
    }
}

/// Byte order used when interpreting a sequence of typed fields into a
/// [Structure].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Fields are decoded as little-endian values.
    LittleEndian,

    /// Fields are decoded as big-endian values.
    BigEndian,
}

impl DecodeStrategy {
    /// Returns the strategy decoding fields with the given byte order.
    pub const fn for_endianness(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => Self::LittleEndian,
            Endianness::Big => Self::BigEndian,
        }
    }

    /// Returns the byte order of this strategy.
    pub const fn endianness(self) -> Endianness {
        match self {
            Self::LittleEndian => Endianness::Little,
            Self::BigEndian => Endianness::Big,
        }
    }

    /// Decodes a single structure from the start of `bytes`.
    pub fn decode<T: Structure>(self, bytes: &[u8]) -> crate::Result<T> {
        T::read_fields(&mut FieldReader::new(bytes, self))
    }

    /// Decodes consecutive structures from `bytes`.
    ///
    /// A trailing partial record is ignored.
    pub fn decode_all<T: Structure>(self, bytes: &[u8]) -> crate::Result<Vec<T>> {
        bytes
            .chunks_exact(T::SIZE)
            .map(|chunk| self.decode(chunk))
            .collect()
    }

    const fn tag(self) -> u8 {
        match self {
            Self::LittleEndian => 0,
            Self::BigEndian => 1,
        }
    }

    const fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Self::BigEndian,
            _ => Self::LittleEndian,
        }
    }
}

/// Holder of the active [DecodeStrategy].
///
/// Structures never capture a byte order. Every decode goes through this
/// holder and picks up the strategy active at that time.
///
/// The strategy is stored by value. Replacing it is a single store, so a
/// decode never observes a half-updated strategy.
#[derive(Debug)]
pub struct AdaptiveDecoder {
    current: AtomicU8,
}

impl AdaptiveDecoder {
    /// Creates a new decoder with the strategy matching the given byte order.
    pub const fn new(endianness: Endianness) -> Self {
        Self {
            current: AtomicU8::new(DecodeStrategy::for_endianness(endianness).tag()),
        }
    }

    /// Returns the active decode strategy.
    pub fn current_strategy(&self) -> DecodeStrategy {
        DecodeStrategy::from_tag(self.current.load(Ordering::Acquire))
    }

    /// Replaces the active strategy with the one matching `endianness`.
    pub fn on_target_changed(&self, endianness: Endianness) {
        let strategy = DecodeStrategy::for_endianness(endianness);
        let prev = DecodeStrategy::from_tag(self.current.swap(strategy.tag(), Ordering::AcqRel));

        if prev != strategy {
            tracing::debug!(?prev, new = ?strategy, "decode strategy replaced");
        }
    }

    /// Decodes a single structure with the active strategy.
    pub fn decode<T: Structure>(&self, bytes: &[u8]) -> crate::Result<T> {
        self.current_strategy().decode(bytes)
    }

    /// Decodes consecutive structures with the active strategy.
    pub fn decode_all<T: Structure>(&self, bytes: &[u8]) -> crate::Result<Vec<T>> {
        self.current_strategy().decode_all(bytes)
    }
}

impl Default for AdaptiveDecoder {
    fn default() -> Self {
        Self::new(Endianness::default())
    }
}
