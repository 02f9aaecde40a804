use goblin::elf::header::{ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB, ELFMAG};

use super::{Endianness, FieldReader, Structure};

/// ELF identification bytes (`e_ident`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElfIdent {
    /// Magic bytes (`\x7fELF`).
    pub magic: [u8; 4],

    /// Word size class (`EI_CLASS`).
    pub class: u8,

    /// Data encoding (`EI_DATA`).
    pub data: u8,

    /// ELF version (`EI_VERSION`).
    pub version: u8,

    /// Target OS ABI (`EI_OSABI`).
    pub os_abi: u8,

    /// ABI version (`EI_ABIVERSION`).
    pub abi_version: u8,
}

impl ElfIdent {
    /// Returns whether the magic bytes are valid.
    pub fn has_valid_magic(&self) -> bool {
        &self.magic == ELFMAG
    }

    /// Returns whether the image uses 64-bit words.
    pub const fn is_64bit(&self) -> bool {
        self.class == ELFCLASS64
    }

    /// Byte order of the image, if known.
    pub const fn endianness(&self) -> Option<Endianness> {
        match self.data {
            ELFDATA2LSB => Some(Endianness::Little),
            ELFDATA2MSB => Some(Endianness::Big),
            _ => None,
        }
    }
}

impl Structure for ElfIdent {
    const SIZE: usize = 16;

    fn read_fields(reader: &mut FieldReader<'_>) -> crate::Result<Self> {
        let ident = Self {
            magic: reader.read_bytes()?,
            class: reader.read()?,
            data: reader.read()?,
            version: reader.read()?,
            os_abi: reader.read()?,
            abi_version: reader.read()?,
        };

        // padding
        reader.read_bytes::<7>()?;

        Ok(ident)
    }
}

/// Auxiliary vector entry of a 32-bit target (`Elf32_auxv_t`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elf32Auxv {
    /// Entry type (`AT_*`).
    pub a_type: u32,

    /// Entry value.
    pub a_val: u32,
}

impl Structure for Elf32Auxv {
    const SIZE: usize = 8;

    fn read_fields(reader: &mut FieldReader<'_>) -> crate::Result<Self> {
        Ok(Self {
            a_type: reader.read()?,
            a_val: reader.read()?,
        })
    }
}

/// Auxiliary vector entry of a 64-bit target (`Elf64_auxv_t`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elf64Auxv {
    /// Entry type (`AT_*`).
    pub a_type: u64,

    /// Entry value.
    pub a_val: u64,
}

impl Structure for Elf64Auxv {
    const SIZE: usize = 16;

    fn read_fields(reader: &mut FieldReader<'_>) -> crate::Result<Self> {
        Ok(Self {
            a_type: reader.read()?,
            a_val: reader.read()?,
        })
    }
}

impl From<Elf32Auxv> for Elf64Auxv {
    fn from(entry: Elf32Auxv) -> Self {
        Self {
            a_type: entry.a_type.into(),
            a_val: entry.a_val.into(),
        }
    }
}

/// Program header of a 32-bit ELF image (`Elf32_Phdr`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elf32ProgramHeader {
    /// Segment type (`PT_*`).
    pub p_type: u32,

    /// Offset of the segment in the file.
    pub p_offset: u32,

    /// Virtual address of the segment.
    pub p_vaddr: u32,

    /// Physical address of the segment.
    pub p_paddr: u32,

    /// Size of the segment in the file.
    pub p_filesz: u32,

    /// Size of the segment in memory.
    pub p_memsz: u32,

    /// Segment flags (`PF_*`).
    pub p_flags: u32,

    /// Segment alignment.
    pub p_align: u32,
}

impl Structure for Elf32ProgramHeader {
    const SIZE: usize = 32;

    fn read_fields(reader: &mut FieldReader<'_>) -> crate::Result<Self> {
        Ok(Self {
            p_type: reader.read()?,
            p_offset: reader.read()?,
            p_vaddr: reader.read()?,
            p_paddr: reader.read()?,
            p_filesz: reader.read()?,
            p_memsz: reader.read()?,
            p_flags: reader.read()?,
            p_align: reader.read()?,
        })
    }
}

/// Program header of a 64-bit ELF image (`Elf64_Phdr`).
///
/// Unlike the 32-bit layout, `p_flags` comes right after `p_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elf64ProgramHeader {
    /// Segment type (`PT_*`).
    pub p_type: u32,

    /// Segment flags (`PF_*`).
    pub p_flags: u32,

    /// Offset of the segment in the file.
    pub p_offset: u64,

    /// Virtual address of the segment.
    pub p_vaddr: u64,

    /// Physical address of the segment.
    pub p_paddr: u64,

    /// Size of the segment in the file.
    pub p_filesz: u64,

    /// Size of the segment in memory.
    pub p_memsz: u64,

    /// Segment alignment.
    pub p_align: u64,
}

impl Structure for Elf64ProgramHeader {
    const SIZE: usize = 56;

    fn read_fields(reader: &mut FieldReader<'_>) -> crate::Result<Self> {
        Ok(Self {
            p_type: reader.read()?,
            p_flags: reader.read()?,
            p_offset: reader.read()?,
            p_vaddr: reader.read()?,
            p_paddr: reader.read()?,
            p_filesz: reader.read()?,
            p_memsz: reader.read()?,
            p_align: reader.read()?,
        })
    }
}

impl From<Elf32ProgramHeader> for Elf64ProgramHeader {
    fn from(phdr: Elf32ProgramHeader) -> Self {
        Self {
            p_type: phdr.p_type,
            p_flags: phdr.p_flags,
            p_offset: phdr.p_offset.into(),
            p_vaddr: phdr.p_vaddr.into(),
            p_paddr: phdr.p_paddr.into(),
            p_filesz: phdr.p_filesz.into(),
            p_memsz: phdr.p_memsz.into(),
            p_align: phdr.p_align.into(),
        }
    }
}
