use goblin::elf::header;

use crate::endian::Endianness;
use crate::host::TargetFacts;

/// Architecture facts read once from an ELF image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElfTargetFacts {
    endianness: Endianness,
    arch_name: String,
}

impl ElfTargetFacts {
    /// Creates facts for the given byte order and architecture name.
    pub fn new(endianness: Endianness, arch_name: impl Into<String>) -> Self {
        Self {
            endianness,
            arch_name: arch_name.into(),
        }
    }

    /// Reads the facts from the header of an ELF image.
    pub fn from_elf(bytes: &[u8]) -> crate::Result<Self> {
        let elf_header = goblin::elf::Elf::parse_header(bytes)?;

        let endianness = Endianness::from_elf(bytes)?;
        let is_64bit = elf_header.e_ident[header::EI_CLASS] == header::ELFCLASS64;

        let arch_name = match elf_header.e_machine {
            header::EM_X86_64 => "x86_64".to_owned(),
            header::EM_386 => "i386".to_owned(),
            header::EM_AARCH64 => "aarch64".to_owned(),
            header::EM_ARM => "arm".to_owned(),
            header::EM_MIPS if is_64bit => "mips64".to_owned(),
            header::EM_MIPS => "mips".to_owned(),
            header::EM_PPC => "powerpc".to_owned(),
            header::EM_PPC64 => "powerpc64".to_owned(),
            header::EM_RISCV if is_64bit => "riscv64".to_owned(),
            header::EM_RISCV => "riscv32".to_owned(),
            header::EM_SPARCV9 => "sparc64".to_owned(),
            header::EM_SPARC => "sparc".to_owned(),
            machine => header::machine_to_str(machine)
                .trim_start_matches("EM_")
                .to_ascii_lowercase(),
        };

        tracing::debug!(?endianness, arch = %arch_name, "elf target facts");

        Ok(Self {
            endianness,
            arch_name,
        })
    }
}

impl TargetFacts for ElfTargetFacts {
    fn current_endianness(&self) -> Endianness {
        self.endianness
    }

    fn current_arch_name(&self) -> String {
        self.arch_name.clone()
    }
}
