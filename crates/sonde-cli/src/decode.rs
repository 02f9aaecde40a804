use std::io::Write;
use std::path::Path;

use goblin::elf::program_header::pt_to_str;
use kdl::{KdlDocument, KdlEntry, KdlNode};
use miette::IntoDiagnostic;

use sonde_target::ElfTargetFacts;
use sonde_target::endian::{AdaptiveDecoder, Elf32Auxv, Elf32ProgramHeader, Elf64Auxv};
use sonde_target::endian::{Elf64ProgramHeader, ElfIdent, Endianness};
use sonde_target::host::TargetFacts;

use super::cli::{CliBits, CliEndian, CliLayout};

/// Runs the subcommand for decoding structures from a binary blob.
pub fn evaluate_decode(
    mut output: impl Write,
    layout: CliLayout,
    endian: Option<CliEndian>,
    elf: Option<&Path>,
    bits: Option<CliBits>,
    blob: &Path,
) -> miette::Result<()> {
    let decoder = AdaptiveDecoder::default();

    let is_64bit = if let Some(elf) = elf {
        let elf = std::fs::read(elf).into_diagnostic()?;

        let facts = ElfTargetFacts::from_elf(&elf).into_diagnostic()?;
        decoder.on_target_changed(facts.current_endianness());

        let ident: ElfIdent = decoder.decode(&elf).into_diagnostic()?;
        ident.is_64bit()
    } else {
        decoder.on_target_changed(endian.map(Endianness::from).unwrap_or_default());
        bits != Some(CliBits::B32)
    };

    let blob = std::fs::read(blob).into_diagnostic()?;

    let mut kdl = decode_to_kdl(&decoder, layout, is_64bit, &blob)?;
    kdl.autoformat();

    output
        .write_all(kdl.to_string().as_bytes())
        .into_diagnostic()?;

    Ok(())
}

/// Decodes `blob` with the decoder's active strategy.
pub fn decode_to_kdl(
    decoder: &AdaptiveDecoder,
    layout: CliLayout,
    is_64bit: bool,
    blob: &[u8],
) -> miette::Result<KdlDocument> {
    let mut kdl = KdlDocument::new();

    match layout {
        CliLayout::Auxv => {
            let entries: Vec<Elf64Auxv> = if is_64bit {
                decoder.decode_all(blob).into_diagnostic()?
            } else {
                decoder
                    .decode_all::<Elf32Auxv>(blob)
                    .into_diagnostic()?
                    .into_iter()
                    .map(Into::into)
                    .collect()
            };

            for entry in entries {
                let mut node = KdlNode::new("auxv");
                node.entries_mut()
                    .push(KdlEntry::new(auxv_type_name(entry.a_type)));
                node.entries_mut()
                    .push(KdlEntry::new_prop("value", format!("{:#x}", entry.a_val)));
                kdl.nodes_mut().push(node);

                if entry.a_type == AT_NULL {
                    break;
                }
            }
        }
        CliLayout::Ident => {
            let ident: ElfIdent = decoder.decode(blob).into_diagnostic()?;

            miette::ensure!(ident.has_valid_magic(), "Bad ELF magic: {:x?}", ident.magic);

            let mut node = KdlNode::new("ident");
            node.entries_mut().push(KdlEntry::new_prop(
                "class",
                if ident.is_64bit() { "elf64" } else { "elf32" },
            ));
            node.entries_mut().push(KdlEntry::new_prop(
                "data",
                match ident.endianness() {
                    Some(Endianness::Little) => "little".to_owned(),
                    Some(Endianness::Big) => "big".to_owned(),
                    None => format!("{:#x}", ident.data),
                },
            ));
            node.entries_mut()
                .push(KdlEntry::new_prop("os_abi", i128::from(ident.os_abi)));
            kdl.nodes_mut().push(node);
        }
        CliLayout::Phdr => {
            let phdrs: Vec<Elf64ProgramHeader> = if is_64bit {
                decoder.decode_all(blob).into_diagnostic()?
            } else {
                decoder
                    .decode_all::<Elf32ProgramHeader>(blob)
                    .into_diagnostic()?
                    .into_iter()
                    .map(Into::into)
                    .collect()
            };

            for phdr in phdrs {
                let mut node = KdlNode::new("phdr");
                node.entries_mut().push(KdlEntry::new(pt_to_str(phdr.p_type)));
                node.entries_mut()
                    .push(KdlEntry::new_prop("vaddr", format!("{:#x}", phdr.p_vaddr)));
                node.entries_mut()
                    .push(KdlEntry::new_prop("memsz", format!("{:#x}", phdr.p_memsz)));
                node.entries_mut()
                    .push(KdlEntry::new_prop("flags", phdr_flags(phdr.p_flags)));
                kdl.nodes_mut().push(node);
            }
        }
    }

    Ok(kdl)
}

const AT_NULL: u64 = 0;

fn auxv_type_name(a_type: u64) -> String {
    let name = match a_type {
        AT_NULL => "AT_NULL",
        3 => "AT_PHDR",
        4 => "AT_PHENT",
        5 => "AT_PHNUM",
        6 => "AT_PAGESZ",
        7 => "AT_BASE",
        8 => "AT_FLAGS",
        9 => "AT_ENTRY",
        11 => "AT_UID",
        12 => "AT_EUID",
        13 => "AT_GID",
        14 => "AT_EGID",
        15 => "AT_PLATFORM",
        16 => "AT_HWCAP",
        17 => "AT_CLKTCK",
        23 => "AT_SECURE",
        25 => "AT_RANDOM",
        26 => "AT_HWCAP2",
        31 => "AT_EXECFN",
        32 => "AT_SYSINFO",
        33 => "AT_SYSINFO_EHDR",
        other => return format!("AT_{other}"),
    };

    name.to_owned()
}

fn phdr_flags(p_flags: u32) -> String {
    use goblin::elf::program_header::{PF_R, PF_W, PF_X};

    [(PF_R, 'r'), (PF_W, 'w'), (PF_X, 'x')]
        .into_iter()
        .map(|(flag, c)| if p_flags & flag != 0 { c } else { '-' })
        .collect()
}
