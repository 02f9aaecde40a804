use std::io::Write;
use std::path::{Path, PathBuf};

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use miette::IntoDiagnostic;

use sonde_host::{LocalFileSystem, ProcfsProcessTable};
use sonde_target::ElfTargetFacts;
use sonde_target::emulation::{ClassifierConfig, find_emulator_process, sysroot_path};
use sonde_target::endian::Endianness;
use sonde_target::host::{FileSystemProbe, TargetFacts};

use super::cli::CliEndian;

/// Runs the subcommand for finding the emulator process serving a
/// debugger's remote session.
pub fn evaluate_emulator_pid(
    mut output: impl Write,
    config: &ClassifierConfig,
    observer: Option<u32>,
    proc_root: PathBuf,
) -> miette::Result<()> {
    let mut table = ProcfsProcessTable::new().with_proc_root(proc_root);

    if let Some(observer) = observer {
        table = table.with_observer(observer);
    }

    let pid = find_emulator_process(&table, &config.emulator_process_prefix);

    let mut node = KdlNode::new("emulator");
    node.entries_mut()
        .push(KdlEntry::new_prop("observer", i128::from(table.observer())));
    node.entries_mut().push(KdlEntry::new_prop(
        "pid",
        pid.map_or(KdlValue::Null, |pid| i128::from(pid).into()),
    ));

    write_kdl(&mut output, node)
}

/// Runs the subcommand for computing the sysroot of an emulated target.
pub fn evaluate_sysroot(
    mut output: impl Write,
    config: &ClassifierConfig,
    arch: Option<String>,
    endian: Option<CliEndian>,
    elf: Option<&Path>,
) -> miette::Result<()> {
    let facts = if let Some(elf) = elf {
        let elf = std::fs::read(elf).into_diagnostic()?;
        ElfTargetFacts::from_elf(&elf).into_diagnostic()?
    } else {
        let Some(arch) = arch else {
            miette::bail!("Missing target architecture");
        };
        ElfTargetFacts::new(endian.map(Endianness::from).unwrap_or_default(), arch)
    };

    let node = sysroot_node(config, &facts, &LocalFileSystem);

    write_kdl(&mut output, node)
}

fn sysroot_node(
    config: &ClassifierConfig,
    facts: &impl TargetFacts,
    fs: &impl FileSystemProbe,
) -> KdlNode {
    let path = sysroot_path(
        &config.sysroot_base,
        &facts.current_arch_name(),
        facts.current_endianness(),
    );

    let mut node = KdlNode::new("sysroot");
    node.entries_mut()
        .push(KdlEntry::new(path.display().to_string()));
    node.entries_mut()
        .push(KdlEntry::new_prop("exists", fs.directory_exists(&path)));

    node
}

fn write_kdl(output: &mut impl Write, node: KdlNode) -> miette::Result<()> {
    let mut kdl = KdlDocument::new();
    kdl.nodes_mut().push(node);
    kdl.autoformat();

    output
        .write_all(kdl.to_string().as_bytes())
        .into_diagnostic()
}
