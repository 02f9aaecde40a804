use std::path::{Path, PathBuf};

use crate::endian::Endianness;

/// Returns the architecture name used by QEMU for the given debugger
/// architecture name.
pub fn qemu_arch_name(arch: &str, endianness: Endianness) -> String {
    let arch = arch.trim().to_ascii_lowercase();

    let name = match arch.as_str() {
        "x86-64" | "x86_64" | "amd64" | "i386:x86-64" => "x86_64",
        "i386" | "i486" | "i586" | "i686" => "i386",
        a if a.starts_with("i386:") => "i386",
        "aarch64" | "arm64" => "aarch64",
        "mips" if endianness == Endianness::Little => "mipsel",
        "mips64" if endianness == Endianness::Little => "mips64el",
        "powerpc" | "powerpc:common" => "ppc",
        "powerpc64" | "powerpc:common64" => "ppc64",
        a if a.starts_with("arm") && endianness == Endianness::Big => "armeb",
        a if a.starts_with("arm") => "arm",
        _ => return arch,
    };

    name.to_owned()
}

/// Returns the sysroot directory of the given emulated architecture.
pub fn sysroot_path(base: &Path, arch: &str, endianness: Endianness) -> PathBuf {
    base.join(qemu_arch_name(arch, endianness))
}
