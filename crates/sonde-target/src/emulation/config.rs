use std::path::PathBuf;

/// Diagnostic request answered with `ENABLE=...` by QEMU's gdbstub.
pub const DEFAULT_EMULATOR_PROBE: &str = "maintenance packet Qqemu.sstepbits";

/// Marker found in the response to [DEFAULT_EMULATOR_PROBE].
pub const DEFAULT_EMULATOR_MARKER: &str = "ENABLE=";

/// Diagnostic request only answered with section offsets by user-mode stubs.
///
/// `QAttached:` would be the direct query, but it is missing from older
/// gdbstub revisions.
pub const DEFAULT_USER_MODE_PROBE: &str = "maintenance packet QOffsets";

/// Marker found in the response to [DEFAULT_USER_MODE_PROBE].
pub const DEFAULT_USER_MODE_MARKER: &str = "Text=";

/// Executable name prefix of emulator processes.
pub const DEFAULT_EMULATOR_PROCESS_PREFIX: &str = "qemu";

/// Directory holding one sysroot per emulated architecture.
pub const DEFAULT_SYSROOT_BASE: &str = "/etc/qemu-binfmt";

/// Configuration of the [EmulationClassifier](super::EmulationClassifier).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Diagnostic request detecting an emulator.
    pub emulator_probe: String,

    /// Marker substring identifying an emulator in the response.
    pub emulator_marker: String,

    /// Diagnostic request detecting user-mode emulation.
    pub user_mode_probe: String,

    /// Marker substring identifying user-mode emulation in the response.
    pub user_mode_marker: String,

    /// Executable name prefix of emulator processes.
    pub emulator_process_prefix: String,

    /// Directory holding the per-architecture sysroots.
    pub sysroot_base: PathBuf,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            emulator_probe: DEFAULT_EMULATOR_PROBE.to_owned(),
            emulator_marker: DEFAULT_EMULATOR_MARKER.to_owned(),
            user_mode_probe: DEFAULT_USER_MODE_PROBE.to_owned(),
            user_mode_marker: DEFAULT_USER_MODE_MARKER.to_owned(),
            emulator_process_prefix: DEFAULT_EMULATOR_PROCESS_PREFIX.to_owned(),
            sysroot_base: DEFAULT_SYSROOT_BASE.into(),
        }
    }
}
