mod cache;
mod config;
mod search;
mod sysroot;

use std::path::PathBuf;

pub use self::cache::{CacheScope, ClassificationCache, QueryKind};
pub use self::config::{
    ClassifierConfig, DEFAULT_EMULATOR_MARKER, DEFAULT_EMULATOR_PROBE,
    DEFAULT_EMULATOR_PROCESS_PREFIX, DEFAULT_SYSROOT_BASE, DEFAULT_USER_MODE_MARKER,
    DEFAULT_USER_MODE_PROBE,
};
pub use self::search::find_emulator_process;
pub use self::sysroot::{qemu_arch_name, sysroot_path};
use crate::host::{ConfigSink, FileSystemProbe, ProcessTable, RemoteSession, TargetFacts};

/// Layer at which the target is emulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmulationLayer {
    /// A single process is emulated (e.g., `qemu-user`).
    UserMode,

    /// A whole machine is emulated (e.g., `qemu-system`).
    KernelMode,
}

/// Result of classifying the execution environment of the target.
///
/// The layer is only set for emulated targets, and the process ID only for
/// user-mode emulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmulationClassification {
    emulation_layer: Option<EmulationLayer>,
    emulated_process_id: Option<u32>,
}

impl EmulationClassification {
    /// Target running natively.
    pub const fn native() -> Self {
        Self {
            emulation_layer: None,
            emulated_process_id: None,
        }
    }

    /// Target running under whole-system emulation.
    pub const fn kernel_mode() -> Self {
        Self {
            emulation_layer: Some(EmulationLayer::KernelMode),
            emulated_process_id: None,
        }
    }

    /// Target running under user-mode emulation, served by the given
    /// emulator process (if found).
    pub const fn user_mode(emulated_process_id: Option<u32>) -> Self {
        Self {
            emulation_layer: Some(EmulationLayer::UserMode),
            emulated_process_id,
        }
    }

    /// Whether the target runs under an emulator.
    pub const fn is_emulated(&self) -> bool {
        self.emulation_layer.is_some()
    }

    /// Layer at which the target is emulated.
    pub const fn emulation_layer(&self) -> Option<EmulationLayer> {
        self.emulation_layer
    }

    /// ID of the emulator process (user-mode emulation only).
    pub const fn emulated_process_id(&self) -> Option<u32> {
        self.emulated_process_id
    }
}

/// Classifier detecting whether the remote target runs under an emulator.
///
/// There is no direct "am I emulated" query in the remote protocol, so the
/// classifier relies on emulator-specific diagnostic requests and scans
/// their responses for known markers.
///
/// # Note
///
/// Every query degrades to a negative answer on failure. None of them
/// returns an error.
pub struct EmulationClassifier {
    config: ClassifierConfig,
    cache: ClassificationCache,
}

impl EmulationClassifier {
    /// Creates a new classifier with the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            cache: ClassificationCache::new(),
        }
    }

    /// Configuration of this classifier.
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Cached answers of this classifier.
    pub const fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    /// Mutable access to the cached answers of this classifier.
    pub fn cache_mut(&mut self) -> &mut ClassificationCache {
        &mut self.cache
    }

    /// Returns whether the debugger is attached to a remote target.
    pub fn is_remote_target<H: RemoteSession + ?Sized>(&self, host: &H) -> bool {
        host.is_remote()
    }

    /// Returns whether the remote target runs under an emulator.
    pub fn is_emulator<H: RemoteSession + ?Sized>(&mut self, host: &mut H) -> bool {
        if let Some(cached) = self.cache.stop.emulator {
            return cached;
        }

        let res = probe(
            host,
            &self.config.emulator_probe,
            &self.config.emulator_marker,
        );

        self.cache.stop.emulator = Some(res);
        res
    }

    /// Returns whether the remote stub emulates a single process.
    ///
    /// # Note
    ///
    /// This is a heuristic, which doesn't check whether the stub is an
    /// emulator in the first place.
    pub fn is_user_mode_emulation<H: RemoteSession + ?Sized>(&mut self, host: &mut H) -> bool {
        if let Some(cached) = self.cache.stop.user_mode_emulation {
            return cached;
        }

        let res = probe(
            host,
            &self.config.user_mode_probe,
            &self.config.user_mode_marker,
        );

        self.cache.stop.user_mode_emulation = Some(res);
        res
    }

    /// Returns whether the remote target runs under a user-mode emulator.
    pub fn is_user_mode_emulator<H: RemoteSession + ?Sized>(&mut self, host: &mut H) -> bool {
        self.is_emulator(host) && self.is_user_mode_emulation(host)
    }

    /// Returns whether the remote target runs under a kernel-mode emulator.
    pub fn is_kernel_mode_emulator<H: RemoteSession + ?Sized>(&mut self, host: &mut H) -> bool {
        self.is_emulator(host) && !self.is_user_mode_emulation(host)
    }

    /// Returns the ID of the emulator process serving the remote session.
    ///
    /// Only user-mode emulation has such a process. The search result is
    /// kept until a new target is loaded.
    pub fn emulated_process_id<H>(&mut self, host: &mut H) -> Option<u32>
    where
        H: RemoteSession + ProcessTable + ?Sized,
    {
        if !self.is_user_mode_emulator(host) {
            return None;
        }

        if let Some(cached) = self.cache.session.emulated_process_id {
            return cached;
        }

        let pid = find_emulator_process(&*host, &self.config.emulator_process_prefix);

        self.cache.session.emulated_process_id = Some(pid);
        pid
    }

    /// Points the debugger's symbol search root at the sysroot of the
    /// emulated architecture, and returns it.
    ///
    /// # Note
    ///
    /// Unlike other queries, this one updates the debugger's configuration
    /// whenever the sysroot exists.
    pub fn sysroot_override<H>(&mut self, host: &mut H) -> Option<PathBuf>
    where
        H: TargetFacts + RemoteSession + FileSystemProbe + ConfigSink + ?Sized,
    {
        if let Some(cached) = self.cache.stop.sysroot.as_ref() {
            return cached.clone();
        }

        let sysroot = self.apply_sysroot(host);

        self.cache.stop.sysroot = Some(sysroot.clone());
        sysroot
    }

    /// Classifies the execution environment of the target.
    pub fn classify<H>(&mut self, host: &mut H) -> EmulationClassification
    where
        H: RemoteSession + ProcessTable + ?Sized,
    {
        if !self.is_emulator(host) {
            EmulationClassification::native()
        } else if self.is_user_mode_emulation(host) {
            EmulationClassification::user_mode(self.emulated_process_id(host))
        } else {
            EmulationClassification::kernel_mode()
        }
    }

    fn apply_sysroot<H>(&mut self, host: &mut H) -> Option<PathBuf>
    where
        H: TargetFacts + RemoteSession + FileSystemProbe + ConfigSink + ?Sized,
    {
        if !self.is_user_mode_emulator(host) {
            return None;
        }

        let path = sysroot_path(
            &self.config.sysroot_base,
            &host.current_arch_name(),
            host.current_endianness(),
        );

        if !host.directory_exists(&path) {
            tracing::debug!(path = %path.display(), "sysroot not found");
            return None;
        }

        tracing::debug!(path = %path.display(), "set sysroot");
        host.set_symbol_search_root(&path);

        Some(path)
    }
}

impl Default for EmulationClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Sends a diagnostic request and looks for `marker` in the response.
fn probe<H: RemoteSession + ?Sized>(host: &mut H, request: &str, marker: &str) -> bool {
    if !host.is_remote() {
        return false;
    }

    match host.send_diagnostic_request(request) {
        Ok(response) => {
            let found = response.contains(marker);
            tracing::trace!(request, marker, found, "diagnostic probe");
            found
        }
        Err(e) => {
            tracing::debug!(request, error = %e, "diagnostic request failed");
            false
        }
    }
}
