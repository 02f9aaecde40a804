use std::path::PathBuf;

/// Lifetime of a cached classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Cleared every time the target resumes execution.
    PerStop,

    /// Cleared when a new target is loaded.
    PerSession,
}

/// Classification query answered by the
/// [EmulationClassifier](super::EmulationClassifier).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Whether the target runs under an emulator.
    Emulator,

    /// Whether the remote stub emulates a single process.
    UserModeEmulation,

    /// Whether the target runs under a user-mode emulator.
    UserModeEmulator,

    /// Whether the target runs under a kernel-mode emulator.
    KernelModeEmulator,

    /// ID of the emulator process serving the remote session.
    EmulatedProcessId,

    /// Sysroot applied for user-mode emulation.
    SysrootOverride,
}

impl QueryKind {
    /// Lifetime of the answers to this query.
    pub const fn scope(self) -> CacheScope {
        match self {
            Self::EmulatedProcessId => CacheScope::PerSession,
            _ => CacheScope::PerStop,
        }
    }

    /// Whether the answer to this query is stored, or always derived from
    /// other stored answers.
    pub const fn is_stored(self) -> bool {
        !matches!(self, Self::UserModeEmulator | Self::KernelModeEmulator)
    }
}

#[derive(Default)]
pub(super) struct StopEntries {
    pub emulator: Option<bool>,
    pub user_mode_emulation: Option<bool>,
    pub sysroot: Option<Option<PathBuf>>,
}

#[derive(Default)]
pub(super) struct SessionEntries {
    pub emulated_process_id: Option<Option<u32>>,
}

/// Memoized answers of the classification queries.
#[derive(Default)]
pub struct ClassificationCache {
    pub(super) stop: StopEntries,
    pub(super) session: SessionEntries,
}

impl ClassificationCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the entries with the given scope.
    pub fn invalidate(&mut self, scope: CacheScope) {
        tracing::trace!(?scope, "invalidate classification cache");

        match scope {
            CacheScope::PerStop => self.stop = StopEntries::default(),
            CacheScope::PerSession => self.session = SessionEntries::default(),
        }
    }

    /// Returns whether an answer to the given query is currently stored.
    pub fn is_cached(&self, kind: QueryKind) -> bool {
        match kind {
            QueryKind::Emulator => self.stop.emulator.is_some(),
            QueryKind::UserModeEmulation => self.stop.user_mode_emulation.is_some(),
            QueryKind::SysrootOverride => self.stop.sysroot.is_some(),
            QueryKind::EmulatedProcessId => self.session.emulated_process_id.is_some(),
            QueryKind::UserModeEmulator | QueryKind::KernelModeEmulator => {
                self.stop.emulator.is_some() && self.stop.user_mode_emulation.is_some()
            }
        }
    }
}
