use std::path::PathBuf;

use crate::emulation::{
    CacheScope, ClassifierConfig, EmulationClassification, EmulationClassifier,
};
use crate::endian::{AdaptiveDecoder, DecodeStrategy, Structure};
use crate::events::{LifecycleEvent, LifecycleListener};
use crate::host::{Host, TargetFacts};

/// Introspection context of a debugging session.
///
/// It owns the host collaborators, the classification cache and the active
/// decode strategy. Subscribe it to the debugger's lifecycle events (see
/// [LifecycleListener]) to keep the cached answers and the strategy
/// up-to-date.
pub struct Introspector<H> {
    /// Debugger collaborators.
    host: H,

    /// Emulation classifier, along with its cached answers.
    classifier: EmulationClassifier,

    /// Endianness-adaptive structure decoder.
    decoder: AdaptiveDecoder,
}

impl<H: TargetFacts> Introspector<H> {
    /// Creates a new introspection context with the default classifier
    /// configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, ClassifierConfig::default())
    }

    /// Creates a new introspection context with the given classifier
    /// configuration.
    pub fn with_config(host: H, config: ClassifierConfig) -> Self {
        let decoder = AdaptiveDecoder::new(host.current_endianness());

        Self {
            host,
            classifier: EmulationClassifier::new(config),
            decoder,
        }
    }
}

impl<H> Introspector<H> {
    /// Debugger collaborators.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the debugger collaborators.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Emulation classifier.
    pub const fn classifier(&self) -> &EmulationClassifier {
        &self.classifier
    }

    /// Structure decoder.
    pub const fn decoder(&self) -> &AdaptiveDecoder {
        &self.decoder
    }

    /// Consumes the context and returns the debugger collaborators.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Returns the active decode strategy.
    pub fn current_strategy(&self) -> DecodeStrategy {
        self.decoder.current_strategy()
    }

    /// Decodes a single structure with the active strategy.
    pub fn decode<T: Structure>(&self, bytes: &[u8]) -> crate::Result<T> {
        self.decoder.decode(bytes)
    }

    /// Decodes consecutive structures with the active strategy.
    pub fn decode_all<T: Structure>(&self, bytes: &[u8]) -> crate::Result<Vec<T>> {
        self.decoder.decode_all(bytes)
    }
}

impl<H: Host> Introspector<H> {
    /// See [EmulationClassifier::is_remote_target].
    pub fn is_remote_target(&self) -> bool {
        self.classifier.is_remote_target(&self.host)
    }

    /// See [EmulationClassifier::is_emulator].
    pub fn is_emulator(&mut self) -> bool {
        self.classifier.is_emulator(&mut self.host)
    }

    /// See [EmulationClassifier::is_user_mode_emulation].
    pub fn is_user_mode_emulation(&mut self) -> bool {
        self.classifier.is_user_mode_emulation(&mut self.host)
    }

    /// See [EmulationClassifier::is_user_mode_emulator].
    pub fn is_user_mode_emulator(&mut self) -> bool {
        self.classifier.is_user_mode_emulator(&mut self.host)
    }

    /// See [EmulationClassifier::is_kernel_mode_emulator].
    pub fn is_kernel_mode_emulator(&mut self) -> bool {
        self.classifier.is_kernel_mode_emulator(&mut self.host)
    }

    /// See [EmulationClassifier::emulated_process_id].
    pub fn emulated_process_id(&mut self) -> Option<u32> {
        self.classifier.emulated_process_id(&mut self.host)
    }

    /// See [EmulationClassifier::sysroot_override].
    pub fn sysroot_override(&mut self) -> Option<PathBuf> {
        self.classifier.sysroot_override(&mut self.host)
    }

    /// See [EmulationClassifier::classify].
    pub fn classify(&mut self) -> EmulationClassification {
        self.classifier.classify(&mut self.host)
    }

    /// Handles the target resuming its execution.
    pub fn on_resume(&mut self) {
        self.classifier.cache_mut().invalidate(CacheScope::PerStop);
    }

    /// Handles a new target being loaded.
    pub fn on_new_target(&mut self) {
        let cache = self.classifier.cache_mut();
        cache.invalidate(CacheScope::PerStop);
        cache.invalidate(CacheScope::PerSession);

        self.decoder
            .on_target_changed(self.host.current_endianness());
    }
}

impl<H: Host> LifecycleListener for Introspector<H> {
    fn on_event(&mut self, event: LifecycleEvent) {
        tracing::debug!(?event, "lifecycle event");

        match event {
            LifecycleEvent::Resumed => self.on_resume(),
            LifecycleEvent::NewTarget => self.on_new_target(),
        }
    }
}
