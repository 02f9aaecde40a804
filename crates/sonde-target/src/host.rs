use std::net::SocketAddr;
use std::path::Path;

use crate::endian::Endianness;

/// Trait providing architecture facts about the debugged target.
pub trait TargetFacts {
    /// Byte order of the debugged target.
    fn current_endianness(&self) -> Endianness;

    /// Architecture name of the debugged target (e.g., `x86_64`, `aarch64`).
    fn current_arch_name(&self) -> String;
}

/// Trait providing access to the debugger's remote session, if any.
pub trait RemoteSession {
    /// Error returned by this trait.
    type Error: std::error::Error;

    /// Returns whether the debugger is attached through a remote protocol.
    fn is_remote(&self) -> bool;

    /// Sends a diagnostic (maintenance) request to the remote stub and
    /// returns the raw response text.
    ///
    /// The round-trip is synchronous.
    fn send_diagnostic_request(&mut self, command: &str) -> Result<String, Self::Error>;
}

/// Network connection endpoint owned by some process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Local address of the socket.
    pub local_addr: SocketAddr,

    /// Remote address of the socket (none for listening or unbound sockets).
    pub remote_addr: Option<SocketAddr>,
}

/// Process running on the local system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessEntry {
    /// Process ID.
    pub pid: u32,

    /// Executable name of the process.
    pub name: String,
}

/// Trait implementing process and connection enumeration on the host
/// running the debugger.
pub trait ProcessTable {
    /// Error returned by this trait.
    type Error: std::error::Error;

    /// Lists the network connections of the debugger's own process.
    fn list_own_connections(&self) -> Result<Vec<Connection>, Self::Error>;

    /// Lists all processes running on the system.
    fn list_system_processes(&self) -> Result<Vec<ProcessEntry>, Self::Error>;

    /// Lists the network connections of the given process.
    ///
    /// # Note
    ///
    /// This may fail for a single process (e.g., missing permissions, or the
    /// process exited in the meantime).
    fn list_process_connections(&self, pid: u32) -> Result<Vec<Connection>, Self::Error>;
}

/// Trait probing the local filesystem.
pub trait FileSystemProbe {
    /// Returns whether the given path is an existing directory.
    fn directory_exists(&self, path: &Path) -> bool;
}

/// Trait for updating the debugger's global configuration.
pub trait ConfigSink {
    /// Sets the root directory used by the debugger when searching for
    /// symbols and shared libraries.
    fn set_symbol_search_root(&mut self, path: &Path);
}

/// Every collaborator needed by an [Introspector](crate::Introspector).
///
/// This trait is implemented for any type implementing all the collaborator
/// traits. See [HostBundle] for assembling one from separate parts.
pub trait Host: TargetFacts + RemoteSession + ProcessTable + FileSystemProbe + ConfigSink {}

impl<T> Host for T where T: TargetFacts + RemoteSession + ProcessTable + FileSystemProbe + ConfigSink {}

/// Host assembled from one value per collaborator.
pub struct HostBundle<T, R, P, F, C> {
    /// Architecture facts provider.
    pub target: T,

    /// Remote session.
    pub remote: R,

    /// Process and connection enumerator.
    pub processes: P,

    /// Filesystem probe.
    pub fs: F,

    /// Debugger configuration sink.
    pub config: C,
}

impl<T: TargetFacts, R, P, F, C> TargetFacts for HostBundle<T, R, P, F, C> {
    fn current_endianness(&self) -> Endianness {
        self.target.current_endianness()
    }

    fn current_arch_name(&self) -> String {
        self.target.current_arch_name()
    }
}

impl<T, R: RemoteSession, P, F, C> RemoteSession for HostBundle<T, R, P, F, C> {
    type Error = R::Error;

    fn is_remote(&self) -> bool {
        self.remote.is_remote()
    }

    fn send_diagnostic_request(&mut self, command: &str) -> Result<String, Self::Error> {
        self.remote.send_diagnostic_request(command)
    }
}

impl<T, R, P: ProcessTable, F, C> ProcessTable for HostBundle<T, R, P, F, C> {
    type Error = P::Error;

    fn list_own_connections(&self) -> Result<Vec<Connection>, Self::Error> {
        self.processes.list_own_connections()
    }

    fn list_system_processes(&self) -> Result<Vec<ProcessEntry>, Self::Error> {
        self.processes.list_system_processes()
    }

    fn list_process_connections(&self, pid: u32) -> Result<Vec<Connection>, Self::Error> {
        self.processes.list_process_connections(pid)
    }
}

impl<T, R, P, F: FileSystemProbe, C> FileSystemProbe for HostBundle<T, R, P, F, C> {
    fn directory_exists(&self, path: &Path) -> bool {
        self.fs.directory_exists(path)
    }
}

impl<T, R, P, F, C: ConfigSink> ConfigSink for HostBundle<T, R, P, F, C> {
    fn set_symbol_search_root(&mut self, path: &Path) {
        self.config.set_symbol_search_root(path);
    }
}

/// Remote session of a debugger attached to a local process.
///
/// Diagnostic requests always fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalSession;

/// Error returned by [LocalSession] for every diagnostic request.
#[derive(thiserror::Error, Debug)]
#[error("not connected to a remote target")]
pub struct NotRemote;

impl RemoteSession for LocalSession {
    type Error = NotRemote;

    fn is_remote(&self) -> bool {
        false
    }

    fn send_diagnostic_request(&mut self, _command: &str) -> Result<String, Self::Error> {
        Err(NotRemote)
    }
}
