mod error;
mod net;
mod process;

use std::path::{Path, PathBuf};

use sonde_target::host::{Connection, ProcessEntry, ProcessTable};

pub use self::error::{Error, Result};

/// Default mount point of procfs.
const PROC_ROOT: &str = "/proc";

/// Process table backed by procfs.
///
/// A connection belongs to a process if one of the process's file
/// descriptors refers to the socket's inode.
#[derive(Clone, Debug)]
pub struct ProcfsProcessTable {
    /// Mount point of procfs.
    proc_root: PathBuf,

    /// Process whose connections are the "own" connections.
    observer: u32,
}

impl ProcfsProcessTable {
    /// Creates a new process table observing the current process.
    pub fn new() -> Self {
        Self {
            proc_root: PROC_ROOT.into(),
            observer: nix::unistd::getpid().as_raw().unsigned_abs(),
        }
    }

    /// Uses the procfs mounted at the given path.
    pub fn with_proc_root(mut self, proc_root: impl Into<PathBuf>) -> Self {
        self.proc_root = proc_root.into();
        self
    }

    /// Treats the connections of the given process as the "own" connections
    /// (e.g., a debugger running in another process).
    pub const fn with_observer(mut self, pid: u32) -> Self {
        self.observer = pid;
        self
    }

    /// Mount point of procfs.
    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// Process whose connections are the "own" connections.
    pub const fn observer(&self) -> u32 {
        self.observer
    }
}

impl Default for ProcfsProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for ProcfsProcessTable {
    type Error = crate::Error;

    fn list_own_connections(&self) -> crate::Result<Vec<Connection>> {
        self.list_process_connections(self.observer)
    }

    #[tracing::instrument(name = "ListProcesses", skip_all)]
    fn list_system_processes(&self) -> crate::Result<Vec<ProcessEntry>> {
        let processes = process::process_ids(&self.proc_root)?
            .into_iter()
            .filter_map(|pid| match process::process_name(&self.proc_root, pid) {
                Ok(name) => Some(ProcessEntry { pid, name }),
                Err(e) => {
                    // the process most likely exited in the meantime
                    tracing::trace!(pid, error = %e);
                    None
                }
            })
            .collect();

        Ok(processes)
    }

    fn list_process_connections(&self, pid: u32) -> crate::Result<Vec<Connection>> {
        let inodes = process::socket_inodes(&self.proc_root, pid)?;

        if inodes.is_empty() {
            return Ok(Vec::new());
        }

        let connections = net::read_socket_tables(&self.proc_root)
            .into_iter()
            .filter(|entry| inodes.contains(&entry.inode))
            .map(|entry| Connection {
                local_addr: entry.local_addr,
                remote_addr: entry.remote_addr,
            })
            .collect();

        Ok(connections)
    }
}
