//! This crate provides the local collaborators of the `sonde-target`
//! introspection layer, for a debugger running on the **same host machine**
//! as the emulator it talks to.
//!
//! - [ProcfsProcessTable] enumerates processes and their network
//!   connections.
//! - [LocalFileSystem] probes the local filesystem.
//!
//! <div class="warning">
//!
//! *The debugger-facing collaborators (target facts, remote session,
//! configuration sink) are not provided here. They depend on the debugger
//! being extended.*
//!
//! </div>
//!
//! # Supported Platforms
//!
//! Only **Linux** is supported (through `procfs`).

mod error;
mod sys;

use std::path::Path;

use sonde_target::host::FileSystemProbe;

pub use self::error::{Error, Result};
pub use self::sys::ProcfsProcessTable;

/// Filesystem probe of the host machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl FileSystemProbe for LocalFileSystem {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
