//! This crate provides the target-introspection layer of a debugger
//! extension.
//!
//! Two components are provided:
//! - An endianness-adaptive decoder, which parses binary blobs from the
//!   target (e.g., auxiliary vector, program headers) with the byte order of
//!   the **currently** debugged target.
//! - An execution-environment classifier, which detects whether the remote
//!   target runs under an emulator (user-mode or whole-system), and which
//!   emulator process serves the session.
//!
//! Both are bundled in an [Introspector], which is driven by the debugger's
//! lifecycle events.
//!
//! # Plugging into a debugger
//!
//! The debugger itself is only reachable through a few narrow traits (see
//! [host]), for instance:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sonde_target::Introspector;
//! use sonde_target::endian::{Elf64Auxv, Endianness};
//! use sonde_target::events::{LifecycleEvent, LifecycleListener};
//! use sonde_target::host::{ConfigSink, Connection, FileSystemProbe};
//! use sonde_target::host::{ProcessEntry, ProcessTable, RemoteSession, TargetFacts};
//!
//! struct Gdb;
//!
//! impl TargetFacts for Gdb {
//!     fn current_endianness(&self) -> Endianness {
//!         Endianness::Little
//!     }
//!
//!     fn current_arch_name(&self) -> String {
//!         "aarch64".to_owned()
//!     }
//! }
//!
//! impl RemoteSession for Gdb {
//!     type Error = std::io::Error;
//!
//!     fn is_remote(&self) -> bool {
//!         true
//!     }
//!
//!     fn send_diagnostic_request(&mut self, command: &str) -> Result<String, Self::Error> {
//!         //
//!         // forward the command to the debugger
//!         //
//!         # let _ = command;
//!         Ok(String::new())
//!     }
//! }
//!
//! impl ProcessTable for Gdb {
//!     type Error = std::io::Error;
//!
//!     fn list_own_connections(&self) -> Result<Vec<Connection>, Self::Error> {
//!         Ok(Vec::new())
//!     }
//!
//!     fn list_system_processes(&self) -> Result<Vec<ProcessEntry>, Self::Error> {
//!         Ok(Vec::new())
//!     }
//!
//!     fn list_process_connections(&self, _pid: u32) -> Result<Vec<Connection>, Self::Error> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! impl FileSystemProbe for Gdb {
//!     fn directory_exists(&self, path: &Path) -> bool {
//!         path.is_dir()
//!     }
//! }
//!
//! impl ConfigSink for Gdb {
//!     fn set_symbol_search_root(&mut self, _path: &Path) {}
//! }
//!
//! let mut introspector = Introspector::new(Gdb);
//!
//! if introspector.is_user_mode_emulator() {
//!     let pid = introspector.emulated_process_id();
//! }
//!
//! let auxv = introspector.decode_all::<Elf64Auxv>(&[0u8; 32]).unwrap();
//!
//! // the target resumed
//! introspector.on_event(LifecycleEvent::Resumed);
//! ```

/// Module implementing the execution-environment classifier.
pub mod emulation;

/// Module implementing the endianness-adaptive decoder.
pub mod endian;

/// Module containing the debugger lifecycle events.
pub mod events;

/// Module containing traits for the debugger collaborators.
pub mod host;

mod error;
mod facts;
mod introspector;

pub use self::error::{Error, Result};
pub use self::facts::ElfTargetFacts;
pub use self::introspector::Introspector;
