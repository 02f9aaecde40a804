use std::cell::Cell;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use sonde_target::endian::Endianness;
use sonde_target::host::{ConfigSink, Connection, FileSystemProbe, ProcessEntry};
use sonde_target::host::{ProcessTable, RemoteSession, TargetFacts};

pub const EMULATOR_PROBE: &str = "maintenance packet Qqemu.sstepbits";
pub const USER_MODE_PROBE: &str = "maintenance packet QOffsets";

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub &'static str);

/// Debugger collaborators with canned answers, recording every interaction.
pub struct FakeHost {
    pub endianness: Endianness,
    pub arch: String,

    pub remote: bool,
    pub responses: HashMap<&'static str, Result<String, &'static str>>,
    pub requests: Vec<String>,

    pub own_connections: Vec<Connection>,
    pub processes: Vec<ProcessEntry>,
    pub process_connections: HashMap<u32, Result<Vec<Connection>, &'static str>>,
    pub process_listings: Cell<usize>,

    pub existing_dirs: Vec<PathBuf>,
    pub search_roots: Vec<PathBuf>,
}

impl FakeHost {
    /// Debugger attached to a local process.
    pub fn native() -> Self {
        Self {
            endianness: Endianness::Little,
            arch: "x86_64".to_owned(),
            remote: false,
            responses: HashMap::new(),
            requests: Vec::new(),
            own_connections: Vec::new(),
            processes: Vec::new(),
            process_connections: HashMap::new(),
            process_listings: Cell::new(0),
            existing_dirs: Vec::new(),
            search_roots: Vec::new(),
        }
    }

    /// Debugger attached to `qemu-user` through the gdbstub.
    pub fn qemu_user() -> Self {
        Self::native()
            .remote()
            .respond(EMULATOR_PROBE, gdb_packet_reply("ENABLE=7,NOIRQ=2,NOTIMER=4"))
            .respond(USER_MODE_PROBE, gdb_packet_reply("Text=0;Data=0;Bss=0"))
    }

    /// Debugger attached to `qemu-system` through the gdbstub.
    pub fn qemu_system() -> Self {
        Self::native()
            .remote()
            .respond(EMULATOR_PROBE, gdb_packet_reply("ENABLE=7,NOIRQ=2,NOTIMER=4"))
            .respond(USER_MODE_PROBE, gdb_packet_reply(""))
    }

    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    pub fn respond(mut self, request: &'static str, response: String) -> Self {
        self.responses.insert(request, Ok(response));
        self
    }

    pub fn fail(mut self, request: &'static str) -> Self {
        self.responses.insert(request, Err("request not supported"));
        self
    }

    pub fn connected_to(mut self, remote_addr: &str) -> Self {
        self.own_connections.push(Connection {
            local_addr: addr("127.0.0.1:40000"),
            remote_addr: Some(addr(remote_addr)),
        });
        self
    }

    pub fn process(mut self, pid: u32, name: &str, local_addrs: &[&str]) -> Self {
        self.processes.push(ProcessEntry {
            pid,
            name: name.to_owned(),
        });

        let connections = local_addrs
            .iter()
            .map(|local| Connection {
                local_addr: addr(local),
                remote_addr: None,
            })
            .collect();

        self.process_connections.insert(pid, Ok(connections));
        self
    }

    pub fn inaccessible_process(mut self, pid: u32, name: &str) -> Self {
        self.processes.push(ProcessEntry {
            pid,
            name: name.to_owned(),
        });
        self.process_connections.insert(pid, Err("permission denied"));
        self
    }

    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.existing_dirs.push(path.into());
        self
    }

    pub fn requests_to(&self, request: &str) -> usize {
        self.requests.iter().filter(|r| *r == request).count()
    }
}

impl TargetFacts for FakeHost {
    fn current_endianness(&self) -> Endianness {
        self.endianness
    }

    fn current_arch_name(&self) -> String {
        self.arch.clone()
    }
}

impl RemoteSession for FakeHost {
    type Error = FakeError;

    fn is_remote(&self) -> bool {
        self.remote
    }

    fn send_diagnostic_request(&mut self, command: &str) -> Result<String, Self::Error> {
        self.requests.push(command.to_owned());

        match self.responses.get(command) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(e)) => Err(FakeError(e)),
            None => Ok(gdb_packet_reply("")),
        }
    }
}

impl ProcessTable for FakeHost {
    type Error = FakeError;

    fn list_own_connections(&self) -> Result<Vec<Connection>, Self::Error> {
        Ok(self.own_connections.clone())
    }

    fn list_system_processes(&self) -> Result<Vec<ProcessEntry>, Self::Error> {
        self.process_listings.set(self.process_listings.get() + 1);
        Ok(self.processes.clone())
    }

    fn list_process_connections(&self, pid: u32) -> Result<Vec<Connection>, Self::Error> {
        match self.process_connections.get(&pid) {
            Some(Ok(connections)) => Ok(connections.clone()),
            Some(Err(e)) => Err(FakeError(e)),
            None => Err(FakeError("no such process")),
        }
    }
}

impl FileSystemProbe for FakeHost {
    fn directory_exists(&self, path: &Path) -> bool {
        self.existing_dirs.iter().any(|dir| dir == path)
    }
}

impl ConfigSink for FakeHost {
    fn set_symbol_search_root(&mut self, path: &Path) {
        self.search_roots.push(path.to_path_buf());
    }
}

/// Output of gdb's `maintenance packet` command.
pub fn gdb_packet_reply(reply: &str) -> String {
    format!("sending: \"...\"\nreceived: \"{reply}\"\n")
}

pub fn addr(addr: &str) -> SocketAddr {
    addr.parse().expect("socket address")
}
