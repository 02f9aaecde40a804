use std::net::SocketAddr;
use std::os::unix::fs::symlink;
use std::path::Path;

use sonde_host::{LocalFileSystem, ProcfsProcessTable};
use sonde_target::emulation::find_emulator_process;
use sonde_target::host::{FileSystemProbe, ProcessTable};
use test_log::test;

const TCP_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";

/// Fake procfs tree.
struct FakeProc {
    root: tempfile::TempDir,
    tcp: String,
}

impl FakeProc {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(root.path().join("net")).expect("net dir");

        Self {
            root,
            tcp: TCP_HEADER.to_owned(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn process(self, pid: u32, comm: &str, socket_inodes: &[u64]) -> Self {
        let dir = self.path().join(pid.to_string());
        std::fs::create_dir_all(dir.join("fd")).expect("fd dir");
        std::fs::write(dir.join("comm"), format!("{comm}\n")).expect("comm");

        // stdin, not a socket
        symlink("/dev/null", dir.join("fd").join("0")).expect("fd symlink");

        for (i, inode) in socket_inodes.iter().enumerate() {
            symlink(
                format!("socket:[{inode}]"),
                dir.join("fd").join((i + 3).to_string()),
            )
            .expect("fd symlink");
        }

        self
    }

    fn process_without_fds(self, pid: u32, comm: &str) -> Self {
        let dir = self.path().join(pid.to_string());
        std::fs::create_dir_all(&dir).expect("process dir");
        std::fs::write(dir.join("comm"), format!("{comm}\n")).expect("comm");
        self
    }

    fn tcp_socket(mut self, local: &str, remote: &str, inode: u64) -> Self {
        let sl = self.tcp.lines().count() - 1;
        self.tcp.push_str(&format!(
            "   {sl}: {} {} 01 00000000:00000000 00:00000000 00000000  1000        0 {inode} 1 0000000000000000 20 4 30 10 -1\n",
            procfs_endpoint(local),
            procfs_endpoint(remote),
        ));
        std::fs::write(self.path().join("net").join("tcp"), &self.tcp).expect("tcp table");
        self
    }

    fn table(&self, observer: u32) -> ProcfsProcessTable {
        ProcfsProcessTable::new()
            .with_proc_root(self.path())
            .with_observer(observer)
    }
}

/// Formats an IPv4 endpoint the way procfs does.
fn procfs_endpoint(endpoint: &str) -> String {
    let SocketAddr::V4(addr) = endpoint.parse::<SocketAddr>().expect("addr") else {
        unreachable!("only IPv4 endpoints are used");
    };

    format!(
        "{:08X}:{:04X}",
        u32::from_ne_bytes(addr.ip().octets()),
        addr.port()
    )
}

#[test]
fn lists_processes_in_pid_order() {
    let procfs = FakeProc::new()
        .process(300, "bash", &[])
        .process(42, "qemu-arm", &[]);

    std::fs::create_dir(procfs.path().join("self")).expect("self dir");

    let processes = procfs.table(1).list_system_processes().expect("processes");

    let names = processes
        .iter()
        .map(|p| (p.pid, p.name.as_str()))
        .collect::<Vec<_>>();

    assert_eq!(names, vec![(42, "qemu-arm"), (300, "bash")]);
}

#[test]
fn lists_connections_by_socket_inode() {
    let procfs = FakeProc::new()
        .process(10, "gdb", &[1001])
        .process(20, "qemu-aarch64", &[2001, 2002])
        .tcp_socket("127.0.0.1:40000", "127.0.0.1:1234", 1001)
        .tcp_socket("127.0.0.1:1234", "127.0.0.1:40000", 2001)
        .tcp_socket("0.0.0.0:1234", "0.0.0.0:0", 2002);

    let table = procfs.table(10);

    let own = table.list_own_connections().expect("own connections");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].remote_addr, Some("127.0.0.1:1234".parse().expect("addr")));

    let emulator = table.list_process_connections(20).expect("connections");
    assert_eq!(emulator.len(), 2);
    assert!(emulator.iter().any(|c| c.remote_addr.is_none()));
}

#[test]
fn finds_emulator_serving_observer() {
    let procfs = FakeProc::new()
        .process(10, "gdb-multiarch", &[1001])
        .process_without_fds(15, "qemu-mips")
        .process(20, "qemu-mips", &[2001])
        .process(30, "sshd", &[3001])
        .tcp_socket("127.0.0.1:40000", "127.0.0.1:1234", 1001)
        .tcp_socket("127.0.0.1:1234", "127.0.0.1:40000", 2001)
        .tcp_socket("127.0.0.1:1234", "127.0.0.1:40001", 3001);

    assert!(procfs.table(15).list_process_connections(15).is_err());

    assert_eq!(find_emulator_process(&procfs.table(10), "qemu"), Some(20));
    assert_eq!(find_emulator_process(&procfs.table(30), "qemu"), None);
}

#[test]
fn local_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("file");
    std::fs::write(&file, b"").expect("file");

    assert!(LocalFileSystem.directory_exists(dir.path()));
    assert!(!LocalFileSystem.directory_exists(&file));
    assert!(!LocalFileSystem.directory_exists(&dir.path().join("missing")));
}
