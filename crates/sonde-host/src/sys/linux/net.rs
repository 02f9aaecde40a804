use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;

use byteorder::{ByteOrder, NativeEndian};

/// Socket tables of the network namespace, as exposed by procfs.
const SOCKET_TABLES: [&str; 4] = ["tcp", "tcp6", "udp", "udp6"];

/// Entry of a procfs socket table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocketEntry {
    pub local_addr: SocketAddr,
    pub remote_addr: Option<SocketAddr>,
    pub inode: u64,
}

/// Reads every socket table under `<proc_root>/net`.
///
/// Missing tables (e.g., IPv6 disabled) are skipped.
pub fn read_socket_tables(proc_root: &Path) -> Vec<SocketEntry> {
    let mut entries = Vec::new();

    for table in SOCKET_TABLES {
        let path = proc_root.join("net").join(table);

        match std::fs::read_to_string(&path) {
            Ok(content) => entries.extend(parse_socket_table(&content)),
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping socket table"),
        }
    }

    entries
}

/// Parses the content of a procfs socket table (e.g., `/proc/net/tcp`).
///
/// Malformed lines are skipped.
pub fn parse_socket_table(content: &str) -> impl Iterator<Item = SocketEntry> + '_ {
    content.lines().skip(1).filter_map(|line| {
        let entry = parse_socket_line(line);

        if let Err(ref e) = entry {
            tracing::trace!(line, error = %e, "malformed socket entry");
        }

        entry.ok()
    })
}

fn parse_socket_line(line: &str) -> crate::sys::Result<SocketEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let [_, local, remote, _, _, _, _, _, _, inode, ..] = fields.as_slice() else {
        return Err(crate::sys::Error::SocketEntry(line.to_owned()));
    };

    let local_addr = parse_endpoint(local)?;
    let remote_addr = parse_endpoint(remote)?;

    let inode = inode
        .parse()
        .map_err(|_| crate::sys::Error::SocketEntry(line.to_owned()))?;

    Ok(SocketEntry {
        local_addr,
        remote_addr: (!remote_addr.ip().is_unspecified() || remote_addr.port() != 0)
            .then_some(remote_addr),
        inode,
    })
}

/// Parses an `ADDR:PORT` endpoint.
///
/// The address is printed as native-order 32-bit words, the port as a
/// host-order integer.
fn parse_endpoint(endpoint: &str) -> crate::sys::Result<SocketAddr> {
    let invalid = || crate::sys::Error::SocketEntry(endpoint.to_owned());

    let (addr, port) = endpoint.split_once(':').ok_or_else(invalid)?;
    let port = u16::from_str_radix(port, 16).map_err(|_| invalid())?;

    let words = (0..addr.len() / 8)
        .map(|i| {
            addr.get(i * 8..(i + 1) * 8)
                .and_then(|word| u32::from_str_radix(word, 16).ok())
                .ok_or_else(invalid)
        })
        .collect::<crate::sys::Result<Vec<u32>>>()?;

    match (addr.len(), words.as_slice()) {
        (8, &[word]) => {
            let mut octets = [0u8; 4];
            NativeEndian::write_u32(&mut octets, word);

            Ok(SocketAddr::new(Ipv4Addr::from(octets).into(), port))
        }
        (32, words) => {
            let mut octets = [0u8; 16];
            NativeEndian::write_u32_into(words, &mut octets);

            Ok(SocketAddr::new(Ipv6Addr::from(octets).into(), port))
        }
        _ => Err(invalid()),
    }
}
