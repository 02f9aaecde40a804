use std::collections::HashSet;
use std::net::SocketAddr;

use crate::host::ProcessTable;

/// Finds the emulator process serving the debugger's remote session.
///
/// The remote addresses of the debugger's own connections are matched
/// against the local addresses of every process whose name starts with
/// `name_prefix`. The first matching process, in enumeration order, wins.
///
/// Processes whose connections cannot be listed are skipped.
pub fn find_emulator_process<P>(table: &P, name_prefix: &str) -> Option<u32>
where
    P: ProcessTable + ?Sized,
{
    let targets = match table.list_own_connections() {
        Ok(connections) => connections
            .into_iter()
            .filter_map(|c| c.remote_addr)
            .collect::<HashSet<SocketAddr>>(),
        Err(e) => {
            tracing::debug!(error = %e, "list own connections");
            return None;
        }
    };

    if targets.is_empty() {
        tracing::debug!("no connection to match against");
        return None;
    }

    let processes = match table.list_system_processes() {
        Ok(processes) => processes,
        Err(e) => {
            tracing::debug!(error = %e, "list system processes");
            return None;
        }
    };

    for process in processes
        .iter()
        .filter(|process| process.name.starts_with(name_prefix))
    {
        let connections = match table.list_process_connections(process.pid) {
            Ok(connections) => connections,
            Err(e) => {
                tracing::debug!(pid = process.pid, error = %e, "skipping process");
                continue;
            }
        };

        if let Some(c) = connections
            .iter()
            .find(|c| targets.contains(&c.local_addr))
        {
            tracing::debug!(
                pid = process.pid,
                name = %process.name,
                addr = %c.local_addr,
                "found emulator process"
            );
            return Some(process.pid);
        }
    }

    None
}
