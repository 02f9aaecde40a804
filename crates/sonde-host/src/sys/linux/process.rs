use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Lists the IDs of all processes, in ascending order.
pub fn process_ids(proc_root: &Path) -> crate::sys::Result<Vec<u32>> {
    let entries = std::fs::read_dir(proc_root)
        .map_err(|e| crate::sys::Error::File(proc_root.to_path_buf(), e))?;

    let mut pids = entries
        .flatten()
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .collect::<Vec<_>>();

    pids.sort_unstable();

    Ok(pids)
}

/// Reads the executable name of the given process.
pub fn process_name(proc_root: &Path, pid: u32) -> crate::sys::Result<String> {
    let path = process_dir(proc_root, pid).join("comm");

    std::fs::read_to_string(&path)
        .map(|comm| comm.trim_end_matches('\n').to_owned())
        .map_err(|e| crate::sys::Error::File(path, e))
}

/// Collects the inodes of the sockets opened by the given process.
pub fn socket_inodes(proc_root: &Path, pid: u32) -> crate::sys::Result<HashSet<u64>> {
    let path = process_dir(proc_root, pid).join("fd");

    let entries = std::fs::read_dir(&path).map_err(|e| crate::sys::Error::File(path, e))?;

    let inodes = entries
        .flatten()
        .filter_map(|entry| std::fs::read_link(entry.path()).ok())
        .filter_map(|link| {
            link.to_str()?
                .strip_prefix("socket:[")?
                .strip_suffix(']')?
                .parse()
                .ok()
        })
        .collect();

    Ok(inodes)
}

fn process_dir(proc_root: &Path, pid: u32) -> PathBuf {
    proc_root.join(pid.to_string())
}
