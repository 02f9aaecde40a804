#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File open/read error.
    #[error("{0}: {1}")]
    File(std::path::PathBuf, std::io::Error),

    #[error("malformed socket entry: {0}")]
    SocketEntry(String),
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
