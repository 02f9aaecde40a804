/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Internal host error.
    #[error(transparent)]
    HostInternal(#[from] crate::sys::Error),
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
