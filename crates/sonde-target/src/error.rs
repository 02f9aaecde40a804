/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A structure could not be decoded from the given bytes.
    #[error(transparent)]
    Decode(#[from] scroll::Error),

    /// Error from the [goblin] crate.
    #[error(transparent)]
    Elf(#[from] goblin::error::Error),
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
