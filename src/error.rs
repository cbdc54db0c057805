use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("invalid file name {0:?}")]
    InvalidName(String),
    #[error("file {0} already exists")]
    AlreadyExists(String),
    #[error("maximum file limit reached")]
    DirectoryFull,
    #[error("file {0} does not exist")]
    NotFound(String),
    #[error("not enough free blocks ({required} required, {free} free)")]
    InsufficientSpace { required: usize, free: usize },
    #[error("backing region too small ({required} bytes required, {actual} given)")]
    VolumeTooSmall { required: u64, actual: u64 },
    #[error("volume I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, StoreError>;
