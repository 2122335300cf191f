use tarray_storage::Error as StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("constructor cannot be called in this context")]
    InvalidConstructorCall,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("byte offset / length out of range")]
    OffsetLengthOutOfRange,
    #[error("byte offset / length is not aligned")]
    UnalignedOffsetOrLength,
}

impl From<StorageError> for Error {
    #[inline]
    fn from(src: StorageError) -> Self {
        match src {
            StorageError::InvalidArgument(msg) => Error::InvalidArgument(msg.to_string()),
            StorageError::OutOfRange { .. } => Error::OffsetLengthOutOfRange,
        }
    }
}
