use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("range out of bound: offset {offset}, width {width}, length {len}")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },
}
