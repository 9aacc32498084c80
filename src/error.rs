use thiserror::Error;
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("Index {index} out of bounds for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Inappropriate point: {0}")]
    InvalidPoint(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
pub type Result<T> = std::result::Result<T, FunctionError>;
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(FunctionError::IndexOutOfRange { index, len });
    }
    Ok(())
}
