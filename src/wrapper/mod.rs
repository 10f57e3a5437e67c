//! Operation Wrapper Module
//!
//! Runs every remote read, write and procedure call through one path that
//! times it, bounds it, logs it and folds every outcome into an
//! [`OperationResult`].

mod operation;
mod result;

pub use operation::{
    OperationWrapper, WrapperSettings, DEFAULT_OPERATION_TIMEOUT, DEFAULT_SLOW_THRESHOLD,
};
pub use result::{
    ErrorInfo, ErrorKind, OperationMetadata, OperationResult, TIMEOUT_ERROR_MESSAGE,
    UNEXPECTED_ERROR_MESSAGE,
};
