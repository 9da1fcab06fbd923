use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid ban request: {0}")]
    InvalidBanRequest(String),

    #[error("Invalid course key: {0}")]
    InvalidCourseKey(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
