use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("geo resolution error: {0}")]
    Resolution(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(entity.to_string()) }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
