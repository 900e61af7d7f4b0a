use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u32),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
