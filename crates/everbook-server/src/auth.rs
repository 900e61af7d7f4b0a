use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use everbook_types::{IdentitySource, SenderId};

use crate::error::{ServerError, ServerResult};

/// Credentials presented on a request.
#[derive(Clone, Debug)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> ServerResult<Self> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(Self::Anonymous);
        };
        let value = value
            .to_str()
            .map_err(|_| ServerError::AuthFailed("authorization header is not valid text".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServerError::AuthFailed("expected bearer credentials".into()))?;
        if token.is_empty() {
            return Err(ServerError::AuthFailed("empty bearer token".into()));
        }
        Ok(Self::Bearer(token.to_string()))
    }

    /// Bind the sender identity for a write.
    ///
    /// The identity is derived from the bearer secret, never supplied as a
    /// request field, so a caller can only ever write as itself. Anonymous
    /// callers cannot write.
    pub fn bind_sender(&self) -> ServerResult<SenderId> {
        match self {
            Self::Bearer(token) => Ok(SenderId::derive(&IdentitySource::Secret(
                token.as_bytes().to_vec(),
            ))),
            Self::Anonymous => Err(ServerError::AuthFailed(
                "appending requires bearer credentials".into(),
            )),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}
