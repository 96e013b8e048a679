use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestaurantClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Non-success status; `message` is the server's message or `Error <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },
}

impl RestaurantClientError {
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: crate::models::ErrorResponse::message_for(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for RestaurantClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("Failed to remove '{key}': {reason}")]
    Remove { key: String, reason: String },

    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
