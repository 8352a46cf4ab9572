#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Validation(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Message shown to the user in place of the failed content.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Network(_) | CatalogError::Decode(_) => {
                "Could not reach the catalog. Please try again.".to_string()
            }
            CatalogError::NotFound(id) => format!("Title {} was not found.", id),
            CatalogError::Validation(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else if e.is_timeout() {
            CatalogError::Network(format!("request timed out: {}", e))
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
