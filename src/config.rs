use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(alias = "baseurl", default = "default_base_url")]
    pub base_url: String,
    #[serde(alias = "recommenderurl", default = "default_recommender_url")]
    pub recommender_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Raw `Cookie` header value carrying the externally issued credential.
    #[serde(default)]
    pub credential_cookie: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recommender_url: default_recommender_url(),
            timeout_secs: default_timeout_secs(),
            credential_cookie: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowseConfig {
    #[serde(default = "default_section_page_size")]
    pub section_page_size: u32,
    #[serde(default = "default_recommendation_batch")]
    pub recommendation_batch: usize,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: u32,
    #[serde(default = "default_search_threshold")]
    pub search_threshold: usize,
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
    #[serde(default)]
    pub dedupe_pages: bool,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            section_page_size: default_section_page_size(),
            recommendation_batch: default_recommendation_batch(),
            recommendation_limit: default_recommendation_limit(),
            search_threshold: default_search_threshold(),
            search_page_size: default_search_page_size(),
            dedupe_pages: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_page_size")]
    pub page_size: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            page_size: default_admin_page_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(alias = "userid", default)]
    pub user_id: Option<String>,
    #[serde(alias = "name", default)]
    pub display_name: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000/CineNiche".to_string()
}

fn default_recommender_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_section_page_size() -> u32 {
    7
}

fn default_recommendation_batch() -> usize {
    7
}

fn default_recommendation_limit() -> u32 {
    50
}

fn default_search_threshold() -> usize {
    2
}

fn default_search_page_size() -> u32 {
    20
}

fn default_admin_page_size() -> u32 {
    10
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.browse.section_page_size == 0 {
            return Err(ConfigError::Invalid("browse.section_page_size must be at least 1".into()));
        }
        if self.browse.recommendation_batch == 0 {
            return Err(ConfigError::Invalid("browse.recommendation_batch must be at least 1".into()));
        }
        if self.admin.page_size == 0 {
            return Err(ConfigError::Invalid("admin.page_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
