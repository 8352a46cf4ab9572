use crate::config::SessionConfig;

/// Identity fields the browse view needs from the signed-in session.
///
/// Acquiring and refreshing the credential itself happens elsewhere; this is
/// only what parameterizes the recommendation query and the greeting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            display_name: Some(display_name.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            user_id: config.user_id.clone().filter(|s| !s.trim().is_empty()),
            display_name: config.display_name.clone().filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn recommendations_heading(&self) -> String {
        match self.display_name {
            Some(ref name) => format!("{}'s Top Recommendations", name),
            None => "Top Recommendations".to_string(),
        }
    }
}
