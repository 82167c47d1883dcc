use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assign::AssignmentConfig;
use crate::error::{HackathonError, Result};
use crate::roster::TeamRoster;

/// Sender addresses the organisers may use for confirmations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default)]
    pub default_sender: String,
    #[serde(default)]
    pub allowed_senders: Vec<String>,
}

/// Contents of the JSON settings file.
///
/// ```json
/// {
///   "max_teams": 10,
///   "team_size": 5,
///   "teams": { "TEAM 1": { "display_name": "Rockets", "mentor": { "name": "Marie" } } },
///   "mail": { "default_sender": "hackathon@example.com" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub assignment: AssignmentConfig,
    #[serde(default)]
    pub teams: TeamRoster,
    #[serde(default)]
    pub mail: MailSettings,
}

impl Settings {
    /// Loads and validates a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HackathonError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let settings = Self::from_json(&data)?;
        debug!(path = %path.display(), assignment = ?settings.assignment, "settings loaded");
        Ok(settings)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(data)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.assignment.max_teams == 0 {
            return Err(HackathonError::InvalidSettings(
                "max_teams must be at least 1".into(),
            ));
        }
        if self.assignment.team_size == 0 {
            return Err(HackathonError::InvalidSettings(
                "team_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
