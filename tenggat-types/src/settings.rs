use serde::{Deserialize, Serialize};

/// Credentials for the reminder gateway. Empty strings mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    #[serde(default)]
    pub send_token: String,
    #[serde(default)]
    pub target_address: String,
}

impl ReminderSettings {
    pub fn is_configured(&self) -> bool {
        !self.send_token.is_empty() && !self.target_address.is_empty()
    }

    /// Token prefix safe to print in logs and terminals.
    pub fn masked_token(&self) -> String {
        if self.send_token.is_empty() {
            return String::new();
        }

        let prefix = self.send_token.chars().take(5).collect::<String>();
        format!("{prefix}...")
    }
}
