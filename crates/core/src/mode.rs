use serde::{Deserialize, Serialize};

/// How a request is served: against the database, or against built-in
/// demo fixtures that never persist anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    #[default]
    Live,
    Demo,
}

impl ClientMode {
    /// Reads a demo flag value such as `true`, `1`, `yes` or `on`.
    /// Anything else is live.
    pub fn from_flag(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "demo" => ClientMode::Demo,
            _ => ClientMode::Live,
        }
    }

    pub fn is_demo(self) -> bool {
        self == ClientMode::Demo
    }
}
