//! Environment configuration

use crate::store::DEFAULT_NAMESPACE;

/// Inference endpoint used when `ASSISTANT_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/";

/// Value of `ASSISTANT_DB_PATH` that selects the non-durable store
pub const IN_MEMORY_DB: &str = ":memory:";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Base URL of the assistant; requests go to `<api_url>/chat`
    pub api_url: String,
    pub db_path: String,
    /// Prefix for storage keys
    pub namespace: String,
    pub port: u16,
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("ASSISTANT_DB_PATH").unwrap_or_else(|| {
            let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
            format!("{home}/.course-assistant/assistant.db")
        });

        Self {
            api_url: lookup("ASSISTANT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            db_path,
            namespace: lookup("ASSISTANT_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            port: port_from(&lookup, "ASSISTANT_PORT", 8000),
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.db_path == IN_MEMORY_DB
    }
}

/// Port for the stub inference server
pub fn mock_chat_port() -> u16 {
    port_from(&|key: &str| std::env::var(key).ok(), "MOCK_CHAT_PORT", 5000)
}

fn port_from(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u16) -> u16 {
    lookup(key)
        .and_then(|p| p.parse().ok())
        .unwrap_or(default)
}
