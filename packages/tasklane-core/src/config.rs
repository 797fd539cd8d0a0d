/// Store configuration.
/// Read from a JSON file; every field falls back to its default.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Titles of the empty lists every new board starts with.
    #[serde(default = "default_lists")]
    pub default_lists: Vec<String>,
    /// Member ids given to newly created workspaces and boards.
    #[serde(default = "default_members")]
    pub default_members: Vec<String>,
    /// Buffered change events per subscriber before the slowest one lags.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_lists() -> Vec<String> {
    vec![
        "To Do".to_string(),
        "In Progress".to_string(),
        "Done".to_string(),
    ]
}

fn default_members() -> Vec<String> {
    vec!["1".to_string()]
}

/// Upper bound on `event_capacity`; larger values are clamped by the store.
pub const MAX_EVENT_CAPACITY: usize = 4096;

fn default_event_capacity() -> usize {
    64
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_lists: default_lists(),
            default_members: default_members(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Load a JSON config from path. Returns `T::default()` if the file is
/// missing or does not parse.
pub fn load_config<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(
                "[tasklane.config] Failed to parse config {}: {}",
                path.display(),
                e
            );
            T::default()
        }),
        Err(_) => {
            log::info!(
                "[tasklane.config] No config at {}, using defaults",
                path.display()
            );
            T::default()
        }
    }
}
