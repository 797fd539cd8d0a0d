/// CLI configuration.
/// Reads config.json from ~/.config/tasklane/ (or platform equivalent).
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tasklane_core::config::StoreConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    #[serde(flatten)]
    pub store: StoreConfig,
}

impl CliConfig {
    /// `--snapshot` wins over the config file, which wins over the data dir default.
    pub fn resolve_snapshot(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.snapshot_path.clone())
            .unwrap_or_else(default_snapshot_path)
    }
}

/// Default config path: ~/.config/tasklane/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklane")
        .join("config.json")
}

/// Default snapshot path: ~/.local/share/tasklane/board.json
pub fn default_snapshot_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklane")
        .join("board.json")
}
