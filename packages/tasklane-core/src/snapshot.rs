use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::types::{BoardTree, Workspace};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found}")]
    UnsupportedVersion { found: u32 },
}

/// On-disk form of a board tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub version: u32,
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_board_id: Option<String>,
}

impl SnapshotDocument {
    pub fn from_tree(tree: &BoardTree) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            workspaces: tree.workspaces.clone(),
            current_board_id: tree.current_board_id.clone(),
        }
    }

    pub fn into_tree(self) -> BoardTree {
        BoardTree {
            workspaces: self.workspaces,
            current_board_id: self.current_board_id,
        }
    }
}

/// A JSON snapshot file. Remembers the hash of what it last read or wrote
/// so unchanged trees are not rewritten.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    last_hash: Option<String>,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_hash: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the snapshot. `Ok(None)` when the file does not exist yet.
    pub fn load(&mut self) -> Result<Option<SnapshotDocument>, SnapshotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "[tasklane.snapshot] No snapshot at {}",
                    self.path.display()
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let document: SnapshotDocument = serde_json::from_str(&content)?;
        if document.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: document.version,
            });
        }
        self.last_hash = Some(content_hash(&content));
        log::info!(
            "[tasklane.snapshot] Loaded {} workspaces from {}",
            document.workspaces.len(),
            self.path.display()
        );
        Ok(Some(document))
    }

    /// Write `tree` unless the file already holds exactly this content.
    /// Returns whether anything was written.
    pub fn save(&mut self, tree: &BoardTree) -> Result<bool, SnapshotError> {
        let mut content = serde_json::to_string_pretty(&SnapshotDocument::from_tree(tree))?;
        content.push('\n');
        let hash = content_hash(&content);
        if self.last_hash.as_deref() == Some(hash.as_str()) {
            log::debug!("[tasklane.snapshot] Unchanged, skipping write");
            return Ok(false);
        }

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        atomic_write(&self.path, &content)?;
        self.last_hash = Some(hash);
        log::info!("[tasklane.snapshot] Saved {}", self.path.display());
        Ok(true)
    }
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.replace("\r\n", "\n").as_bytes());
    hex::encode(hasher.finalize())
}

/// Temp file, fsync, rename, then fsync the directory.
fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
    if content.trim().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Refusing to write an empty snapshot",
        ));
    }

    let tmp_path = path.with_extension("tasklane.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;

    if let Some(dir) = path.parent() {
        if let Ok(d) = fs::File::open(dir) {
            let _ = d.sync_all();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_workspaces;
    use tempfile::TempDir;

    fn demo_tree() -> BoardTree {
        BoardTree {
            workspaces: demo_workspaces(),
            current_board_id: Some("board-1".to_string()),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut file = SnapshotFile::new(dir.path().join("board.json"));
        assert!(!file.exists());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("board.json");
        let tree = demo_tree();

        let mut file = SnapshotFile::new(&path);
        assert_eq!(file.path(), path.as_path());
        assert!(file.save(&tree).unwrap());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"version\": 1"));
        assert!(raw.contains("\"currentBoardId\": \"board-1\""));
        assert!(!path.with_extension("tasklane.tmp").exists());

        let mut reader = SnapshotFile::new(&path);
        let loaded = reader.load().unwrap().unwrap().into_tree();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_unchanged_tree_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        let mut tree = demo_tree();

        let mut file = SnapshotFile::new(&path);
        assert!(file.save(&tree).unwrap());
        assert!(!file.save(&tree).unwrap());

        let mut reopened = SnapshotFile::new(&path);
        reopened.load().unwrap();
        assert!(!reopened.save(&tree).unwrap());

        tree.workspaces[0].title = "Renamed".to_string();
        assert!(reopened.save(&tree).unwrap());
    }

    #[test]
    fn test_empty_tree_is_a_valid_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        let mut file = SnapshotFile::new(&path);
        assert!(file.save(&BoardTree::default()).unwrap());
        let loaded = SnapshotFile::new(&path).load().unwrap().unwrap();
        assert!(loaded.workspaces.is_empty());
        assert_eq!(loaded.current_board_id, None);
    }

    #[test]
    fn test_rejects_bad_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            SnapshotFile::new(&path).load(),
            Err(SnapshotError::Json(_))
        ));

        fs::write(&path, r#"{"version": 7, "workspaces": []}"#).unwrap();
        assert!(matches!(
            SnapshotFile::new(&path).load(),
            Err(SnapshotError::UnsupportedVersion { found: 7 })
        ));
    }

    #[test]
    fn test_atomic_write_refuses_empty_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.json");
        assert!(atomic_write(&path, "  \n").is_err());
        assert!(!path.exists());
    }
}
