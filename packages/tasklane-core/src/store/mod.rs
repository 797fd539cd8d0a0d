//! Board mutation store.
//!
//! Owns the authoritative workspace tree. Every mutation:
//! - clones the current tree into a private working copy
//! - applies the change there, validating ids and indices first
//! - publishes the copy as the new tree in one `watch` swap
//! - emits one `StoreChange` on the broadcast channel
//!
//! A rejected mutation returns `Err` and publishes nothing, so readers only
//! ever see complete trees. Mutating methods take `&mut self`: there is a
//! single writer per store.
mod boards;
mod cards;
pub mod changes;
mod lists;

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::config::{StoreConfig, MAX_EVENT_CAPACITY};
use crate::error::{Result, StoreError};
use crate::ordering::renumber;
use crate::types::{Board, BoardTree, Workspace};

pub use changes::StoreChange;

pub struct BoardStore {
    state: watch::Sender<Arc<BoardTree>>,
    changes: broadcast::Sender<StoreChange>,
    config: StoreConfig,
}

impl BoardStore {
    /// An empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_tree(config, BoardTree::default())
    }

    /// A store seeded with `tree`. Positions and parent ids are normalized first.
    /// `event_capacity` is clamped to `1..=MAX_EVENT_CAPACITY`.
    pub fn with_tree(mut config: StoreConfig, mut tree: BoardTree) -> Self {
        normalize(&mut tree);
        let capacity = config.event_capacity.clamp(1, MAX_EVENT_CAPACITY);
        if capacity != config.event_capacity {
            log::warn!(
                "[tasklane.store] Event capacity {} out of range, using {}",
                config.event_capacity,
                capacity
            );
            config.event_capacity = capacity;
        }
        let (state, _) = watch::channel(Arc::new(tree));
        let (changes, _) = broadcast::channel(capacity);
        Self {
            state,
            changes,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The current tree. Cheap: shares the published `Arc`.
    pub fn snapshot(&self) -> Arc<BoardTree> {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published tree.
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardTree>> {
        self.state.subscribe()
    }

    /// Receiver for change events, for persistence collaborators.
    pub fn changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Look up a board anywhere in the tree.
    pub fn get_board(&self, board_id: &str) -> Result<Board> {
        self.state
            .borrow()
            .board(board_id)
            .cloned()
            .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))
    }

    pub fn current_board(&self) -> Option<Board> {
        self.state.borrow().current_board().cloned()
    }

    /// Replace the whole tree, e.g. after loading it from persistence.
    ///
    /// The current board marker survives when its board is still present.
    pub fn set_workspaces(&mut self, workspaces: Vec<Workspace>) {
        let current = self.state.borrow().current_board_id.clone();
        let mut tree = BoardTree {
            workspaces,
            current_board_id: current,
        };
        normalize(&mut tree);
        log::info!(
            "[tasklane.store] Tree replaced: {} workspaces",
            tree.workspaces.len()
        );
        self.publish(tree, StoreChange::TreeReplaced);
    }

    /// Mark the active board. `None` clears the marker.
    pub fn set_current_board(&mut self, board_id: Option<&str>) -> Result<()> {
        self.commit(|tree| {
            if let Some(id) = board_id {
                if tree.locate_board(id).is_none() {
                    return Err(StoreError::BoardNotFound(id.to_string()));
                }
            }
            if tree.current_board_id.as_deref() == board_id {
                return Ok(((), None));
            }
            tree.current_board_id = board_id.map(str::to_string);
            Ok((
                (),
                Some(StoreChange::CurrentBoardChanged {
                    board_id: tree.current_board_id.clone(),
                }),
            ))
        })
    }

    /// Run `apply` against a private copy of the tree and publish the copy
    /// if it returns a change. On `Err` or `None` the copy is discarded.
    fn commit<T>(
        &self,
        apply: impl FnOnce(&mut BoardTree) -> Result<(T, Option<StoreChange>)>,
    ) -> Result<T> {
        let mut next = BoardTree::clone(&self.state.borrow());
        let (value, change) = apply(&mut next)?;
        if let Some(change) = change {
            self.publish(next, change);
        }
        Ok(value)
    }

    fn publish(&self, tree: BoardTree, change: StoreChange) {
        self.state.send_replace(Arc::new(tree));
        log::debug!("[tasklane.store] Committed {:?}", change);
        // No subscribers is fine: persistence is optional.
        let _ = self.changes.send(change);
    }
}

/// Restore position density and parent ids throughout the tree, and drop a
/// dangling current board marker.
pub(crate) fn normalize(tree: &mut BoardTree) {
    for workspace in &mut tree.workspaces {
        for board in &mut workspace.boards {
            board.workspace_id = workspace.id.clone();
            renumber(&mut board.lists);
            for list in &mut board.lists {
                list.board_id = board.id.clone();
                renumber(&mut list.cards);
                for card in &mut list.cards {
                    card.list_id = list.id.clone();
                }
            }
        }
    }
    if let Some(id) = tree.current_board_id.as_deref() {
        if tree.locate_board(id).is_none() {
            tree.current_board_id = None;
        }
    }
}

/// Trimmed optional text; blank becomes `None`.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::is_dense;
    use crate::seed::demo_workspaces;

    fn store() -> BoardStore {
        let mut store = BoardStore::new(StoreConfig::default());
        store.set_workspaces(demo_workspaces());
        store
    }

    #[test]
    fn test_event_capacity_is_clamped() {
        let huge = StoreConfig {
            event_capacity: usize::MAX,
            ..StoreConfig::default()
        };
        let mut store = BoardStore::new(huge);
        assert_eq!(store.config().event_capacity, MAX_EVENT_CAPACITY);

        let mut events = store.changes();
        store.set_workspaces(demo_workspaces());
        assert!(events.try_recv().is_ok());

        let zero = StoreConfig {
            event_capacity: 0,
            ..StoreConfig::default()
        };
        assert_eq!(BoardStore::new(zero).config().event_capacity, 1);
    }

    #[test]
    fn test_set_workspaces_normalizes() {
        let mut workspaces = demo_workspaces();
        let board = &mut workspaces[0].boards[0];
        board.lists[0].position = 9;
        board.lists[0].cards[1].position = 5;
        board.lists[0].cards[1].list_id = "stale".to_string();

        let mut store = BoardStore::new(StoreConfig::default());
        store.set_workspaces(workspaces);

        let tree = store.snapshot();
        let board = &tree.workspaces[0].boards[0];
        assert!(is_dense(&board.lists));
        assert!(is_dense(&board.lists[0].cards));
        assert_eq!(board.lists[0].cards[1].list_id, board.lists[0].id);
    }

    #[test]
    fn test_get_board() {
        let store = store();
        assert_eq!(store.get_board("board-1").unwrap().title, "Project Alpha");
        assert_eq!(
            store.get_board("nope"),
            Err(StoreError::BoardNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_current_board_marker() {
        let mut store = store();
        assert!(store.current_board().is_none());
        store.set_current_board(Some("board-1")).unwrap();
        assert_eq!(store.current_board().unwrap().id, "board-1");

        assert!(store.set_current_board(Some("nope")).is_err());
        assert_eq!(store.current_board().unwrap().id, "board-1");

        store.set_current_board(None).unwrap();
        assert!(store.current_board().is_none());
    }

    #[test]
    fn test_current_board_cleared_when_tree_loses_it() {
        let mut store = store();
        store.set_current_board(Some("board-1")).unwrap();
        store.set_workspaces(Vec::new());
        assert!(store.snapshot().current_board_id.is_none());
    }

    #[test]
    fn test_subscribers_see_each_commit_once() {
        let mut store = store();
        let mut rx = store.subscribe();
        let mut events = store.changes();

        store.set_current_board(Some("board-1")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().current_board_id.as_deref(),
            Some("board-1")
        );
        assert_eq!(
            events.try_recv().unwrap(),
            StoreChange::CurrentBoardChanged {
                board_id: Some("board-1".to_string())
            }
        );

        // Setting the same board again changes nothing and publishes nothing.
        store.set_current_board(Some("board-1")).unwrap();
        assert!(!rx.has_changed().unwrap());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_failed_commit_keeps_snapshot_identity() {
        let mut store = store();
        let before = store.snapshot();
        assert!(store.set_current_board(Some("nope")).is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  x ".into())), Some("x".into()));
        assert_eq!(clean_optional(Some("   ".into())), None);
        assert_eq!(clean_optional(None), None);
    }
}
