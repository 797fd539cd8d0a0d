use chrono::Utc;

use super::{BoardStore, StoreChange};
use crate::error::{require_text, Result, StoreError};
use crate::ids::{next_id, IdKind};
use crate::lookup::BoardPath;
use crate::ordering::{renumber, reorder_within};
use crate::types::{BoardTree, List, ListUpdate};

impl BoardStore {
    /// Append an empty list to the active board.
    pub fn add_list(&mut self, board_id: &str, title: &str) -> Result<List> {
        let title = require_text(title, "List", "title")?;
        self.commit(|tree| {
            let path = tree
                .locate_board(board_id)
                .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
            if tree.current_board_id.as_deref() != Some(board_id) {
                return Err(StoreError::BoardNotActive {
                    board_id: board_id.to_string(),
                });
            }

            let board = tree.board_at_mut(path);
            let list = List {
                id: next_id(IdKind::List),
                title,
                board_id: board_id.to_string(),
                position: board.lists.len(),
                cards: Vec::new(),
            };
            board.lists.push(list.clone());
            board.updated_at = Utc::now();

            let change = StoreChange::ListCreated {
                board_id: board_id.to_string(),
                list_id: list.id.clone(),
                position: list.position,
            };
            Ok((list, Some(change)))
        })
    }

    pub fn update_list(&mut self, list_id: &str, update: ListUpdate) -> Result<List> {
        let title = update
            .title
            .as_deref()
            .map(|t| require_text(t, "List", "title"))
            .transpose()?;
        self.commit(|tree| {
            let path = tree
                .locate_list(list_id)
                .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
            let Some(title) = title else {
                return Ok((tree.list_at(path).clone(), None));
            };

            let list = tree.list_at_mut(path);
            list.title = title;
            let updated = list.clone();
            tree.board_at_mut(path.board_path()).updated_at = Utc::now();

            let change = StoreChange::ListUpdated {
                list_id: list_id.to_string(),
            };
            Ok((updated, Some(change)))
        })
    }

    /// Remove a list and its cards. Remaining lists are renumbered.
    pub fn delete_list(&mut self, list_id: &str) -> Result<()> {
        self.commit(|tree| {
            let path = tree
                .locate_list(list_id)
                .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
            let board = tree.board_at_mut(path.board_path());
            let removed = board.lists.remove(path.list);
            renumber(&mut board.lists);
            board.updated_at = Utc::now();
            log::debug!(
                "[tasklane.store.list] Deleted list {} with {} cards",
                list_id,
                removed.cards.len()
            );

            let change = StoreChange::ListDeleted {
                board_id: board.id.clone(),
                list_id: list_id.to_string(),
            };
            Ok(((), Some(change)))
        })
    }

    /// Move a list to `new_position` among its board's lists.
    pub fn move_list(&mut self, list_id: &str, new_position: usize) -> Result<()> {
        self.commit(|tree| {
            let path = tree
                .locate_list(list_id)
                .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
            let change = reorder_lists(tree, path.board_path(), path.list, new_position)?;
            Ok(((), change))
        })
    }

    /// Index-addressed variant of [`BoardStore::move_list`], for drag libraries
    /// that report source and destination indices.
    pub fn update_column_order(
        &mut self,
        board_id: &str,
        source_index: usize,
        destination_index: usize,
    ) -> Result<()> {
        self.commit(|tree| {
            let path = tree
                .locate_board(board_id)
                .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
            let change = reorder_lists(tree, path, source_index, destination_index)?;
            Ok(((), change))
        })
    }
}

/// Shared path of both list move shapes.
fn reorder_lists(
    tree: &mut BoardTree,
    path: BoardPath,
    source: usize,
    destination: usize,
) -> Result<Option<StoreChange>> {
    let board = tree.board_at_mut(path);
    if !reorder_within(&mut board.lists, source, destination)? {
        return Ok(None);
    }
    log::debug!(
        "[tasklane.store.move] Board {}: list {} -> {}",
        board.id,
        source,
        destination
    );
    Ok(Some(StoreChange::ListsReordered {
        board_id: board.id.clone(),
        order: board.lists.iter().map(|l| l.id.clone()).collect(),
    }))
}
