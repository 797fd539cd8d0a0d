use chrono::Utc;

use super::{clean_optional, BoardStore, StoreChange};
use crate::error::{require_text, Result, StoreError};
use crate::ids::{next_id, IdKind};
use crate::types::{Board, BoardUpdate, List, NewBoard, NewWorkspace, Workspace, WorkspaceUpdate};

impl BoardStore {
    pub fn create_workspace(&mut self, input: NewWorkspace) -> Result<Workspace> {
        let title = require_text(&input.title, "Workspace", "title")?;
        let members = self.config.default_members.iter().cloned().collect();
        self.commit(|tree| {
            let workspace = Workspace {
                id: next_id(IdKind::Workspace),
                title,
                description: clean_optional(input.description),
                members,
                boards: Vec::new(),
                created_at: Utc::now(),
            };
            tree.workspaces.push(workspace.clone());
            let change = StoreChange::WorkspaceCreated {
                workspace_id: workspace.id.clone(),
            };
            Ok((workspace, Some(change)))
        })
    }

    pub fn update_workspace(&mut self, workspace_id: &str, update: WorkspaceUpdate) -> Result<Workspace> {
        let title = update
            .title
            .as_deref()
            .map(|t| require_text(t, "Workspace", "title"))
            .transpose()?;
        self.commit(|tree| {
            let index = tree
                .locate_workspace(workspace_id)
                .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_id.to_string()))?;
            let workspace = &mut tree.workspaces[index];
            if title.is_none() && update.description.is_none() {
                return Ok((workspace.clone(), None));
            }
            if let Some(title) = title {
                workspace.title = title;
            }
            if let Some(description) = update.description {
                workspace.description = clean_optional(description);
            }
            let change = StoreChange::WorkspaceUpdated {
                workspace_id: workspace_id.to_string(),
            };
            Ok((workspace.clone(), Some(change)))
        })
    }

    /// Remove a workspace with all of its boards.
    pub fn delete_workspace(&mut self, workspace_id: &str) -> Result<()> {
        self.commit(|tree| {
            let index = tree
                .locate_workspace(workspace_id)
                .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_id.to_string()))?;
            let removed = tree.workspaces.remove(index);
            if let Some(current) = tree.current_board_id.as_deref() {
                if removed.boards.iter().any(|b| b.id == current) {
                    tree.current_board_id = None;
                }
            }
            log::debug!(
                "[tasklane.store.workspace] Deleted {} with {} boards",
                workspace_id,
                removed.boards.len()
            );
            let change = StoreChange::WorkspaceDeleted {
                workspace_id: workspace_id.to_string(),
            };
            Ok(((), Some(change)))
        })
    }

    /// Append a new board, pre-populated with the configured default lists.
    pub fn create_board(&mut self, workspace_id: &str, input: NewBoard) -> Result<Board> {
        let title = require_text(&input.title, "Board", "title")?;
        let config = &self.config;
        self.commit(|tree| {
            let index = tree
                .locate_workspace(workspace_id)
                .ok_or_else(|| StoreError::WorkspaceNotFound(workspace_id.to_string()))?;

            let board_id = next_id(IdKind::Board);
            let lists = config
                .default_lists
                .iter()
                .enumerate()
                .map(|(position, title)| List {
                    id: next_id(IdKind::List),
                    title: title.clone(),
                    board_id: board_id.clone(),
                    position,
                    cards: Vec::new(),
                })
                .collect();
            let now = Utc::now();
            let board = Board {
                id: board_id,
                title,
                description: clean_optional(input.description),
                workspace_id: workspace_id.to_string(),
                members: config.default_members.iter().cloned().collect(),
                lists,
                created_at: now,
                updated_at: now,
            };

            tree.workspaces[index].boards.push(board.clone());
            let change = StoreChange::BoardCreated {
                workspace_id: workspace_id.to_string(),
                board_id: board.id.clone(),
            };
            Ok((board, Some(change)))
        })
    }

    pub fn update_board(&mut self, board_id: &str, update: BoardUpdate) -> Result<Board> {
        let title = update
            .title
            .as_deref()
            .map(|t| require_text(t, "Board", "title"))
            .transpose()?;
        self.commit(|tree| {
            let path = tree
                .locate_board(board_id)
                .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
            let board = tree.board_at_mut(path);
            if title.is_none() && update.description.is_none() {
                return Ok((board.clone(), None));
            }
            if let Some(title) = title {
                board.title = title;
            }
            if let Some(description) = update.description {
                board.description = clean_optional(description);
            }
            board.updated_at = Utc::now();
            let change = StoreChange::BoardUpdated {
                board_id: board_id.to_string(),
            };
            Ok((board.clone(), Some(change)))
        })
    }

    /// Remove a board with all of its lists and cards.
    pub fn delete_board(&mut self, board_id: &str) -> Result<()> {
        self.commit(|tree| {
            let path = tree
                .locate_board(board_id)
                .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
            let workspace = &mut tree.workspaces[path.workspace];
            workspace.boards.remove(path.board);
            let workspace_id = workspace.id.clone();
            if tree.current_board_id.as_deref() == Some(board_id) {
                tree.current_board_id = None;
            }
            let change = StoreChange::BoardDeleted {
                workspace_id,
                board_id: board_id.to_string(),
            };
            Ok(((), Some(change)))
        })
    }
}
