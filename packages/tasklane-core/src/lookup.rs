/// Id → location resolution across the workspace tree.
///
/// Lookups are linear scans. A path is only meaningful for the tree it was
/// computed from: the store resolves paths on its private working copy and
/// uses them before publishing, so a path never outlives one mutation.
use crate::error::{Result, StoreError};
use crate::types::{Board, BoardTree, Card, List, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPath {
    pub workspace: usize,
    pub board: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPath {
    pub workspace: usize,
    pub board: usize,
    pub list: usize,
}

impl ListPath {
    pub fn board_path(&self) -> BoardPath {
        BoardPath {
            workspace: self.workspace,
            board: self.board,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPath {
    pub workspace: usize,
    pub board: usize,
    pub list: usize,
    pub card: usize,
}

impl CardPath {
    pub fn list_path(&self) -> ListPath {
        ListPath {
            workspace: self.workspace,
            board: self.board,
            list: self.list,
        }
    }

    pub fn board_path(&self) -> BoardPath {
        self.list_path().board_path()
    }
}

impl BoardTree {
    pub fn locate_workspace(&self, workspace_id: &str) -> Option<usize> {
        self.workspaces.iter().position(|w| w.id == workspace_id)
    }

    pub fn locate_board(&self, board_id: &str) -> Option<BoardPath> {
        self.workspaces
            .iter()
            .enumerate()
            .find_map(|(workspace, ws)| {
                ws.boards
                    .iter()
                    .position(|b| b.id == board_id)
                    .map(|board| BoardPath { workspace, board })
            })
    }

    pub fn locate_list(&self, list_id: &str) -> Option<ListPath> {
        for (workspace, ws) in self.workspaces.iter().enumerate() {
            for (board, b) in ws.boards.iter().enumerate() {
                if let Some(list) = b.lists.iter().position(|l| l.id == list_id) {
                    return Some(ListPath {
                        workspace,
                        board,
                        list,
                    });
                }
            }
        }
        None
    }

    pub fn locate_card(&self, card_id: &str) -> Option<CardPath> {
        for (workspace, ws) in self.workspaces.iter().enumerate() {
            for (board, b) in ws.boards.iter().enumerate() {
                for (list, l) in b.lists.iter().enumerate() {
                    if let Some(card) = l.cards.iter().position(|c| c.id == card_id) {
                        return Some(CardPath {
                            workspace,
                            board,
                            list,
                            card,
                        });
                    }
                }
            }
        }
        None
    }

    /// Index of `list_id` inside the board at `path`.
    ///
    /// Distinguishes a list living on another board from an unknown id.
    pub fn list_index_in(&self, path: BoardPath, list_id: &str) -> Result<usize> {
        let board = self.board_at(path);
        if let Some(index) = board.lists.iter().position(|l| l.id == list_id) {
            return Ok(index);
        }
        if self.locate_list(list_id).is_some() {
            return Err(StoreError::ListNotInBoard {
                list_id: list_id.to_string(),
                board_id: board.id.clone(),
            });
        }
        Err(StoreError::ListNotFound(list_id.to_string()))
    }

    pub fn workspace(&self, workspace_id: &str) -> Option<&Workspace> {
        self.locate_workspace(workspace_id)
            .map(|index| &self.workspaces[index])
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.locate_board(board_id).map(|path| self.board_at(path))
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.locate_list(list_id).map(|path| self.list_at(path))
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.locate_card(card_id).map(|path| self.card_at(path))
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current_board_id
            .as_deref()
            .and_then(|id| self.board(id))
    }

    /// Every board in workspace order.
    pub fn boards(&self) -> impl Iterator<Item = &Board> {
        self.workspaces.iter().flat_map(|ws| ws.boards.iter())
    }

    pub fn board_at(&self, path: BoardPath) -> &Board {
        &self.workspaces[path.workspace].boards[path.board]
    }

    pub fn board_at_mut(&mut self, path: BoardPath) -> &mut Board {
        &mut self.workspaces[path.workspace].boards[path.board]
    }

    pub fn list_at(&self, path: ListPath) -> &List {
        &self.board_at(path.board_path()).lists[path.list]
    }

    pub fn list_at_mut(&mut self, path: ListPath) -> &mut List {
        &mut self.board_at_mut(path.board_path()).lists[path.list]
    }

    pub fn card_at(&self, path: CardPath) -> &Card {
        &self.list_at(path.list_path()).cards[path.card]
    }

    pub fn card_at_mut(&mut self, path: CardPath) -> &mut Card {
        &mut self.list_at_mut(path.list_path()).cards[path.card]
    }
}
