use crate::ordering::OrderError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Why a store operation was rejected. A rejected operation never changes the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Checklist item {item_id} not found on card {card_id}")]
    ChecklistItemNotFound { card_id: String, item_id: String },

    #[error("Comment {comment_id} not found on card {card_id}")]
    CommentNotFound { card_id: String, comment_id: String },

    #[error("List {list_id} does not belong to board {board_id}")]
    ListNotInBoard { list_id: String, board_id: String },

    #[error("Column drag container {container_id} is not board {board_id}")]
    ColumnNotInBoard {
        container_id: String,
        board_id: String,
    },

    #[error("Board {board_id} is not the active board")]
    BoardNotActive { board_id: String },

    #[error("{entity} {field} must not be empty")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid index: {0}")]
    InvalidIndex(#[from] OrderError),
}

impl StoreError {
    /// True for the stale-reference family of errors.
    ///
    /// Callers that treat an unknown id as "nothing to do" can match on this
    /// instead of enumerating variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::WorkspaceNotFound(_)
                | StoreError::BoardNotFound(_)
                | StoreError::ListNotFound(_)
                | StoreError::CardNotFound(_)
                | StoreError::ChecklistItemNotFound { .. }
                | StoreError::CommentNotFound { .. }
        )
    }
}

/// Trim `value` and reject it when nothing is left.
pub(crate) fn require_text(
    value: &str,
    entity: &'static str,
    field: &'static str,
) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyField { entity, field });
    }
    Ok(trimmed.to_string())
}
