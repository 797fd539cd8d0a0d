/// Change events emitted after every committed store mutation.
///
/// These carry just enough to drive a persistence call for the affected
/// entity; the full new state is always available from the store snapshot.
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StoreChange {
    TreeReplaced,
    CurrentBoardChanged {
        board_id: Option<String>,
    },
    WorkspaceCreated {
        workspace_id: String,
    },
    WorkspaceUpdated {
        workspace_id: String,
    },
    WorkspaceDeleted {
        workspace_id: String,
    },
    BoardCreated {
        workspace_id: String,
        board_id: String,
    },
    BoardUpdated {
        board_id: String,
    },
    BoardDeleted {
        workspace_id: String,
        board_id: String,
    },
    ListCreated {
        board_id: String,
        list_id: String,
        position: usize,
    },
    ListUpdated {
        list_id: String,
    },
    ListDeleted {
        board_id: String,
        list_id: String,
    },
    /// New list order of a board, first to last.
    ListsReordered {
        board_id: String,
        order: Vec<String>,
    },
    CardCreated {
        list_id: String,
        card_id: String,
        position: usize,
    },
    CardUpdated {
        card_id: String,
    },
    CardDeleted {
        list_id: String,
        card_id: String,
    },
    CardMoved {
        card_id: String,
        from_list_id: String,
        to_list_id: String,
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_serializes_with_type_tag() {
        let change = StoreChange::CardMoved {
            card_id: "card-1".to_string(),
            from_list_id: "list-1".to_string(),
            to_list_id: "list-2".to_string(),
            position: 0,
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "cardMoved");
        assert_eq!(json["fromListId"], "list-1");
        assert_eq!(json["position"], 0);
    }
}
